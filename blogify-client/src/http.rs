use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;

use crate::error::{BlogifyError, BlogifyResult};
use crate::models::{AuthorProfile, Blog, Session};

#[derive(Debug, Serialize)]
struct LoginRequestDto<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SignupRequestDto<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBlogRequestDto<'a> {
    title: &'a str,
    content: &'a str,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBlogRequestDto<'a> {
    title: &'a str,
    content: &'a str,
    updated_at: String,
}

/// Текущий момент в том же виде, в каком его шлёт браузерный клиент
/// (`new Date().toISOString()`).
fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone)]
/// HTTP-транспорт для REST API Blogify.
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт новый HTTP-клиент с базовым URL API, например
    /// `http://127.0.0.1:8080/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Бэкенд отвечает на ошибки простым текстом, а не JSON.
    async fn decode_error(response: reqwest::Response) -> BlogifyError {
        let status = response.status();

        let message = match response.text().await {
            Ok(body) if !body.trim().is_empty() => body,
            _ => format!("http status {status}"),
        };
        BlogifyError::from_http_status(status, Some(message))
    }

    fn with_basic_auth(request: RequestBuilder, session: &Session) -> RequestBuilder {
        request.basic_auth(&session.email, Some(&session.password))
    }

    /// Проверяет учётные данные. Тело успешного ответа — произвольный текст,
    /// и оно игнорируется: личность пользователя составляют сами отправленные
    /// credentials, токен бэкенд не выдаёт.
    pub async fn login(&self, email: &str, password: &str) -> BlogifyResult<()> {
        let payload = LoginRequestDto { email, password };
        let response = self
            .client
            .request(Method::POST, self.endpoint("/user/login"))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BlogifyError::InvalidCredentials);
        }
        Ok(())
    }

    /// Регистрирует пользователя. Контракт ответа тот же, что у `login`.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> BlogifyResult<()> {
        let payload = SignupRequestDto {
            name,
            email,
            password,
        };
        let response = self
            .client
            .request(Method::POST, self.endpoint("/user/newUser"))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BlogifyError::InvalidCredentials);
        }
        Ok(())
    }

    /// Уведомляет сервер о выходе. Ошибку возвращает вызывающей стороне —
    /// сессионный слой сам решает её проглотить.
    pub async fn logout(&self) -> BlogifyResult<()> {
        let response = self
            .client
            .request(Method::POST, self.endpoint("/user/logout"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(())
    }

    /// Возвращает всю коллекцию постов целиком: серверной пагинации у
    /// `GET /blogs` нет, страницы нарезаются на клиенте (`feed::paginate`).
    pub async fn fetch_all_blogs(&self) -> BlogifyResult<Vec<Blog>> {
        let response = self
            .client
            .request(Method::GET, self.endpoint("/blogs"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        Ok(response.json::<Vec<Blog>>().await?)
    }

    /// Получает пост по идентификатору. В отличие от списка, ошибка здесь
    /// пробрасывается вызывающей стороне.
    pub async fn get_blog(&self, id: i64) -> BlogifyResult<Blog> {
        let response = self
            .client
            .request(Method::GET, self.endpoint(&format!("/blogs/{id}")))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        Ok(response.json::<Blog>().await?)
    }

    /// Профиль пользователя по идентификатору — источник email для проверки
    /// владения постом.
    pub async fn get_author(&self, id: i64) -> BlogifyResult<AuthorProfile> {
        let response = self
            .client
            .request(Method::GET, self.endpoint(&format!("/user/{id}")))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        Ok(response.json::<AuthorProfile>().await?)
    }

    /// Создаёт пост от имени переданной сессии (Basic-заголовок).
    pub async fn create_blog(
        &self,
        session: &Session,
        title: &str,
        content: &str,
    ) -> BlogifyResult<Blog> {
        let now = now_iso();
        let payload = CreateBlogRequestDto {
            title,
            content,
            created_at: now.clone(),
            updated_at: now,
        };

        let request = self
            .client
            .request(Method::POST, self.endpoint("/blogs/create"))
            .json(&payload);
        let response = Self::with_basic_auth(request, session).send().await?;

        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        Ok(response.json::<Blog>().await?)
    }

    /// Обновляет пост по идентификатору (Basic-заголовок).
    pub async fn update_blog(
        &self,
        session: &Session,
        id: i64,
        title: &str,
        content: &str,
    ) -> BlogifyResult<Blog> {
        let payload = UpdateBlogRequestDto {
            title,
            content,
            updated_at: now_iso(),
        };

        let request = self
            .client
            .request(Method::PUT, self.endpoint(&format!("/blogs/update/{id}")))
            .json(&payload);
        let response = Self::with_basic_auth(request, session).send().await?;

        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        Ok(response.json::<Blog>().await?)
    }

    /// Удаляет пост по идентификатору (Basic-заголовок).
    pub async fn delete_blog(&self, session: &Session, id: i64) -> BlogifyResult<()> {
        let request = self
            .client
            .request(Method::DELETE, self.endpoint(&format!("/blogs/delete/{id}")));
        let response = Self::with_basic_auth(request, session).send().await?;

        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_normalizes_slashes() {
        let client = HttpClient::new("http://localhost:8080/api/");
        let full = client.endpoint("/blogs/create");
        assert_eq!(full, "http://localhost:8080/api/blogs/create");
    }

    #[test]
    fn create_request_uses_camel_case_keys() {
        let payload = CreateBlogRequestDto {
            title: "t",
            content: "c",
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        };

        let json = serde_json::to_value(&payload).expect("serializable");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn now_iso_is_rfc3339_with_millis() {
        let raw = now_iso();
        assert!(raw.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&raw).is_ok());
    }
}
