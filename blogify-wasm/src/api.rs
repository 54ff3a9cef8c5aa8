use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{SecondsFormat, Utc};
use futures::future::join_all;
use gloo_net::http::Request;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::models::{AuthorProfile, Blog, BlogPage, Session};

const API_BASE_URL: &str = match option_env!("WASM_API_BASE_URL") {
    Some(value) => value,
    None => "http://127.0.0.1:8080/api",
};

/// Размер страницы ленты; исходное приложение зашивает 12 на каждом вызове.
pub(crate) const PAGE_SIZE: u32 = 12;

#[derive(Debug, Clone)]
pub(crate) enum ApiError {
    Network(String),
    Http { status: u16, message: String },
    Decode(String),
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Http { status, message } => write!(f, "http error {status}: {message}"),
            Self::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SignupRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBlogRequest<'a> {
    title: &'a str,
    content: &'a str,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBlogRequest<'a> {
    title: &'a str,
    content: &'a str,
    updated_at: String,
}

fn endpoint(path: &str) -> String {
    format!(
        "{}/{}",
        API_BASE_URL.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Basic-заголовок из учётных данных сессии: `base64(email:password)`.
fn basic_auth_header(session: &Session) -> String {
    let credentials = STANDARD.encode(format!("{}:{}", session.email, session.password));
    format!("Basic {credentials}")
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn parse_json<T: DeserializeOwned>(response: gloo_net::http::Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

async fn parse_error_body(response: gloo_net::http::Response) -> ApiError {
    let status = response.status();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "request failed".to_string());

    let fallback = match status {
        400 => "Некорректный запрос".to_string(),
        401 => "Требуется авторизация".to_string(),
        403 => "Недостаточно прав для этой операции".to_string(),
        404 => "Ресурс не найден".to_string(),
        409 => "Конфликт данных (например, пользователь уже существует)".to_string(),
        500..=599 => "Ошибка сервера".to_string(),
        _ => format!("HTTP ошибка {status}"),
    };

    let message = if text.trim().is_empty() { fallback } else { text };

    ApiError::Http { status, message }
}

fn console_warn(message: &str) {
    web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(message));
}

/// Нарезает полную коллекцию на страницу `page` (нумерация с нуля).
fn paginate(all: Vec<Blog>, page: u32, size: u32) -> BlogPage {
    let total_blogs = all.len() as u32;
    let total_pages = if size == 0 {
        0
    } else {
        total_blogs.div_ceil(size)
    };

    let start = (page as usize).saturating_mul(size as usize);
    let blogs = all
        .into_iter()
        .skip(start)
        .take(size as usize)
        .collect::<Vec<_>>();

    BlogPage {
        blogs,
        total_pages,
        total_blogs,
    }
}

/// Авторы страницы, которых ещё предстоит разрешить: без дублей, в порядке
/// первого появления.
fn pending_author_ids(blogs: &[Blog]) -> Vec<i64> {
    let mut pending = Vec::new();
    for blog in blogs {
        if !pending.contains(&blog.author_id) {
            pending.push(blog.author_id);
        }
    }
    pending
}

/// Проверяет учётные данные. Тело успешного ответа — произвольный текст и
/// игнорируется: сессией становятся сами отправленные credentials.
pub(crate) async fn login(email: &str, password: &str) -> Result<(), ApiError> {
    let payload = LoginRequest { email, password };

    let response = Request::post(&endpoint("/user/login"))
        .json(&payload)
        .map_err(|err| ApiError::Network(err.to_string()))?
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(ApiError::Http {
            status: response.status(),
            message: "Неверные email или пароль".to_string(),
        });
    }
    Ok(())
}

pub(crate) async fn signup(name: &str, email: &str, password: &str) -> Result<(), ApiError> {
    let payload = SignupRequest {
        name,
        email,
        password,
    };

    let response = Request::post(&endpoint("/user/newUser"))
        .json(&payload)
        .map_err(|err| ApiError::Network(err.to_string()))?
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(ApiError::Http {
            status: response.status(),
            message: "Регистрация не удалась".to_string(),
        });
    }
    Ok(())
}

/// Уведомляет сервер о выходе. Неудача только логируется: локальный выход
/// состоится в любом случае.
pub(crate) async fn logout() {
    let result = Request::post(&endpoint("/user/logout")).send().await;
    match result {
        Ok(response) if !response.ok() => {
            console_warn(&format!("logout notification failed: {}", response.status()));
        }
        Err(err) => console_warn(&format!("logout notification failed: {err}")),
        Ok(_) => {}
    }
}

/// Страница ленты. Серверной пагинации у `GET /blogs` нет: коллекция
/// забирается целиком и нарезается здесь. Любая ошибка мягко деградирует до
/// пустой страницы — поэтому функция не возвращает `Result`.
pub(crate) async fn list_blogs(page: u32, size: u32) -> BlogPage {
    let response = match Request::get(&endpoint("/blogs")).send().await {
        Ok(response) => response,
        Err(err) => {
            console_warn(&format!("failed to fetch blog list: {err}"));
            return BlogPage::empty();
        }
    };

    if !response.ok() {
        console_warn(&format!("failed to fetch blog list: {}", response.status()));
        return BlogPage::empty();
    }

    match response.json::<Vec<Blog>>().await {
        Ok(all) => paginate(all, page, size),
        Err(err) => {
            console_warn(&format!("failed to decode blog list: {err}"));
            BlogPage::empty()
        }
    }
}

/// Пост по идентификатору; в отличие от списка, ошибка пробрасывается.
pub(crate) async fn get_blog(id: i64) -> Result<Blog, ApiError> {
    let response = Request::get(&endpoint(&format!("/blogs/{id}")))
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    parse_json(response).await
}

pub(crate) async fn get_author(id: i64) -> Result<AuthorProfile, ApiError> {
    let response = Request::get(&endpoint(&format!("/user/{id}")))
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    parse_json(response).await
}

/// Разрешает email'ы авторов страницы. Lookup'ы по различным `author_id`
/// уходят одновременно и собираются барьером; неудача одного не отменяет
/// соседей — автор просто остаётся неразрешённым.
pub(crate) async fn resolve_author_emails(blogs: &[Blog]) -> HashMap<i64, String> {
    let lookups = pending_author_ids(blogs)
        .into_iter()
        .map(|author_id| async move { (author_id, get_author(author_id).await) });

    let mut index = HashMap::new();
    for (author_id, outcome) in join_all(lookups).await {
        match outcome {
            Ok(profile) => {
                index.insert(author_id, profile.email);
            }
            Err(err) => {
                console_warn(&format!("failed to resolve author {author_id}: {err}"));
            }
        }
    }
    index
}

pub(crate) async fn create_blog(
    session: &Session,
    title: &str,
    content: &str,
) -> Result<Blog, ApiError> {
    let now = now_iso();
    let payload = CreateBlogRequest {
        title,
        content,
        created_at: now.clone(),
        updated_at: now,
    };

    let response = Request::post(&endpoint("/blogs/create"))
        .header("Authorization", &basic_auth_header(session))
        .json(&payload)
        .map_err(|err| ApiError::Network(err.to_string()))?
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    parse_json(response).await
}

pub(crate) async fn update_blog(
    session: &Session,
    id: i64,
    title: &str,
    content: &str,
) -> Result<Blog, ApiError> {
    let payload = UpdateBlogRequest {
        title,
        content,
        updated_at: now_iso(),
    };

    let response = Request::put(&endpoint(&format!("/blogs/update/{id}")))
        .header("Authorization", &basic_auth_header(session))
        .json(&payload)
        .map_err(|err| ApiError::Network(err.to_string()))?
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    parse_json(response).await
}

pub(crate) async fn delete_blog(session: &Session, id: i64) -> Result<(), ApiError> {
    let response = Request::delete(&endpoint(&format!("/blogs/delete/{id}")))
        .header("Authorization", &basic_auth_header(session))
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_blog(id: i64, author_id: i64) -> Blog {
        Blog {
            id,
            title: format!("title {id}"),
            content: "content".to_string(),
            author_id,
            author_name: "Author".to_string(),
            created_at: "2026-03-10T12:00:00.000Z".to_string(),
            updated_at: "2026-03-10T12:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn basic_auth_header_encodes_email_and_password() {
        let session = Session {
            name: None,
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        };

        // base64("ada@example.com:secret")
        assert_eq!(
            basic_auth_header(&session),
            "Basic YWRhQGV4YW1wbGUuY29tOnNlY3JldA=="
        );
    }

    #[test]
    fn paginate_returns_at_most_page_size_items() {
        let all: Vec<Blog> = (0..30).map(|i| sample_blog(i, i % 3)).collect();
        let page = paginate(all, 0, PAGE_SIZE);
        assert_eq!(page.blogs.len(), 12);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_blogs, 30);
    }

    #[test]
    fn paginate_out_of_range_page_is_empty() {
        let all: Vec<Blog> = (0..5).map(|i| sample_blog(i, 1)).collect();
        let page = paginate(all, 4, PAGE_SIZE);
        assert!(page.blogs.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn pending_author_ids_deduplicates() {
        let blogs = vec![
            sample_blog(1, 7),
            sample_blog(2, 7),
            sample_blog(3, 9),
            sample_blog(4, 7),
        ];
        assert_eq!(pending_author_ids(&blogs), vec![7, 9]);
    }
}
