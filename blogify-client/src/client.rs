use futures::future::join_all;
use tracing::warn;

use crate::error::{BlogifyError, BlogifyResult};
use crate::feed::{self, AuthorEmailIndex};
use crate::http::HttpClient;
use crate::models::{AuthorProfile, Blog, BlogPage, Session};

#[derive(Debug, Clone)]
/// Клиент Blogify, привязанный к сессии.
///
/// Держит текущую сессию (`Option<Session>`) и сам подставляет её учётные
/// данные в мутирующие операции, так что вызывающей стороне не приходится
/// иметь дело с Basic-заголовками.
pub struct BlogifyClient {
    http: HttpClient,
    session: Option<Session>,
}

impl BlogifyClient {
    /// Создаёт клиент с базовым URL API без активной сессии.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(base_url),
            session: None,
        }
    }

    /// Восстанавливает сессию из снимка (например, прочитанного при старте).
    /// `None` означает анонимный запуск.
    pub fn restore(&mut self, session: Option<Session>) {
        self.session = session;
    }

    /// Текущая сессия, если пользователь вошёл.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Есть ли активная сессия.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    fn require_session(&self) -> BlogifyResult<&Session> {
        self.session.as_ref().ok_or(BlogifyError::Unauthorized)
    }

    /// Вход: при успехе сессией становятся сами отправленные учётные данные
    /// (имя пользователя бэкенд при входе не сообщает).
    pub async fn login(&mut self, email: &str, password: &str) -> BlogifyResult<Session> {
        self.http.login(email, password).await?;

        let session = Session {
            name: None,
            email: email.to_string(),
            password: password.to_string(),
        };
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Регистрация: контракт тот же, что у `login`, но имя сохраняется.
    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> BlogifyResult<Session> {
        self.http.signup(name, email, password).await?;

        let session = Session {
            name: Some(name.to_string()),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Выход. Уведомление сервера — fire-and-forget: его ошибка логируется и
    /// не всплывает, локальная сессия очищается в любом случае.
    pub async fn logout(&mut self) {
        if let Err(err) = self.http.logout().await {
            warn!("logout notification failed: {err}");
        }
        self.session = None;
    }

    /// Страница ленты (нумерация с нуля).
    ///
    /// Любая ошибка загрузки мягко деградирует до пустой страницы — поэтому
    /// метод возвращает `BlogPage`, а не `Result`. Это сознательное
    /// расхождение с `get_blog`, который ошибку пробрасывает.
    pub async fn list_blogs(&self, page: u32, size: u32) -> BlogPage {
        match self.http.fetch_all_blogs().await {
            Ok(all) => feed::paginate(all, page, size),
            Err(err) => {
                warn!("failed to fetch blog list: {err}");
                BlogPage::empty()
            }
        }
    }

    /// Пост по идентификатору; ошибка пробрасывается.
    pub async fn get_blog(&self, id: i64) -> BlogifyResult<Blog> {
        self.http.get_blog(id).await
    }

    /// Профиль автора по идентификатору; ошибка пробрасывается.
    pub async fn get_author(&self, id: i64) -> BlogifyResult<AuthorProfile> {
        self.http.get_author(id).await
    }

    /// Создаёт пост от имени текущей сессии.
    pub async fn create_blog(&self, title: &str, content: &str) -> BlogifyResult<Blog> {
        let session = self.require_session()?;
        self.http.create_blog(session, title, content).await
    }

    /// Обновляет пост от имени текущей сессии.
    pub async fn update_blog(&self, id: i64, title: &str, content: &str) -> BlogifyResult<Blog> {
        let session = self.require_session()?;
        self.http.update_blog(session, id, title, content).await
    }

    /// Удаляет пост от имени текущей сессии.
    pub async fn delete_blog(&self, id: i64) -> BlogifyResult<()> {
        let session = self.require_session()?;
        self.http.delete_blog(session, id).await
    }

    /// Разрешает email'ы авторов страницы для проверки владения.
    ///
    /// Lookup'ы по различным `author_id` уходят одновременно и собираются
    /// барьером: результат возвращается после того, как завершатся все.
    /// Неудача одного lookup'а не трогает соседей — соответствующий автор
    /// просто остаётся неразрешённым (владение по нему считается ложным).
    pub async fn resolve_author_emails(&self, blogs: &[Blog]) -> AuthorEmailIndex {
        let pending = feed::pending_author_ids(blogs, &AuthorEmailIndex::new());

        let lookups = pending.into_iter().map(|author_id| async move {
            (author_id, self.http.get_author(author_id).await)
        });

        let mut index = AuthorEmailIndex::new();
        for (author_id, outcome) in join_all(lookups).await {
            match outcome {
                Ok(profile) => {
                    index.insert(author_id, profile.email);
                }
                Err(err) => {
                    warn!("failed to resolve author {author_id}: {err}");
                }
            }
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutating_calls_require_a_session() {
        let client = BlogifyClient::new("http://127.0.0.1:8080/api");
        let err = client.require_session().expect_err("no session yet");
        assert!(matches!(err, BlogifyError::Unauthorized));
    }

    #[test]
    fn restore_makes_the_client_authenticated() {
        let mut client = BlogifyClient::new("http://127.0.0.1:8080/api");
        assert!(!client.is_authenticated());

        client.restore(Some(Session {
            name: Some("Ada".to_string()),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        }));

        assert!(client.is_authenticated());
        assert_eq!(
            client.session().map(|s| s.email.as_str()),
            Some("ada@example.com")
        );
    }

    #[test]
    fn restore_none_means_anonymous() {
        let mut client = BlogifyClient::new("http://127.0.0.1:8080/api");
        client.restore(Some(Session {
            name: None,
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        }));
        client.restore(None);
        assert!(!client.is_authenticated());
    }
}
