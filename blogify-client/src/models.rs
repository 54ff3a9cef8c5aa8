use serde::{Deserialize, Serialize};

use crate::error::{BlogifyError, BlogifyResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Локальная сессия пользователя.
///
/// Бэкенд не выдаёт токен: «сессия» — это сами учётные данные, и именно из
/// них собирается Basic-заголовок для мутирующих запросов.
pub struct Session {
    /// Имя пользователя. После `login` неизвестно (бэкенд его не возвращает),
    /// после `signup` — то, что ввёл пользователь.
    #[serde(default)]
    pub name: Option<String>,
    /// Email (он же логин).
    pub email: String,
    /// Пароль в открытом виде — ровно так его хранит и исходное приложение.
    pub password: String,
}

impl Session {
    /// Разбирает снимок сессии из локального хранилища. Повреждённый снимок —
    /// это `Storage`-ошибка: вызывающая сторона трактует её как анонимный
    /// запуск, а не как сбой.
    pub fn from_snapshot(raw: &str) -> BlogifyResult<Self> {
        serde_json::from_str(raw).map_err(|err| BlogifyError::Storage(err.to_string()))
    }

    /// Сериализует сессию для локального хранилища.
    pub fn to_snapshot(&self) -> BlogifyResult<String> {
        serde_json::to_string(self).map_err(|err| BlogifyError::Storage(err.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Публичная модель поста блога.
///
/// Даты приходят строками и строками же остаются: бэкенд шлёт ISO-подобные
/// значения произвольного качества, поэтому парсинг откладывается до
/// отображения (`feed::format_created_at`).
pub struct Blog {
    /// Идентификатор поста.
    pub id: i64,
    /// Заголовок.
    pub title: String,
    /// Содержимое.
    pub content: String,
    /// Идентификатор автора.
    pub author_id: i64,
    /// Отображаемое имя автора.
    pub author_name: String,
    /// Дата создания (сырая строка бэкенда).
    pub created_at: String,
    /// Дата последнего обновления (сырая строка бэкенда).
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Одна страница ленты с итогами пагинации.
pub struct BlogPage {
    /// Посты текущей страницы (не больше размера страницы).
    pub blogs: Vec<Blog>,
    /// Всего страниц.
    pub total_pages: u32,
    /// Всего постов в коллекции.
    pub total_blogs: u32,
}

impl BlogPage {
    /// Пустая страница — результат мягкой деградации `list_blogs`.
    pub fn empty() -> Self {
        Self {
            blogs: Vec::new(),
            total_pages: 0,
            total_blogs: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
/// Ответ `GET /user/{id}`: нам нужен только email для проверки владения.
pub struct AuthorProfile {
    /// Email автора.
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_snapshot_round_trips() {
        let session = Session {
            name: Some("Ada".to_string()),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        };

        let raw = session.to_snapshot().expect("serializable");
        let restored = Session::from_snapshot(&raw).expect("parseable");
        assert_eq!(restored, session);
    }

    #[test]
    fn session_snapshot_without_name_parses() {
        // Так выглядит снимок после login: бэкенд имя не возвращает.
        let restored = Session::from_snapshot(r#"{"email":"a@b.c","password":"p"}"#)
            .expect("parseable");
        assert_eq!(restored.name, None);
        assert_eq!(restored.email, "a@b.c");
    }

    #[test]
    fn corrupt_session_snapshot_is_a_storage_error() {
        let err = Session::from_snapshot("{not-json}").expect_err("corrupt snapshot");
        assert!(matches!(err, BlogifyError::Storage(_)));
    }

    #[test]
    fn blog_deserializes_from_camel_case_wire_format() {
        let raw = r#"{
            "id": 3,
            "title": "t",
            "content": "c",
            "authorId": 9,
            "authorName": "Ada",
            "createdAt": "2026-03-10T12:00:00.000Z",
            "updatedAt": "2026-03-11T12:00:00.000Z"
        }"#;

        let blog: Blog = serde_json::from_str(raw).expect("parseable");
        assert_eq!(blog.author_id, 9);
        assert_eq!(blog.author_name, "Ada");
        assert_eq!(blog.created_at, "2026-03-10T12:00:00.000Z");
    }
}
