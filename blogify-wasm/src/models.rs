use serde::{Deserialize, Serialize};

/// Локальная сессия: бэкенд не выдаёт токен, личность пользователя — это
/// сами учётные данные.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub author_name: String,
    // Даты остаются сырыми строками: парсим лениво при отображении,
    // на неудаче показываем "Recent".
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPage {
    pub blogs: Vec<Blog>,
    pub total_pages: u32,
    pub total_blogs: u32,
}

impl BlogPage {
    pub fn empty() -> Self {
        Self {
            blogs: Vec::new(),
            total_pages: 0,
            total_blogs: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorProfile {
    pub email: String,
}
