use std::collections::HashMap;

use leptos::prelude::*;

use crate::models::{Blog, Session};

#[derive(Debug, Clone)]
pub(crate) struct AppState {
    pub(crate) session: RwSignal<Option<Session>>,
    pub(crate) blogs: RwSignal<Vec<Blog>>,
    /// Индекс `author_id -> email` текущей загрузки; пересобирается целиком
    /// на каждую страницу.
    pub(crate) author_emails: RwSignal<HashMap<i64, String>>,
    pub(crate) page: RwSignal<u32>,
    pub(crate) total_pages: RwSignal<u32>,
    pub(crate) search: RwSignal<String>,
    pub(crate) error: RwSignal<Option<String>>,
    pub(crate) loading: RwSignal<bool>,
}

impl AppState {
    pub(crate) fn new() -> Self {
        Self {
            session: RwSignal::new(None),
            blogs: RwSignal::new(Vec::new()),
            author_emails: RwSignal::new(HashMap::new()),
            page: RwSignal::new(0),
            total_pages: RwSignal::new(0),
            search: RwSignal::new(String::new()),
            error: RwSignal::new(None),
            loading: RwSignal::new(false),
        }
    }

    pub(crate) fn set_error(&self, message: impl Into<String>) {
        self.error.set(Some(message.into()));
    }

    pub(crate) fn clear_error(&self) {
        self.error.set(None);
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.session.get().is_some()
    }

    /// Владение постом: email сессии совпадает с разрешённым email автора.
    /// Неразрешённый автор — не владелец.
    pub(crate) fn can_edit(&self, blog: &Blog) -> bool {
        let Some(session) = self.session.get() else {
            return false;
        };
        self.author_emails
            .get()
            .get(&blog.author_id)
            .is_some_and(|email| *email == session.email)
    }
}
