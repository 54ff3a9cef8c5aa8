use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `blogify-client`.
pub enum BlogifyError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Неверные учётные данные при входе или регистрации.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Требуется авторизация (нет активной сессии или она отклонена сервером).
    #[error("unauthorized")]
    Unauthorized,

    /// Запрошенный ресурс не найден.
    #[error("not found")]
    NotFound,

    /// Прочие неуспешные ответы сервера.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Повреждённый снимок сессии в локальном хранилище (не фатально:
    /// вызывающая сторона трактует его как отсутствие сессии).
    #[error("storage error: {0}")]
    Storage(String),
}

/// Результат операций `blogify-client`.
pub type BlogifyResult<T> = Result<T, BlogifyError>;

impl BlogifyError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Self::Unauthorized
            }
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            _ => {
                let message = message.unwrap_or_else(|| format!("http status {status}"));
                Self::RequestFailed(message)
            }
        }
    }
}
