use crate::models::Session;

/// Ключ localStorage — тот же, под которым сессию хранит исходное приложение.
const SESSION_KEY: &str = "user";

fn parse_session(raw: &str) -> Option<Session> {
    serde_json::from_str::<Session>(raw).ok()
}

/// Читает снимок сессии. Отсутствие или порча снимка — анонимный запуск,
/// никаких ошибок наружу.
pub(crate) fn load_session() -> Option<Session> {
    let window = web_sys::window()?;
    let storage = window.local_storage().ok()??;
    let raw = storage.get_item(SESSION_KEY).ok()??;
    parse_session(&raw)
}

pub(crate) fn save_session(session: &Session) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "window is not available".to_string())?;
    let storage = window
        .local_storage()
        .map_err(|_| "failed to access localStorage".to_string())?
        .ok_or_else(|| "localStorage is not available".to_string())?;

    let raw =
        serde_json::to_string(session).map_err(|_| "failed to serialize session".to_string())?;
    storage
        .set_item(SESSION_KEY, &raw)
        .map_err(|_| "failed to save session".to_string())
}

pub(crate) fn clear_session() -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "window is not available".to_string())?;
    let storage = window
        .local_storage()
        .map_err(|_| "failed to access localStorage".to_string())?
        .ok_or_else(|| "localStorage is not available".to_string())?;

    storage
        .remove_item(SESSION_KEY)
        .map_err(|_| "failed to clear session".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_session_returns_none_for_invalid_json() {
        assert!(parse_session("{not-json}").is_none());
    }

    #[test]
    fn parse_session_accepts_login_snapshot_without_name() {
        let session = parse_session(r#"{"email":"a@b.c","password":"p"}"#);
        let session = session.expect("session should parse");
        assert_eq!(session.name, None);
        assert_eq!(session.email, "a@b.c");
    }

    #[test]
    fn parse_session_keeps_the_signup_name() {
        let session = parse_session(r#"{"name":"Ada","email":"a@b.c","password":"p"}"#);
        let session = session.expect("session should parse");
        assert_eq!(session.name.as_deref(), Some("Ada"));
    }
}
