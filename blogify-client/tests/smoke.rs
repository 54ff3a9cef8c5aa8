use std::time::{SystemTime, UNIX_EPOCH};

use blogify_client::{BlogifyClient, BlogifyError, Session};

fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock must be after unix epoch")
        .as_nanos();
    format!("{nanos}")
}

/// Адрес, на котором заведомо никто не слушает: проверяем мягкую деградацию
/// без запущенного бэкенда.
const UNREACHABLE_URL: &str = "http://127.0.0.1:9/api";

#[tokio::test]
async fn list_blogs_degrades_to_empty_page_on_fetch_failure() {
    let client = BlogifyClient::new(UNREACHABLE_URL);

    let page = client.list_blogs(0, 12).await;
    assert!(page.blogs.is_empty());
    assert_eq!(page.total_pages, 0);
    assert_eq!(page.total_blogs, 0);
}

#[tokio::test]
async fn get_blog_propagates_fetch_failure() {
    let client = BlogifyClient::new(UNREACHABLE_URL);

    let result = client.get_blog(1).await;
    assert!(matches!(result, Err(BlogifyError::Http(_))));
}

#[tokio::test]
async fn resolve_author_emails_isolates_lookup_failures() {
    let client = BlogifyClient::new(UNREACHABLE_URL);

    let blogs = vec![blogify_client::Blog {
        id: 1,
        title: "t".to_string(),
        content: "c".to_string(),
        author_id: 7,
        author_name: "Ada".to_string(),
        created_at: "2026-03-10T12:00:00.000Z".to_string(),
        updated_at: "2026-03-10T12:00:00.000Z".to_string(),
    }];

    // Все lookup'ы провалились — индекс пуст, но сам вызов не падает.
    let index = client.resolve_author_emails(&blogs).await;
    assert!(index.is_empty());
}

#[tokio::test]
async fn failed_delete_propagates_and_leaves_local_state_intact() {
    let mut client = BlogifyClient::new(UNREACHABLE_URL);
    client.restore(Some(Session {
        name: Some("Ada".to_string()),
        email: "ada@example.com".to_string(),
        password: "secret".to_string(),
    }));

    // Удаление с активной сессией проваливается на транспорте и ошибка
    // пробрасывается: никакой мягкой деградации, повтор — ручное действие.
    let result = client.delete_blog(1).await;
    assert!(matches!(result, Err(BlogifyError::Http(_))));

    // Локальное состояние не тронуто.
    assert!(client.is_authenticated());
    assert_eq!(
        client.session().map(|s| s.email.as_str()),
        Some("ada@example.com")
    );
}

#[tokio::test]
async fn logout_always_clears_the_local_session() {
    let mut client = BlogifyClient::new(UNREACHABLE_URL);
    client.restore(Some(Session {
        name: Some("Ada".to_string()),
        email: "ada@example.com".to_string(),
        password: "secret".to_string(),
    }));

    // Сервер недоступен, но локально выход обязан состояться.
    client.logout().await;
    assert!(!client.is_authenticated());
}

#[tokio::test]
#[ignore = "requires a running Blogify backend"]
async fn http_smoke_flow() {
    let base_url = std::env::var("BLOGIFY_API_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8080/api".to_string());
    let mut client = BlogifyClient::new(base_url);

    let suffix = unique_suffix();
    let name = format!("smoke_user_{suffix}");
    let email = format!("smoke_{suffix}@example.com");
    let password = "password123";

    let session = client
        .signup(&name, &email, password)
        .await
        .expect("signup must succeed");
    assert_eq!(session.email, email);
    assert_eq!(session.name.as_deref(), Some(name.as_str()));
    assert!(client.is_authenticated());

    let session = client
        .login(&email, password)
        .await
        .expect("login must succeed");
    assert_eq!(session.email, email);

    let created = client
        .create_blog("smoke title", "smoke content")
        .await
        .expect("create_blog must succeed");
    assert_eq!(created.title, "smoke title");

    // Повторное чтение без мутаций возвращает то же содержимое.
    let fetched = client
        .get_blog(created.id)
        .await
        .expect("get_blog must succeed");
    assert_eq!(fetched.title, "smoke title");
    assert_eq!(fetched.content, "smoke content");

    let page = client.list_blogs(0, 12).await;
    assert!(page.blogs.len() <= 12);
    assert_eq!(page.total_pages, page.total_blogs.div_ceil(12));
    assert!(page.blogs.iter().any(|blog| blog.id == created.id));

    let index = client.resolve_author_emails(&page.blogs).await;
    assert_eq!(index.get(&created.author_id).map(String::as_str), Some(email.as_str()));

    let updated = client
        .update_blog(created.id, "smoke title updated", "smoke content updated")
        .await
        .expect("update_blog must succeed");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "smoke title updated");

    client
        .delete_blog(created.id)
        .await
        .expect("delete_blog must succeed");

    let after_delete = client.get_blog(created.id).await;
    assert!(matches!(after_delete, Err(BlogifyError::NotFound)));

    client.logout().await;
    assert!(!client.is_authenticated());
}
