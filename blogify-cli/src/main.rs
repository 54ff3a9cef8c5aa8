use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process;

use anyhow::{Context, Result, anyhow};
use blogify_client::{Blog, BlogifyClient, BlogifyError, Session, feed};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

const SESSION_FILE: &str = ".blogify_session";
const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";

#[derive(Debug, Parser)]
#[command(name = "blogify-cli", version, about = "CLI клиент для Blogify")]
struct Cli {
    /// Базовый URL API (по умолчанию BLOGIFY_API_URL или локальный бэкенд).
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Вход пользователя.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Выход: уведомляет сервер и стирает локальную сессию.
    Logout,
    /// Страница ленты (размер страницы — 12).
    List {
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Фильтр по заголовку, тексту и имени автора (на клиенте).
        #[arg(long)]
        search: Option<String>,
    },
    /// Получение поста по id.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Создание поста (требует сессию).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Обновление поста (требует сессию).
    ///
    /// Если `--content` не указан, используется текущее содержимое поста.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: Option<String>,
    },
    /// Удаление поста с подтверждением (требует сессию).
    Delete {
        #[arg(long)]
        id: i64,
        /// Не спрашивать подтверждение.
        #[arg(long)]
        yes: bool,
    },
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging()?;

    let cli = Cli::parse();

    let base_url = resolve_base_url(cli.server);
    let mut client = BlogifyClient::new(base_url);
    client.restore(load_session());

    match cli.command {
        Command::Signup {
            name,
            email,
            password,
        } => {
            let session = client
                .signup(&name, &email, &password)
                .await
                .map_err(map_client_error)?;
            persist_session(&session).context("не удалось сохранить сессию")?;
            print_session("Регистрация успешна", &session);
        }
        Command::Login { email, password } => {
            let session = client
                .login(&email, &password)
                .await
                .map_err(map_client_error)?;
            persist_session(&session).context("не удалось сохранить сессию")?;
            print_session("Вход выполнен", &session);
        }
        Command::Logout => {
            client.logout().await;
            clear_session().context("не удалось удалить файл сессии")?;
            println!("Выход выполнен");
        }
        Command::List { page, search } => {
            let listed = client.list_blogs(page, feed::PAGE_SIZE).await;
            let index = client.resolve_author_emails(&listed.blogs).await;

            let blogs = match search.as_deref() {
                Some(query) => feed::filter_blogs(&listed.blogs, query),
                None => listed.blogs,
            };

            println!(
                "Постов: {} (страница {} из {}, всего {})",
                blogs.len(),
                page + 1,
                listed.total_pages.max(1),
                listed.total_blogs
            );
            let session_email = client.session().map(|s| s.email.as_str());
            for blog in &blogs {
                print_blog_summary(blog, feed::can_edit(session_email, &index, blog));
            }
        }
        Command::Get { id } => {
            let blog = client.get_blog(id).await.map_err(map_client_error)?;
            print_blog("Пост", &blog);
        }
        Command::Create { title, content } => {
            let blog = client
                .create_blog(&title, &content)
                .await
                .map_err(map_client_error)?;
            print_blog("Пост создан", &blog);
        }
        Command::Update { id, title, content } => {
            // Если пользователь не передал --content, сохраняем текущее содержимое поста.
            let content = match content {
                Some(content) => content,
                None => client.get_blog(id).await.map_err(map_client_error)?.content,
            };

            let blog = client
                .update_blog(id, &title, &content)
                .await
                .map_err(map_client_error)?;
            print_blog("Пост обновлён", &blog);
        }
        Command::Delete { id, yes } => {
            if !yes && !confirm(&format!("Удалить пост id={id}? [y/N] "))? {
                println!("Отменено");
                return Ok(());
            }
            client.delete_blog(id).await.map_err(map_client_error)?;
            println!("Пост удалён: id={id}");
        }
    }

    Ok(())
}

fn resolve_base_url(server: Option<String>) -> String {
    let raw = server
        .or_else(|| std::env::var("BLOGIFY_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    normalize_server(raw)
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Повреждённый или отсутствующий снимок сессии — это анонимный запуск,
/// а не ошибка.
fn load_session() -> Option<Session> {
    if !Path::new(SESSION_FILE).exists() {
        return None;
    }

    let raw = fs::read_to_string(SESSION_FILE).ok()?;
    match Session::from_snapshot(&raw) {
        Ok(session) => Some(session),
        Err(err) => {
            tracing::warn!("ignoring corrupt session file: {err}");
            None
        }
    }
}

fn persist_session(session: &Session) -> Result<()> {
    let raw = session.to_snapshot().map_err(map_client_error)?;
    fs::write(SESSION_FILE, raw)?;
    Ok(())
}

fn clear_session() -> io::Result<()> {
    if Path::new(SESSION_FILE).exists() {
        fs::remove_file(SESSION_FILE)?;
    }
    Ok(())
}

fn map_client_error(err: BlogifyError) -> anyhow::Error {
    let message = match err {
        BlogifyError::InvalidCredentials => "неверные учётные данные".to_string(),
        BlogifyError::Unauthorized => {
            "требуется авторизация: выполните `blogify-cli login ...` или `blogify-cli signup ...`"
                .to_string()
        }
        BlogifyError::NotFound => "ресурс не найден".to_string(),
        BlogifyError::RequestFailed(message) => format!("запрос отклонён: {message}"),
        BlogifyError::Http(err) => format!("ошибка HTTP: {err}"),
        BlogifyError::Storage(message) => format!("ошибка локального хранилища: {message}"),
    };
    anyhow!(message)
}

fn print_session(title: &str, session: &Session) {
    println!("{title}");
    if let Some(name) = &session.name {
        println!("  name: {name}");
    }
    println!("  email: {}", session.email);
}

fn print_blog(title: &str, blog: &Blog) {
    println!("{title}");
    println!("id: {}", blog.id);
    println!("title: {}", blog.title);
    println!("content: {}", blog.content);
    println!("author: {} (id={})", blog.author_name, blog.author_id);
    println!("created_at: {}", blog.created_at);
    println!("updated_at: {}", blog.updated_at);
}

fn print_blog_summary(blog: &Blog, owned: bool) {
    let marker = if owned { " [yours]" } else { "" };
    println!(
        "- #{} {}{} — {} · {} · {} min read",
        blog.id,
        blog.title,
        marker,
        blog.author_name,
        feed::format_created_at(&blog.created_at),
        feed::reading_time_minutes(&blog.content)
    );
    println!("  {}", feed::excerpt(&blog.content, 150));
}
