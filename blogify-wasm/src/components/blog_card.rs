use chrono::{DateTime, NaiveDateTime};
use leptos::prelude::*;

use crate::models::Blog;

/// Оценка времени чтения: ceil(слова / 200), минимум минута.
fn reading_time_label(content: &str) -> String {
    let words = content.split_whitespace().count() as u32;
    let minutes = words.div_ceil(200).max(1);
    format!("{minutes} min read")
}

/// "Jan 5, 2026" или литерал "Recent", если дату не удалось разобрать.
fn format_created_at(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%b %-d, %Y").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%b %-d, %Y").to_string();
    }
    "Recent".to_string()
}

/// Анонс: первые 150 символов и многоточие (по границе символа).
fn excerpt(content: &str) -> String {
    let mut out: String = content.chars().take(150).collect();
    out.push_str("...");
    out
}

fn author_initial(author_name: &str) -> String {
    author_name
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "A".to_string())
}

#[component]
pub(crate) fn BlogCard(
    blog: Blog,
    can_edit: Signal<bool>,
    on_view: Callback<i64>,
    on_edit: Callback<i64>,
    on_delete: Callback<i64>,
) -> impl IntoView {
    let blog_id = blog.id;
    let read_time = reading_time_label(&blog.content);
    let date = format_created_at(&blog.created_at);
    let summary = excerpt(&blog.content);
    let initial = author_initial(&blog.author_name);

    view! {
        <article class="blog-card">
            <div class="card-meta">
                <span class="read-time">{read_time}</span>
            </div>

            <h3 class="card-title">{blog.title.clone()}</h3>
            <p class="card-excerpt">{summary}</p>

            <div class="card-author">
                <span class="avatar">{initial}</span>
                <div>
                    <span class="author-name">{blog.author_name.clone()}</span>
                    <span class="card-date">{date}</span>
                </div>
            </div>

            <div class="card-actions">
                <Show when=move || can_edit.get()>
                    <button
                        class="edit"
                        on:click={
                            let on_edit = on_edit.clone();
                            move |_| on_edit.run(blog_id)
                        }
                    >
                        "Edit"
                    </button>
                    <button
                        class="delete"
                        on:click={
                            let on_delete = on_delete.clone();
                            move |_| on_delete.run(blog_id)
                        }
                    >
                        "Delete"
                    </button>
                </Show>
                <button
                    class="read"
                    on:click={
                        let on_view = on_view.clone();
                        move |_| on_view.run(blog_id)
                    }
                >
                    "Read"
                </button>
            </div>
        </article>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_time_label_rounds_up() {
        assert_eq!(reading_time_label("one two three"), "1 min read");

        let words_401 = vec!["word"; 401].join(" ");
        assert_eq!(reading_time_label(&words_401), "3 min read");
    }

    #[test]
    fn reading_time_label_never_shows_zero_minutes() {
        assert_eq!(reading_time_label(""), "1 min read");
    }

    #[test]
    fn format_created_at_renders_short_date() {
        assert_eq!(format_created_at("2026-03-10T12:00:00.000Z"), "Mar 10, 2026");
    }

    #[test]
    fn format_created_at_falls_back_to_recent() {
        assert_eq!(format_created_at("not-a-date"), "Recent");
    }

    #[test]
    fn excerpt_truncates_on_char_boundary() {
        assert_eq!(excerpt("привет"), "привет...");
    }

    #[test]
    fn author_initial_handles_empty_name() {
        assert_eq!(author_initial("alice"), "A");
        assert_eq!(author_initial(""), "A");
    }
}
