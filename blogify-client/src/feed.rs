//! Чистая логика ленты: клиентская пагинация, поиск, дедупликация
//! author-lookup'ов и производные поля карточки поста.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime};

use crate::models::{Blog, BlogPage};

/// Размер страницы ленты. Зашит константой: исходное приложение передаёт 12
/// на каждом вызове.
pub const PAGE_SIZE: u32 = 12;

/// Сопоставление `author_id -> email`, собираемое заново на каждую загрузку
/// страницы и используемое только для проверки владения постом.
pub type AuthorEmailIndex = HashMap<i64, String>;

/// Нарезает полную коллекцию постов на страницу `page` (нумерация с нуля).
///
/// Страница за пределами коллекции даёт пустой срез, но корректные итоги.
pub fn paginate(all: Vec<Blog>, page: u32, size: u32) -> BlogPage {
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

/// Регистронезависимый поиск по заголовку, тексту и имени автора.
///
/// Фильтр чистый и пересчитывается на каждый ввод без нового запроса к
/// серверу; пустая строка оставляет всё.
pub fn filter_blogs(blogs: &[Blog], query: &str) -> Vec<Blog> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return blogs.to_vec();
    }

    blogs
        .iter()
        .filter(|blog| {
            blog.title.to_lowercase().contains(&needle)
                || blog.content.to_lowercase().contains(&needle)
                || blog.author_name.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Идентификаторы авторов, которых ещё нет в индексе, без дублей и в порядке
/// первого появления. Инвариант загрузки: на каждый различный `author_id` —
/// не больше одного lookup-запроса.
pub fn pending_author_ids(blogs: &[Blog], index: &AuthorEmailIndex) -> Vec<i64> {
    let mut pending = Vec::new();
    for blog in blogs {
        if index.contains_key(&blog.author_id) || pending.contains(&blog.author_id) {
            continue;
        }
        pending.push(blog.author_id);
    }
    pending
}

/// Владение постом: email сессии совпадает с разрешённым email автора.
/// Неразрешённый `author_id` означает «не владелец».
pub fn can_edit(session_email: Option<&str>, index: &AuthorEmailIndex, blog: &Blog) -> bool {
    let Some(email) = session_email else {
        return false;
    };
    index
        .get(&blog.author_id)
        .is_some_and(|author_email| author_email == email)
}

/// Оценка времени чтения: ceil(слова / 200), минимум одна минута.
pub fn reading_time_minutes(content: &str) -> u32 {
    let words = content.split_whitespace().count() as u32;
    words.div_ceil(200).max(1)
}

/// Форматирует дату создания в виде "Jan 5, 2026".
///
/// Бэкенд присылает строки разного качества, поэтому парсим терпимо
/// (RFC 3339, затем наивный ISO без зоны) и на неудаче возвращаем
/// литерал "Recent".
pub fn format_created_at(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%b %-d, %Y").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%b %-d, %Y").to_string();
    }
    "Recent".to_string()
}

/// Анонс поста: первые `max_chars` символов и многоточие. Обрезает по
/// границе символа, не байта.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    let mut out: String = content.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_blog(id: i64, author_id: i64, title: &str, content: &str, author: &str) -> Blog {
        Blog {
            id,
            title: title.to_string(),
            content: content.to_string(),
            author_id,
            author_name: author.to_string(),
            created_at: "2026-03-10T12:00:00.000Z".to_string(),
            updated_at: "2026-03-10T12:00:00.000Z".to_string(),
        }
    }

    fn collection(count: i64) -> Vec<Blog> {
        (0..count)
            .map(|i| sample_blog(i, i % 3, &format!("title {i}"), "content", "Author"))
            .collect()
    }

    #[test]
    fn paginate_returns_at_most_page_size_items() {
        let page = paginate(collection(30), 0, PAGE_SIZE);
        assert_eq!(page.blogs.len(), 12);
        assert_eq!(page.total_blogs, 30);
    }

    #[test]
    fn paginate_total_pages_is_ceiling() {
        assert_eq!(paginate(collection(24), 0, PAGE_SIZE).total_pages, 2);
        assert_eq!(paginate(collection(25), 0, PAGE_SIZE).total_pages, 3);
        assert_eq!(paginate(collection(1), 0, PAGE_SIZE).total_pages, 1);
        assert_eq!(paginate(Vec::new(), 0, PAGE_SIZE).total_pages, 0);
    }

    #[test]
    fn paginate_last_page_holds_the_remainder() {
        let page = paginate(collection(25), 2, PAGE_SIZE);
        assert_eq!(page.blogs.len(), 1);
        assert_eq!(page.blogs[0].id, 24);
    }

    #[test]
    fn paginate_out_of_range_page_is_empty_with_correct_totals() {
        let page = paginate(collection(5), 7, PAGE_SIZE);
        assert!(page.blogs.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_blogs, 5);
    }

    #[test]
    fn filter_is_case_insensitive_across_fields() {
        let blogs = vec![
            sample_blog(1, 1, "Rust Patterns", "ownership", "Alice"),
            sample_blog(2, 2, "Gardening", "tomatoes and RUST fungus", "Bob"),
            sample_blog(3, 3, "Cooking", "pasta", "Rustam"),
            sample_blog(4, 4, "Chess", "openings", "Carol"),
        ];

        let found = filter_blogs(&blogs, "rust");
        let ids: Vec<i64> = found.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn filter_with_blank_query_keeps_everything() {
        let blogs = collection(4);
        assert_eq!(filter_blogs(&blogs, "").len(), 4);
        assert_eq!(filter_blogs(&blogs, "   ").len(), 4);
    }

    #[test]
    fn pending_author_ids_deduplicates_per_load() {
        let blogs = vec![
            sample_blog(1, 7, "a", "x", "A"),
            sample_blog(2, 7, "b", "y", "A"),
            sample_blog(3, 9, "c", "z", "B"),
            sample_blog(4, 7, "d", "w", "A"),
        ];

        let pending = pending_author_ids(&blogs, &AuthorEmailIndex::new());
        assert_eq!(pending, vec![7, 9]);
    }

    #[test]
    fn pending_author_ids_skips_already_resolved() {
        let blogs = vec![sample_blog(1, 7, "a", "x", "A"), sample_blog(2, 9, "b", "y", "B")];
        let mut index = AuthorEmailIndex::new();
        index.insert(7, "a@example.com".to_string());

        assert_eq!(pending_author_ids(&blogs, &index), vec![9]);
    }

    #[test]
    fn can_edit_requires_matching_resolved_email() {
        let blog = sample_blog(1, 7, "a", "x", "A");
        let mut index = AuthorEmailIndex::new();
        index.insert(7, "owner@example.com".to_string());

        assert!(can_edit(Some("owner@example.com"), &index, &blog));
        assert!(!can_edit(Some("other@example.com"), &index, &blog));
        assert!(!can_edit(None, &index, &blog));
    }

    #[test]
    fn can_edit_is_false_for_unresolved_author() {
        let blog = sample_blog(1, 7, "a", "x", "A");
        assert!(!can_edit(Some("owner@example.com"), &AuthorEmailIndex::new(), &blog));
    }

    #[test]
    fn reading_time_rounds_up_and_never_drops_to_zero() {
        assert_eq!(reading_time_minutes(""), 1);
        assert_eq!(reading_time_minutes("one two three"), 1);

        let words_401 = vec!["word"; 401].join(" ");
        assert_eq!(reading_time_minutes(&words_401), 3);

        let words_400 = vec!["word"; 400].join(" ");
        assert_eq!(reading_time_minutes(&words_400), 2);
    }

    #[test]
    fn format_created_at_renders_short_date() {
        assert_eq!(format_created_at("2026-03-10T12:00:00.000Z"), "Mar 10, 2026");
        assert_eq!(format_created_at("2026-03-10T12:00:00"), "Mar 10, 2026");
    }

    #[test]
    fn format_created_at_falls_back_to_recent() {
        assert_eq!(format_created_at("yesterday"), "Recent");
        assert_eq!(format_created_at(""), "Recent");
    }

    #[test]
    fn excerpt_truncates_on_char_boundary() {
        let cut = excerpt("привет мир", 6);
        assert_eq!(cut, "привет...");

        let short = excerpt("hi", 150);
        assert_eq!(short, "hi...");
    }
}
