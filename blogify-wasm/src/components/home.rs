use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::blog_card::BlogCard;
use crate::models::Blog;
use crate::state::AppState;

/// Регистронезависимый поиск по заголовку, тексту и имени автора. Чистый,
/// пересчитывается на каждый ввод без запроса к серверу.
fn filter_blogs(blogs: &[Blog], query: &str) -> Vec<Blog> {
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

fn validate_non_empty_fields(
    title: &str,
    content: &str,
    error_message: &'static str,
) -> Result<(), &'static str> {
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(error_message);
    }
    Ok(())
}

fn find_blog_for_edit(blogs: &[Blog], blog_id: i64) -> Option<(String, String)> {
    blogs
        .iter()
        .find(|blog| blog.id == blog_id)
        .map(|blog| (blog.title.clone(), blog.content.clone()))
}

/// Загружает страницу ленты: посты, затем email'ы авторов одним барьером,
/// и только после этого подменяет состояние — целиком, без промежуточных
/// кадров в UI.
///
/// Устаревшую загрузку отменять нечем: если пользователь успел переключить
/// страницу, поздний ответ перезапишет более новое состояние. Дефект
/// исходного приложения, сохранённый как есть.
pub(crate) fn load_blogs(state: AppState, page: u32) {
    state.loading.set(true);
    state.clear_error();

    spawn_local(async move {
        let listed = api::list_blogs(page, api::PAGE_SIZE).await;
        let index = api::resolve_author_emails(&listed.blogs).await;

        state.author_emails.set(index);
        state.blogs.set(listed.blogs);
        state.total_pages.set(listed.total_pages);
        state.loading.set(false);
    });
}

#[component]
pub(crate) fn Home(state: AppState) -> impl IntoView {
    // Первая загрузка и перезагрузка при смене страницы.
    Effect::new({
        let state = state.clone();
        move |_| {
            let page = state.page.get();
            load_blogs(state.clone(), page);
        }
    });

    let create_title = RwSignal::new(String::new());
    let create_content = RwSignal::new(String::new());

    let editing_blog_id = RwSignal::new(None::<i64>);
    let edit_title = RwSignal::new(String::new());
    let edit_content = RwSignal::new(String::new());

    let selected_blog = RwSignal::new(None::<Blog>);

    let on_view = Callback::new({
        let state = state.clone();
        move |blog_id: i64| {
            let state = state.clone();
            spawn_local(async move {
                match api::get_blog(blog_id).await {
                    Ok(blog) => selected_blog.set(Some(blog)),
                    Err(err) => state.set_error(err.to_string()),
                }
            });
        }
    });

    let on_edit = Callback::new({
        let state = state.clone();
        move |blog_id: i64| {
            let blogs = state.blogs.get();
            let Some((title, content)) = find_blog_for_edit(&blogs, blog_id) else {
                state.set_error("Пост для редактирования не найден в текущем списке");
                return;
            };

            editing_blog_id.set(Some(blog_id));
            edit_title.set(title);
            edit_content.set(content);
        }
    });

    let on_cancel_edit = Callback::new(move |_: ()| {
        editing_blog_id.set(None);
        edit_title.set(String::new());
        edit_content.set(String::new());
    });

    let on_save_update = Callback::new({
        let state = state.clone();
        move |blog_id: i64| {
            state.clear_error();

            let Some(session) = state.session.get_untracked() else {
                state.set_error("Нужна авторизация для обновления поста");
                return;
            };

            let title = edit_title.get().trim().to_string();
            let content = edit_content.get().trim().to_string();
            if let Err(message) =
                validate_non_empty_fields(&title, &content, "Заполните заголовок и текст")
            {
                state.set_error(message);
                return;
            }

            state.loading.set(true);
            let state2 = state.clone();
            spawn_local(async move {
                match api::update_blog(&session, blog_id, &title, &content).await {
                    Ok(_) => {
                        editing_blog_id.set(None);
                        edit_title.set(String::new());
                        edit_content.set(String::new());
                        load_blogs(state2.clone(), state2.page.get_untracked());
                    }
                    Err(err) => {
                        state2.set_error(err.to_string());
                        state2.loading.set(false);
                    }
                }
            });
        }
    });

    let on_create = Callback::new({
        let state = state.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            state.clear_error();

            let Some(session) = state.session.get_untracked() else {
                state.set_error("Нужна авторизация для создания поста");
                return;
            };

            let title = create_title.get().trim().to_string();
            let content = create_content.get().trim().to_string();
            if let Err(message) =
                validate_non_empty_fields(&title, &content, "Заполните заголовок и текст")
            {
                state.set_error(message);
                return;
            }

            state.loading.set(true);
            let state2 = state.clone();
            spawn_local(async move {
                match api::create_blog(&session, &title, &content).await {
                    Ok(_) => {
                        create_title.set(String::new());
                        create_content.set(String::new());
                        load_blogs(state2.clone(), state2.page.get_untracked());
                    }
                    Err(err) => {
                        state2.set_error(err.to_string());
                        state2.loading.set(false);
                    }
                }
            });
        }
    });

    let on_delete = Callback::new({
        let state = state.clone();
        move |blog_id: i64| {
            let confirmed = window()
                .confirm_with_message("Are you sure you want to delete this blog?")
                .unwrap_or(false);
            if !confirmed {
                return;
            }

            let Some(session) = state.session.get_untracked() else {
                state.set_error("Нужна авторизация для удаления поста");
                return;
            };

            let state2 = state.clone();
            spawn_local(async move {
                match api::delete_blog(&session, blog_id).await {
                    Ok(()) => load_blogs(state2.clone(), state2.page.get_untracked()),
                    Err(_) => {
                        // Список не трогаем: блокирующее предупреждение и ручной повтор.
                        let _ = window()
                            .alert_with_message("Failed to delete blog. Please try again.");
                    }
                }
            });
        }
    });

    let state_for_search = state.clone();
    let state_for_filtered = state.clone();
    let filtered = move || {
        filter_blogs(
            &state_for_filtered.blogs.get(),
            &state_for_filtered.search.get(),
        )
    };
    let filtered_for_grid = filtered.clone();
    let filtered_for_empty = filtered;

    let state_for_create_show = state.clone();
    let state_for_cards = state.clone();
    let state_for_pages = state.clone();
    let state_for_empty = state.clone();
    let state_for_loading = state.clone();

    view! {
        <section class="feed">
            <div class="toolbar">
                <input
                    class="search"
                    placeholder="Search for amazing articles, authors, or topics..."
                    prop:value=move || state_for_search.search.get()
                    on:input={
                        let state = state_for_search.clone();
                        move |ev| state.search.set(event_target_value(&ev))
                    }
                />
            </div>

            <Show when=move || state_for_loading.loading.get()>
                <div class="loading">"Loading..."</div>
            </Show>

            <Show when=move || state_for_create_show.is_authenticated()>
                <form class="create-form" on:submit=move |ev| on_create.run(ev)>
                    <h3>"Create New Story"</h3>
                    <input
                        placeholder="title"
                        prop:value=move || create_title.get()
                        on:input=move |ev| create_title.set(event_target_value(&ev))
                    />
                    <textarea
                        placeholder="content"
                        prop:value=move || create_content.get()
                        on:input=move |ev| create_content.set(event_target_value(&ev))
                    ></textarea>
                    <button type="submit" disabled=move || state.loading.get()>
                        "Create"
                    </button>
                </form>
            </Show>

            <Show when=move || selected_blog.get().is_some()>
                {move || {
                    selected_blog
                        .get()
                        .map(|blog| {
                            view! {
                                <article class="detail">
                                    <h2>{blog.title.clone()}</h2>
                                    <p class="byline">{blog.author_name.clone()}</p>
                                    <p>{blog.content.clone()}</p>
                                    <button on:click=move |_| selected_blog.set(None)>
                                        "Close"
                                    </button>
                                </article>
                            }
                        })
                }}
            </Show>

            <Show when=move || editing_blog_id.get().is_some()>
                <form class="edit-form" on:submit={
                    move |ev: SubmitEvent| {
                        ev.prevent_default();
                        if let Some(id) = editing_blog_id.get_untracked() {
                            on_save_update.run(id);
                        }
                    }
                }>
                    <h3>"Edit Story"</h3>
                    <input
                        placeholder="title"
                        prop:value=move || edit_title.get()
                        on:input=move |ev| edit_title.set(event_target_value(&ev))
                    />
                    <textarea
                        placeholder="content"
                        prop:value=move || edit_content.get()
                        on:input=move |ev| edit_content.set(event_target_value(&ev))
                    ></textarea>
                    <button type="submit">"Save"</button>
                    <button type="button" on:click=move |_| on_cancel_edit.run(())>
                        "Cancel"
                    </button>
                </form>
            </Show>

            <div class="grid">
                <For
                    each=move || filtered_for_grid()
                    key=|blog| (blog.id, blog.updated_at.clone())
                    children=move |blog| {
                        let state = state_for_cards.clone();
                        let blog_for_ownership = blog.clone();
                        let can_edit =
                            Signal::derive(move || state.can_edit(&blog_for_ownership));

                        view! {
                            <BlogCard
                                blog=blog
                                can_edit=can_edit
                                on_view=on_view.clone()
                                on_edit=on_edit.clone()
                                on_delete=on_delete.clone()
                            />
                        }
                    }
                />
            </div>

            <Show when={
                let state = state_for_empty.clone();
                move || filtered_for_empty().is_empty() && !state.loading.get()
            }>
                <div class="empty">
                    <h3>"No stories found"</h3>
                    <p>"Try adjusting your search terms or explore our trending topics"</p>
                </div>
            </Show>

            <Show when={
                let state = state_for_pages.clone();
                move || state.total_pages.get() > 1
            }>
                <nav class="pagination">
                    <For
                        each={
                            let state = state_for_pages.clone();
                            move || (0..state.total_pages.get()).collect::<Vec<_>>()
                        }
                        key=|page| *page
                        children={
                            let state = state_for_pages.clone();
                            move |page| {
                                let state = state.clone();
                                let is_current = {
                                    let state = state.clone();
                                    move || state.page.get() == page
                                };
                                view! {
                                    <button
                                        class:active=is_current
                                        on:click=move |_| state.page.set(page)
                                    >
                                        {page + 1}
                                    </button>
                                }
                            }
                        }
                    />
                </nav>
            </Show>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_blog(id: i64, title: &str, content: &str, author: &str) -> Blog {
        Blog {
            id,
            title: title.to_string(),
            content: content.to_string(),
            author_id: 1,
            author_name: author.to_string(),
            created_at: "2026-03-10T12:00:00.000Z".to_string(),
            updated_at: "2026-03-10T12:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn filter_blogs_matches_title_content_and_author() {
        let blogs = vec![
            sample_blog(1, "Rust Patterns", "ownership", "Alice"),
            sample_blog(2, "Gardening", "RUST fungus", "Bob"),
            sample_blog(3, "Cooking", "pasta", "Rustam"),
            sample_blog(4, "Chess", "openings", "Carol"),
        ];

        let found = filter_blogs(&blogs, "rust");
        let ids: Vec<i64> = found.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn filter_blogs_with_blank_query_keeps_everything() {
        let blogs = vec![sample_blog(1, "a", "b", "c")];
        assert_eq!(filter_blogs(&blogs, "  ").len(), 1);
    }

    #[test]
    fn validate_non_empty_fields_rejects_blank_values() {
        assert_eq!(validate_non_empty_fields("  ", "content", "err"), Err("err"));
        assert_eq!(validate_non_empty_fields("title", "", "err"), Err("err"));
        assert!(validate_non_empty_fields("title", "content", "err").is_ok());
    }

    #[test]
    fn find_blog_for_edit_returns_title_and_content() {
        let blogs = vec![sample_blog(1, "A", "X", "a"), sample_blog(2, "B", "Y", "b")];
        assert_eq!(
            find_blog_for_edit(&blogs, 2),
            Some(("B".to_string(), "Y".to_string()))
        );
        assert!(find_blog_for_edit(&blogs, 999).is_none());
    }
}
