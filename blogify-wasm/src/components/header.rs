use leptos::prelude::*;

use crate::models::Session;
use crate::state::AppState;

fn display_name(session: &Session) -> String {
    session
        .name
        .clone()
        .unwrap_or_else(|| session.email.clone())
}

/// Первая буква имени; после login имя неизвестно, тогда "U".
fn user_initial(session: &Session) -> String {
    session
        .name
        .as_deref()
        .and_then(|name| name.chars().next())
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "U".to_string())
}

#[component]
pub(crate) fn Header(state: AppState, on_logout: Callback<()>) -> impl IntoView {
    let is_scrolled = RwSignal::new(false);
    let show_dropdown = RwSignal::new(false);

    window_event_listener(leptos::ev::scroll, move |_| {
        let y = window().scroll_y().unwrap_or(0.0);
        is_scrolled.set(y > 10.0);
    });

    // Клик вне меню закрывает его; кнопка меню гасит всплытие.
    window_event_listener(leptos::ev::click, move |_| {
        show_dropdown.set(false);
    });

    let state_for_name = state.clone();
    let state_for_initial = state.clone();
    let state_for_menu = state;

    view! {
        <header class="site-header" class:scrolled=move || is_scrolled.get()>
            <div class="brand">
                <span class="logo">"B"</span>
                <span class="brand-name">"Blogify"</span>
            </div>

            <div class="nav">
                <Show
                    when=move || state_for_menu.is_authenticated()
                    fallback=|| {
                        view! {
                            <a class="login" href="#login">"Login"</a>
                            <a class="cta" href="#signup">"Get Started"</a>
                        }
                    }
                >
                    <div class="dropdown-container">
                        <button
                            class="identity"
                            on:click=move |ev| {
                                ev.stop_propagation();
                                show_dropdown.update(|open| *open = !*open);
                            }
                        >
                            <span class="avatar">
                                {
                                    let state = state_for_initial.clone();
                                    move || {
                                        state
                                            .session
                                            .get()
                                            .map(|s| user_initial(&s))
                                            .unwrap_or_default()
                                    }
                                }
                            </span>
                            <span class="name">
                                {
                                    let state = state_for_name.clone();
                                    move || {
                                        state
                                            .session
                                            .get()
                                            .map(|s| display_name(&s))
                                            .unwrap_or_default()
                                    }
                                }
                            </span>
                        </button>

                        <Show when=move || show_dropdown.get()>
                            <div class="dropdown">
                                <button
                                    class="logout"
                                    on:click={
                                        let on_logout = on_logout.clone();
                                        move |_| {
                                            show_dropdown.set(false);
                                            on_logout.run(());
                                        }
                                    }
                                >
                                    "Logout"
                                </button>
                            </div>
                        </Show>
                    </div>
                </Show>
            </div>
        </header>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(name: Option<&str>) -> Session {
        Session {
            name: name.map(str::to_string),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn display_name_prefers_the_signup_name() {
        assert_eq!(display_name(&session(Some("Ada"))), "Ada");
    }

    #[test]
    fn display_name_falls_back_to_email_after_login() {
        assert_eq!(display_name(&session(None)), "ada@example.com");
    }

    #[test]
    fn user_initial_is_u_when_the_name_is_unknown() {
        assert_eq!(user_initial(&session(Some("ada"))), "A");
        assert_eq!(user_initial(&session(None)), "U");
    }
}
