use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::models::Session;
use crate::state::AppState;
use crate::storage;

fn persist_and_apply(state: &AppState, session: Session) {
    if let Err(err) = storage::save_session(&session) {
        state.set_error(err);
        return;
    }
    state.session.set(Some(session));
    state.clear_error();
}

#[component]
pub(crate) fn AuthPanel(state: AppState) -> impl IntoView {
    let signup_name = RwSignal::new(String::new());
    let signup_email = RwSignal::new(String::new());
    let signup_password = RwSignal::new(String::new());

    let login_email = RwSignal::new(String::new());
    let login_password = RwSignal::new(String::new());

    let on_login = {
        let state = state.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            state.clear_error();

            let email = login_email.get().trim().to_string();
            let password = login_password.get().trim().to_string();

            if email.is_empty() || password.is_empty() {
                state.set_error("Заполните все поля входа");
                return;
            }

            state.loading.set(true);
            let state2 = state.clone();
            spawn_local(async move {
                match api::login(&email, &password).await {
                    Ok(()) => {
                        // Бэкенд не возвращает профиль: сессия — это сами
                        // введённые учётные данные, имя остаётся неизвестным.
                        let session = Session {
                            name: None,
                            email,
                            password,
                        };
                        persist_and_apply(&state2, session);
                    }
                    Err(err) => state2.set_error(err.to_string()),
                }
                state2.loading.set(false);
            });
        }
    };

    let on_signup = {
        let state = state.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            state.clear_error();

            let name = signup_name.get().trim().to_string();
            let email = signup_email.get().trim().to_string();
            let password = signup_password.get().trim().to_string();

            if name.is_empty() || email.is_empty() || password.is_empty() {
                state.set_error("Заполните все поля регистрации");
                return;
            }

            state.loading.set(true);
            let state2 = state.clone();
            spawn_local(async move {
                match api::signup(&name, &email, &password).await {
                    Ok(()) => {
                        let session = Session {
                            name: Some(name),
                            email,
                            password,
                        };
                        persist_and_apply(&state2, session);
                    }
                    Err(err) => state2.set_error(err.to_string()),
                }
                state2.loading.set(false);
            });
        }
    };

    let state_for_show = state.clone();
    let state_for_login_btn = state.clone();
    let state_for_signup_btn = state.clone();

    view! {
        <Show when=move || !state_for_show.is_authenticated()>
            <section class="auth-panel">
                <h2 id="login">"Login"</h2>
                <form on:submit=on_login.clone()>
                    <input
                        placeholder="email"
                        on:input=move |ev| login_email.set(event_target_value(&ev))
                    />
                    <input
                        placeholder="password"
                        type="password"
                        on:input=move |ev| login_password.set(event_target_value(&ev))
                    />
                    <button type="submit" disabled={
                        let state = state_for_login_btn.clone();
                        move || state.loading.get()
                    }>
                        "Login"
                    </button>
                </form>

                <h2 id="signup">"Get Started"</h2>
                <form on:submit=on_signup.clone()>
                    <input
                        placeholder="name"
                        on:input=move |ev| signup_name.set(event_target_value(&ev))
                    />
                    <input
                        placeholder="email"
                        on:input=move |ev| signup_email.set(event_target_value(&ev))
                    />
                    <input
                        placeholder="password"
                        type="password"
                        on:input=move |ev| signup_password.set(event_target_value(&ev))
                    />
                    <button type="submit" disabled={
                        let state = state_for_signup_btn.clone();
                        move || state.loading.get()
                    }>
                        "Sign Up"
                    </button>
                </form>
            </section>
        </Show>
    }
}
