#[cfg(target_arch = "wasm32")]
use leptos::prelude::*;
#[cfg(target_arch = "wasm32")]
use leptos::task::spawn_local;

#[cfg(target_arch = "wasm32")]
use crate::api;
#[cfg(target_arch = "wasm32")]
use crate::state::AppState;
#[cfg(target_arch = "wasm32")]
use crate::storage;

use crate::components::auth_panel::AuthPanel;
use crate::components::header::Header;
use crate::components::home::Home;

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new();

    // Восстанавливаем сессию до первой загрузки ленты; порченый или
    // отсутствующий снимок означает анонимный запуск.
    if let Some(session) = storage::load_session() {
        state.session.set(Some(session));
    }

    let on_logout = Callback::new({
        let state = state.clone();
        move |_| {
            // Уведомление сервера — fire-and-forget, локальный выход его не ждёт.
            spawn_local(async move {
                api::logout().await;
            });

            if let Err(err) = storage::clear_session() {
                state.set_error(err);
            }
            state.session.set(None);
        }
    });

    let error_text = {
        let state = state.clone();
        move || state.error.get().unwrap_or_default()
    };

    let state_for_error = state.clone();

    view! {
        <Header state=state.clone() on_logout=on_logout />

        <main class="page">
            <section class="container">
                <Show when=move || !state_for_error.error.get().unwrap_or_default().is_empty()>
                    <div class="error-banner">
                        <strong>"Ошибка: "</strong>
                        {error_text.clone()}
                    </div>
                </Show>

                <AuthPanel state=state.clone() />
                <Home state=state.clone() />
            </section>
        </main>
    }
}
