//! Клиентская библиотека веб-приложения Blogify.
//!
//! Оборачивает REST API бэкенда (`BlogifyClient`) и содержит чистую логику
//! ленты (`feed`): клиентскую пагинацию, поиск и разрешение email'ов авторов
//! для проверки владения постами.
//!
//! Бэкенд не выдаёт токенов: сессия — это пара `email:password`, из которой
//! клиент собирает Basic-заголовок для мутирующих запросов. Политика ошибок
//! у эндпоинтов намеренно разная: список постов деградирует до пустой
//! страницы, одиночное чтение и все мутации ошибку пробрасывают.
#![warn(missing_docs)]

mod client;
mod error;
pub mod feed;
mod http;
mod models;

pub use client::BlogifyClient;
pub use error::{BlogifyError, BlogifyResult};
pub use models::{AuthorProfile, Blog, BlogPage, Session};
