pub(crate) mod auth_panel;
pub(crate) mod blog_card;
pub(crate) mod header;
pub(crate) mod home;
