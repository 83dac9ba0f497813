pub mod chat_panel;
pub mod editor_panel;
pub mod error_banner;
pub mod status_bar;
