// Presentation layer - HTTP surface of the console
pub mod app_state;
pub mod handlers;
pub mod router;
