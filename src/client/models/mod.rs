pub mod app_state;
pub mod drag_state;
pub mod fetch_state;
pub mod messages;
