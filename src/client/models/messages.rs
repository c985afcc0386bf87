use iced::Point;
use serde_json::Value;

use crate::client::services::fetch_worker::ProgressFeed;

#[derive(Debug, Clone)]
pub enum Message {
    None,
    RefreshPressed,
    FetchFinished(Option<Value>),
    FetchProgress(String, ProgressFeed),
    // Login dialog
    UsernameChanged(String),
    PasswordChanged(String),
    ToggleShowPassword,
    SubmitLogin,
    CancelLogin,
    // Drag-to-move
    CursorMoved(Point),
    DragPressed,
    DragReleased,
    WindowMoved(Point),
    ClearLog,
}
