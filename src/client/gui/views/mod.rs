pub mod login_dialog;
pub mod logger;
pub mod overlay;
