use std::fmt;

use chrono::{DateTime, Local};
use iced::Point;
use log::{debug, error, info, warn};
use serde_json::Value;

use crate::client::gui::views::logger::{LogLevel, LogMessage};
use crate::client::models::drag_state::DragState;
use crate::client::models::fetch_state::FetchState;
use crate::client::services::backend::Backend;

/// What the app has to do after the state reacted to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Nothing,
    PromptLogin,
    StartFetch,
}

/// Fields of the modal login dialog. Dropped as soon as the dialog closes.
#[derive(Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub show_password: bool,
    pub error_message: Option<String>,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("show_password", &self.show_password)
            .field("error_message", &self.error_message)
            .finish()
    }
}

impl LoginForm {
    pub fn credentials(&self) -> (String, String) {
        (
            self.username.trim().to_string(),
            self.password.trim().to_string(),
        )
    }

    pub fn can_submit(&self) -> bool {
        !self.username.trim().is_empty()
    }
}

#[derive(Debug)]
pub struct OverlayState {
    pub fetch: FetchState,
    pub login: Option<LoginForm>,
    pub logger: Vec<LogMessage>,
    pub last_updated: Option<DateTime<Local>>,
    pub drag: DragState,
    pub cursor: Point,
    pub window_origin: Point,
    /// Legacy flow: fetch even when the login dialog was cancelled.
    pub fetch_without_login: bool,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self {
            fetch: FetchState::default(),
            login: None,
            logger: Vec::new(),
            last_updated: None,
            drag: DragState::default(),
            cursor: Point::ORIGIN,
            window_origin: Point::ORIGIN,
            fetch_without_login: false,
        }
    }
}

impl OverlayState {
    pub fn new(fetch_without_login: bool, window_origin: Point) -> Self {
        Self {
            fetch_without_login,
            window_origin,
            ..Self::default()
        }
    }

    pub fn request_refresh(&mut self, backend: &dyn Backend) -> Next {
        if self.login.is_some() {
            debug!("[OVERLAY] Refresh ignored, login dialog is open");
            return Next::Nothing;
        }
        if let Err(e) = self.fetch.begin() {
            debug!("[OVERLAY] Refresh ignored: {}", e);
            return Next::Nothing;
        }
        if backend.credentials_present() {
            info!("[OVERLAY] Credentials present, starting fetch");
            Next::StartFetch
        } else {
            info!("[OVERLAY] Credentials not present, prompting for login");
            self.login = Some(LoginForm::default());
            Next::PromptLogin
        }
    }

    pub fn submit_login(&mut self, backend: &dyn Backend) -> Next {
        let Some(form) = self.login.as_mut() else {
            return Next::Nothing;
        };
        if !form.can_submit() {
            form.error_message = Some("Username is required".to_string());
            return Next::Nothing;
        }
        let (username, password) = form.credentials();
        if let Err(e) = backend.save_credentials(&username, &password) {
            error!("[OVERLAY] Failed to save credentials: {}", e);
            form.error_message = Some(format!("Could not save credentials: {}", e));
            return Next::Nothing;
        }
        info!("[OVERLAY] Credentials saved for {}", username);
        self.logger
            .push(LogMessage::new(LogLevel::Info, "Credentials saved"));
        self.login = None;
        self.next_after_login()
    }

    pub fn cancel_login(&mut self) -> Next {
        if self.login.take().is_none() {
            return Next::Nothing;
        }
        if self.fetch_without_login {
            warn!("[OVERLAY] Login cancelled, fetching anyway");
            return self.next_after_login();
        }
        warn!("[OVERLAY] Login cancelled, fetch aborted");
        if let Err(e) = self.fetch.abort() {
            debug!("[OVERLAY] Nothing to abort: {}", e);
        }
        self.logger
            .push(LogMessage::new(LogLevel::Warning, "Sign-in cancelled"));
        Next::Nothing
    }

    fn next_after_login(&self) -> Next {
        if self.fetch.is_loading() {
            Next::StartFetch
        } else {
            Next::Nothing
        }
    }

    /// Shows the latest backend progress line while a fetch is running.
    pub fn report_progress(&mut self, line: String) {
        if let Err(e) = self.fetch.report_progress(line) {
            debug!("[OVERLAY] Dropping progress line: {}", e);
        }
    }

    pub fn finish_fetch(&mut self, result: Option<Value>) {
        let failed = result.is_none();
        if let Err(e) = self.fetch.complete(result) {
            warn!("[OVERLAY] Dropping fetch result: {}", e);
            return;
        }
        if failed {
            self.logger
                .push(LogMessage::new(LogLevel::Error, "Fetch failed"));
        } else {
            self.last_updated = Some(Local::now());
            self.logger
                .push(LogMessage::new(LogLevel::Success, "Data updated"));
        }
    }

    pub fn login_form_mut(&mut self) -> Option<&mut LoginForm> {
        self.login.as_mut()
    }

    pub fn press(&mut self) {
        if self.login.is_none() {
            self.drag.press(self.cursor);
        }
    }

    pub fn release(&mut self) {
        self.drag.release();
    }

    /// Tracks the cursor and returns the new window origin while dragging.
    pub fn cursor_moved(&mut self, position: Point) -> Option<Point> {
        self.cursor = position;
        let delta = self.drag.drag_to(position)?;
        self.window_origin = self.window_origin + delta;
        Some(self.window_origin)
    }

    /// Position reported by the platform. Ignored mid-drag, where the origin
    /// is already ahead of the echoes of our own move requests.
    pub fn window_moved(&mut self, position: Point) {
        if !self.drag.is_dragging() {
            self.window_origin = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::fetch_state::FETCH_ERROR_MESSAGE;
    use crate::client::models::fetch_state::VisibleLabel;
    use crate::client::services::backend::testing::FakeBackend;
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn type_credentials(state: &mut OverlayState, username: &str, password: &str) {
        let form = state.login_form_mut().unwrap();
        form.username = username.to_string();
        form.password = password.to_string();
    }

    #[test]
    fn refresh_with_credentials_goes_straight_to_fetch() {
        let backend = FakeBackend::with_credentials(Some(json!("7 invoices")));
        let mut state = OverlayState::default();

        assert_eq!(state.request_refresh(&backend), Next::StartFetch);
        assert!(state.login.is_none());
        assert!(state.fetch.is_loading());

        state.finish_fetch(backend.get_data());
        assert_eq!(state.fetch.visible_label(), VisibleLabel::Data("7 invoices"));
        assert!(state.last_updated.is_some());
        assert_eq!(state.logger.last().map(|l| l.level), Some(LogLevel::Success));
    }

    #[test]
    fn missing_credentials_prompt_before_any_fetch() {
        let backend = FakeBackend::without_credentials(Some(json!(1)));
        let mut state = OverlayState::default();

        assert_eq!(state.request_refresh(&backend), Next::PromptLogin);
        assert!(state.login.is_some());
        assert!(state.fetch.is_loading());
        assert_eq!(backend.fetch_count(), 0);
    }

    #[test]
    fn accepting_login_saves_trimmed_credentials_then_fetches() {
        let backend = FakeBackend::without_credentials(Some(json!(1)));
        let mut state = OverlayState::default();
        state.request_refresh(&backend);
        type_credentials(&mut state, "  mario ", " pw \t");

        assert_eq!(state.submit_login(&backend), Next::StartFetch);
        assert_eq!(backend.saved(), vec![("mario".to_string(), "pw".to_string())]);
        assert!(state.login.is_none());
        assert_eq!(state.logger.last().map(|l| l.level), Some(LogLevel::Info));
    }

    #[test]
    fn cancelling_login_never_saves_and_aborts_the_cycle() {
        let backend = FakeBackend::without_credentials(Some(json!(1)));
        let mut state = OverlayState::default();
        state.request_refresh(&backend);
        type_credentials(&mut state, "mario", "pw");

        assert_eq!(state.cancel_login(), Next::Nothing);
        assert!(backend.saved().is_empty());
        assert_eq!(state.fetch, FetchState::Idle);
        assert_eq!(state.logger.last().map(|l| l.level), Some(LogLevel::Warning));

        // a new refresh starts over and prompts again
        assert_eq!(state.request_refresh(&backend), Next::PromptLogin);
    }

    #[test]
    fn legacy_flow_fetches_after_cancel() {
        let backend = FakeBackend::without_credentials(None);
        let mut state = OverlayState::new(true, Point::ORIGIN);
        state.request_refresh(&backend);

        assert_eq!(state.cancel_login(), Next::StartFetch);
        assert!(backend.saved().is_empty());
        assert!(state.fetch.is_loading());
    }

    #[test]
    fn blank_username_is_refused() {
        let backend = FakeBackend::without_credentials(None);
        let mut state = OverlayState::default();
        state.request_refresh(&backend);
        type_credentials(&mut state, "   ", "pw");

        assert_eq!(state.submit_login(&backend), Next::Nothing);
        assert!(backend.saved().is_empty());
        assert!(state.login.as_ref().unwrap().error_message.is_some());
    }

    #[test]
    fn save_failure_keeps_dialog_open() {
        let backend = FakeBackend::without_credentials(None);
        backend.fail_save.store(true, Ordering::SeqCst);
        let mut state = OverlayState::default();
        state.request_refresh(&backend);
        type_credentials(&mut state, "mario", "pw");

        assert_eq!(state.submit_login(&backend), Next::Nothing);
        let form = state.login.as_ref().unwrap();
        assert!(form.error_message.as_ref().unwrap().contains("Could not save"));
        assert!(state.fetch.is_loading());
    }

    #[test]
    fn refresh_while_loading_is_ignored() {
        let backend = FakeBackend::with_credentials(Some(json!(1)));
        let mut state = OverlayState::default();
        assert_eq!(state.request_refresh(&backend), Next::StartFetch);
        assert_eq!(state.request_refresh(&backend), Next::Nothing);
        assert!(state.fetch.is_loading());
    }

    #[test]
    fn null_result_shows_error_message() {
        let backend = FakeBackend::with_credentials(None);
        let mut state = OverlayState::default();
        state.request_refresh(&backend);
        state.finish_fetch(backend.get_data());

        assert_eq!(state.fetch, FetchState::Error);
        assert_eq!(state.fetch.visible_label(), VisibleLabel::Data(FETCH_ERROR_MESSAGE));
        assert!(state.last_updated.is_none());
        assert_eq!(state.logger.last().map(|l| l.level), Some(LogLevel::Error));
    }

    #[test]
    fn stray_result_is_dropped() {
        let mut state = OverlayState::default();
        state.finish_fetch(Some(json!("late")));
        assert_eq!(state.fetch, FetchState::Idle);
    }

    #[test]
    fn drag_moves_window_by_pointer_delta() {
        let mut state = OverlayState::new(false, Point::new(100.0, 50.0));
        state.cursor_moved(Point::new(10.0, 10.0));
        state.press();

        assert_eq!(state.cursor_moved(Point::new(40.0, 25.0)), Some(Point::new(130.0, 65.0)));

        state.release();
        assert_eq!(state.cursor_moved(Point::new(90.0, 90.0)), None);
        assert_eq!(state.window_origin, Point::new(130.0, 65.0));
    }

    #[test]
    fn no_drag_while_login_dialog_is_open() {
        let backend = FakeBackend::without_credentials(None);
        let mut state = OverlayState::default();
        state.request_refresh(&backend);
        state.press();
        assert_eq!(state.cursor_moved(Point::new(5.0, 5.0)), None);
    }

    #[test]
    fn platform_moves_are_ignored_while_dragging() {
        let mut state = OverlayState::new(false, Point::new(30.0, 30.0));
        state.window_moved(Point::new(200.0, 120.0));
        assert_eq!(state.window_origin, Point::new(200.0, 120.0));

        state.cursor_moved(Point::new(10.0, 10.0));
        state.press();
        assert_eq!(state.cursor_moved(Point::new(20.0, 10.0)), Some(Point::new(210.0, 120.0)));
        // stale echo of an earlier position
        state.window_moved(Point::new(200.0, 120.0));
        assert_eq!(state.cursor_moved(Point::new(15.0, 10.0)), Some(Point::new(215.0, 120.0)));

        state.release();
        state.window_moved(Point::new(215.0, 121.0));
        assert_eq!(state.window_origin, Point::new(215.0, 121.0));
    }

    #[test]
    fn progress_updates_status_only_while_loading() {
        let backend = FakeBackend::with_credentials(Some(json!(2)));
        let mut state = OverlayState::default();
        state.report_progress("too early".to_string());
        assert_eq!(state.fetch, FetchState::Idle);

        state.request_refresh(&backend);
        state.report_progress("Connecting...".to_string());
        assert_eq!(state.fetch.visible_label(), VisibleLabel::Status("Connecting..."));

        state.finish_fetch(backend.get_data());
        state.report_progress("too late".to_string());
        assert_eq!(state.fetch.visible_label(), VisibleLabel::Data("2"));
    }

    #[test]
    fn login_form_debug_hides_password() {
        let form = LoginForm {
            username: "mario".to_string(),
            password: "hunter2".to_string(),
            ..LoginForm::default()
        };
        let shown = format!("{:?}", form);
        assert!(shown.contains("mario"));
        assert!(!shown.contains("hunter2"));
    }
}
