use std::fmt;

use serde_json::Value;

pub const LOADING_TEXT: &str = "Loading...";
pub const IDLE_TEXT: &str = "Press Refresh to load";
pub const FETCH_ERROR_MESSAGE: &str = "Could not load data. Try again.";

/// Lifecycle of one refresh: `Idle -> Loading -> {Displaying | Error}`.
/// `Loading` carries the latest progress line reported by the backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading(Option<String>),
    Displaying(String),
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchError {
    /// A fetch is already outstanding.
    Busy,
    /// A result, progress line or abort arrived while nothing was loading.
    NotLoading,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Busy => write!(f, "a fetch is already in progress"),
            FetchError::NotLoading => write!(f, "no fetch is in progress"),
        }
    }
}

impl std::error::Error for FetchError {}

/// The one label the overlay shows for a given state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibleLabel<'a> {
    Status(&'a str),
    Data(&'a str),
}

impl FetchState {
    pub fn begin(&mut self) -> Result<(), FetchError> {
        if self.is_loading() {
            return Err(FetchError::Busy);
        }
        *self = FetchState::Loading(None);
        Ok(())
    }

    pub fn report_progress(&mut self, line: String) -> Result<(), FetchError> {
        match self {
            FetchState::Loading(progress) => {
                *progress = Some(line);
                Ok(())
            }
            _ => Err(FetchError::NotLoading),
        }
    }

    pub fn complete(&mut self, result: Option<Value>) -> Result<(), FetchError> {
        if !self.is_loading() {
            return Err(FetchError::NotLoading);
        }
        *self = match result {
            Some(value) => FetchState::Displaying(display_text(&value)),
            None => FetchState::Error,
        };
        Ok(())
    }

    /// Leaves `Loading` without a result, used when the login step is cancelled.
    pub fn abort(&mut self) -> Result<(), FetchError> {
        if !self.is_loading() {
            return Err(FetchError::NotLoading);
        }
        *self = FetchState::Idle;
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading(_))
    }

    pub fn visible_label(&self) -> VisibleLabel<'_> {
        match self {
            FetchState::Idle => VisibleLabel::Status(IDLE_TEXT),
            FetchState::Loading(Some(progress)) => VisibleLabel::Status(progress),
            FetchState::Loading(None) => VisibleLabel::Status(LOADING_TEXT),
            FetchState::Displaying(text) => VisibleLabel::Data(text),
            FetchState::Error => VisibleLabel::Data(FETCH_ERROR_MESSAGE),
        }
    }
}

/// Strings are shown as-is, everything else as compact JSON.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
