//! Display state — what the render host shows.
//!
//! The state is a handful of sticky fields; the host only ever sees the
//! priority-collapsed [`DisplayView`]: a missing API key outranks a fixed
//! error message, which outranks the last fetched text, which outranks the
//! loading placeholder.

/// Shown when no API key is configured.
pub const MISSING_API_KEY_TEXT: &str = "Missing API key";

/// Mutable display state, owned by the fetch cycle and read by the host.
#[derive(Debug, Default)]
pub struct DisplayState {
    message: Option<String>,
    missing_api_key: bool,
    error: Option<String>,
}

/// The single thing the render host shows at any instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayView {
    MissingApiKey,
    Error(String),
    Message(String),
    Loading,
}

impl DisplayView {
    /// Collapse to the text the host should render. `placeholder` is the
    /// configured loading text.
    pub fn text(&self, placeholder: &str) -> String {
        match self {
            DisplayView::MissingApiKey => MISSING_API_KEY_TEXT.into(),
            DisplayView::Error(msg) | DisplayView::Message(msg) => msg.clone(),
            DisplayView::Loading => placeholder.into(),
        }
    }
}

impl DisplayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current view, priority-ordered.
    pub fn view(&self) -> DisplayView {
        if self.missing_api_key {
            DisplayView::MissingApiKey
        } else if let Some(error) = &self.error {
            DisplayView::Error(error.clone())
        } else if let Some(message) = &self.message {
            DisplayView::Message(message.clone())
        } else {
            DisplayView::Loading
        }
    }

    /// Record a successful fetch. Clears any sticky error — a later success
    /// overrides a previous failure outcome.
    pub fn set_message(&mut self, text: String) {
        self.message = Some(text);
        self.error = None;
    }

    /// Set the sticky error message (401, malformed config).
    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    /// Set the sticky missing-key flag.
    pub fn set_missing_api_key(&mut self) {
        self.missing_api_key = true;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
