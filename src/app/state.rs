use crate::analysis::AnalysisResult;
use crate::constants::{RESULT_IDLE, RESULT_LOADING};
use crate::controller::{AuthMode, MessageSlot, ViewState};
use crate::presentation::ImageFile;
use crate::session::Session;

/// What the result panel of the analysis page shows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultPanel {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The last request settled (successfully or not)
    Ready(AnalysisResult),
}

impl ResultPanel {
    /// Heading and body lines for display
    pub fn lines(&self) -> (Option<&'static str>, Vec<String>) {
        match self {
            Self::Idle => (None, vec![RESULT_IDLE.to_string()]),
            Self::Loading => (None, vec![RESULT_LOADING.to_string()]),
            Self::Ready(result) if result.is_error() => (None, result.summary_lines()),
            Self::Ready(result) => (Some(result.title()), result.summary_lines()),
        }
    }
}

/// Preview of a picked file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPreview {
    pub file_name: String,
    pub size: usize,
    pub data_url: String,
}

/// A file staged for submission but not yet sent
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub file: ImageFile,
    pub preview: UploadPreview,
}

/// Explicit application state, owned and mutated only by the controller
#[derive(Debug)]
pub struct AppState {
    pub session: Session,
    pub view: ViewState,
    /// File waiting for an explicit submit
    pub pending_upload: Option<PendingUpload>,
    /// Preview shown on the analysis page; survives submission
    pub preview: Option<UploadPreview>,
    pub result: ResultPanel,
    pub message: MessageSlot,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: Session::default(),
            view: ViewState::Auth(AuthMode::Login),
            pending_upload: None,
            preview: None,
            result: ResultPanel::Idle,
            message: MessageSlot::default(),
        }
    }
}

impl AppState {
    /// Drop everything tied to the analysis page
    pub fn reset_analysis(&mut self) {
        self.pending_upload = None;
        self.preview = None;
        self.result = ResultPanel::Idle;
    }
}
