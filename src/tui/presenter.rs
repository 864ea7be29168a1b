use crate::app::{ResultPanel, UploadPreview};
use crate::controller::{AuthMode, Panel, StatusMessage, ViewState};
use crate::presentation::Presenter;
use crate::session::Session;

/// Snapshot of what the controller last asked the terminal to show.
///
/// The render pass draws only from this snapshot, never from controller
/// state directly.
#[derive(Debug, Clone)]
pub struct TuiPresenter {
    pub view: ViewState,
    pub visible: [(Panel, bool); 3],
    pub username: Option<String>,
    pub message: Option<StatusMessage>,
    pub result: ResultPanel,
    pub preview: Option<UploadPreview>,
    pub busy: bool,
}

impl Default for TuiPresenter {
    fn default() -> Self {
        let view = ViewState::Auth(AuthMode::Login);
        Self {
            view,
            visible: view.visibility(),
            username: None,
            message: None,
            result: ResultPanel::Idle,
            preview: None,
            busy: false,
        }
    }
}

impl TuiPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The one panel currently marked visible
    pub fn visible_panel(&self) -> Option<Panel> {
        self.visible
            .iter()
            .find(|(_, shown)| *shown)
            .map(|(panel, _)| *panel)
    }
}

impl Presenter for TuiPresenter {
    fn render_view(&mut self, view: ViewState, session: &Session) {
        self.view = view;
        self.visible = view.visibility();
        self.username = session.username().map(str::to_string);
    }

    fn render_message(&mut self, message: Option<&StatusMessage>) {
        self.message = message.cloned();
    }

    fn render_result(&mut self, panel: &ResultPanel) {
        self.result = panel.clone();
    }

    fn render_upload(&mut self, preview: Option<&UploadPreview>, busy: bool) {
        self.preview = preview.cloned();
        self.busy = busy;
    }
}
