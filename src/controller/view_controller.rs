use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use super::events::ControllerEvent;
use super::message::Severity;
use super::validation::{validate_login, validate_new_account};
use super::view::{AuthMode, ViewState};
use crate::analysis::{AnalysisBackend, AnalysisKind, AnalysisResult};
use crate::app::{AppState, PendingUpload, ResultPanel, UIConfig, UploadPreview};
use crate::constants::{
    MSG_ACCOUNT_CREATED, MSG_ANALYSIS_COMPLETE, MSG_BUSY, MSG_EMPTY_FILE, MSG_LOGGING_IN,
    MSG_NO_FILE_SELECTED, MSG_PROCESSING,
};
use crate::presentation::{FileSource, Presenter};
use crate::utils::SiteScanError;

/// Timing and interaction settings for the controller
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub message_ttl: Duration,
    pub login_delay: Duration,
    /// Submit as soon as a file is staged
    pub auto_submit: bool,
}

impl From<&UIConfig> for ControllerSettings {
    fn from(ui: &UIConfig) -> Self {
        Self {
            message_ttl: ui.message_timeout(),
            login_delay: ui.login_delay(),
            auto_submit: ui.auto_submit,
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from(&UIConfig::default())
    }
}

/// A spawned task identified by a token
struct TrackedTask {
    token: u64,
    handle: JoinHandle<()>,
}

struct PendingLogin {
    task: TrackedTask,
    username: String,
}

/// Owns the application state and performs every transition.
///
/// All mutation goes through these methods, so the single-visible-view
/// invariant and the one-request-at-a-time rule are enforced here and
/// nowhere else.
pub struct Controller<P: Presenter> {
    state: AppState,
    presenter: P,
    backend: Arc<dyn AnalysisBackend>,
    files: Arc<dyn FileSource>,
    settings: ControllerSettings,
    events_tx: UnboundedSender<ControllerEvent>,
    events_rx: UnboundedReceiver<ControllerEvent>,
    pending_login: Option<PendingLogin>,
    in_flight: Option<TrackedTask>,
    next_token: u64,
}

impl<P: Presenter> Controller<P> {
    /// Create a controller in the initial `Auth(Login)` view
    pub fn new(
        presenter: P,
        backend: Arc<dyn AnalysisBackend>,
        files: Arc<dyn FileSource>,
        settings: ControllerSettings,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut controller = Self {
            state: AppState::default(),
            presenter,
            backend,
            files,
            settings,
            events_tx,
            events_rx,
            pending_login: None,
            in_flight: None,
            next_token: 0,
        };
        controller.render_all();
        controller
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> ViewState {
        self.state.view
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn backend_name(&self) -> String {
        self.backend.name()
    }

    /// Whether an analysis request is outstanding
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether a login is waiting out its delay
    pub fn is_logging_in(&self) -> bool {
        self.pending_login.is_some()
    }

    // ---------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------

    /// Show the auth panel, ending any session
    pub fn show_auth(&mut self, mode: AuthMode) {
        self.cancel_login();
        self.cancel_analysis();
        self.state.session.clear();
        self.state.reset_analysis();
        self.state.view = ViewState::Auth(mode);
        self.state.message.clear();
        tracing::debug!("View -> {}", self.state.view);
        self.render_all();
    }

    /// Flip between the login and create-account forms
    pub fn switch_auth_mode(&mut self, mode: AuthMode) -> Result<(), SiteScanError> {
        self.require(self.state.view.is_auth(), "switch forms")?;
        self.cancel_login();
        self.state.view = ViewState::Auth(mode);
        self.presenter.render_view(self.state.view, &self.state.session);
        Ok(())
    }

    /// Enter the dashboard as `username`
    pub fn show_dashboard(&mut self, username: &str) -> Result<(), SiteScanError> {
        self.require(
            matches!(
                self.state.view,
                ViewState::Auth(AuthMode::Login) | ViewState::Dashboard | ViewState::Analysis(_)
            ),
            "open the dashboard",
        )?;
        if username.trim().is_empty() {
            return Err(SiteScanError::Validation(
                "A username is required to open the dashboard.".to_string(),
            ));
        }

        self.cancel_login();
        self.cancel_analysis();
        self.state.session.start(username);
        self.state.reset_analysis();
        self.state.view = ViewState::Dashboard;
        tracing::info!("Dashboard opened for {}", username);
        self.render_all();
        Ok(())
    }

    /// Leave the analysis page, keeping the session
    pub fn back_to_dashboard(&mut self) -> Result<(), SiteScanError> {
        self.require(
            matches!(self.state.view, ViewState::Analysis(_)),
            "go back to the dashboard",
        )?;
        let username = self.state.session.username().unwrap_or_default().to_string();
        self.show_dashboard(&username)
    }

    /// Open the analysis page for `kind` with a clean upload and result
    pub fn show_analysis(&mut self, kind: AnalysisKind) -> Result<(), SiteScanError> {
        self.require(
            self.state.view == ViewState::Dashboard && self.state.session.is_active(),
            "open an analysis",
        )?;

        self.cancel_analysis();
        self.state.reset_analysis();
        self.state.view = ViewState::Analysis(kind);
        tracing::debug!("View -> {}", self.state.view);
        self.render_all();
        Ok(())
    }

    /// End the session and return to the login form
    pub fn logout(&mut self) -> Result<(), SiteScanError> {
        self.require(!self.state.view.is_auth(), "log out")?;
        if let Some(username) = self.state.session.username() {
            tracing::info!("{} logged out", username);
        }
        self.show_auth(AuthMode::Login);
        Ok(())
    }

    // ---------------------------------------------------------------
    // Auth forms
    // ---------------------------------------------------------------

    /// Validate the login form and enter the dashboard after the login delay.
    ///
    /// There is no real authentication: any non-empty pair is accepted.
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), SiteScanError> {
        self.require(
            self.state.view == ViewState::Auth(AuthMode::Login),
            "log in",
        )?;

        if let Err(err) = validate_login(username, password) {
            self.set_message(err.user_message(), Severity::Error);
            return Err(err);
        }

        self.set_message(MSG_LOGGING_IN, Severity::Info);
        self.cancel_login();

        let token = self.take_token();
        let delay = self.settings.login_delay;
        let events = self.events_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(ControllerEvent::LoginReady { token });
        });

        self.pending_login = Some(PendingLogin {
            task: TrackedTask { token, handle },
            username: username.trim().to_string(),
        });
        Ok(())
    }

    /// Validate the create-account form.
    ///
    /// Nothing is stored anywhere; success only returns to the login form.
    pub fn create_account(
        &mut self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), SiteScanError> {
        self.require(
            self.state.view == ViewState::Auth(AuthMode::CreateAccount),
            "create an account",
        )?;

        if let Err(err) = validate_new_account(username, password, confirm_password) {
            self.set_message(err.user_message(), Severity::Error);
            return Err(err);
        }

        self.state.view = ViewState::Auth(AuthMode::Login);
        self.presenter.render_view(self.state.view, &self.state.session);
        self.set_message(MSG_ACCOUNT_CREATED, Severity::Success);
        Ok(())
    }

    // ---------------------------------------------------------------
    // Upload and analysis
    // ---------------------------------------------------------------

    /// Pick a file through the file source and stage it for submission
    pub async fn choose_file(&mut self, selector: &str) -> Result<(), SiteScanError> {
        self.require(
            matches!(self.state.view, ViewState::Analysis(_)),
            "choose a file",
        )?;

        let file = match self.files.select_file(selector).await {
            Ok(Some(file)) => file,
            Ok(None) => {
                self.state.pending_upload = None;
                self.state.preview = None;
                self.render_upload();
                return Ok(());
            }
            Err(err) => {
                tracing::warn!("Could not read {}: {}", selector, err);
                self.set_message(err.user_message(), Severity::Error);
                return Err(err);
            }
        };

        if file.is_empty() {
            let err = SiteScanError::Validation(MSG_EMPTY_FILE.to_string());
            self.set_message(err.user_message(), Severity::Error);
            return Err(err);
        }

        let preview = UploadPreview {
            file_name: file.name.clone(),
            size: file.len(),
            data_url: self.files.read_as_data_url(&file),
        };
        tracing::debug!("Staged {} ({} bytes)", preview.file_name, preview.size);

        self.state.preview = Some(preview.clone());
        self.state.pending_upload = Some(PendingUpload { file, preview });
        self.render_upload();

        if self.settings.auto_submit {
            self.submit()
        } else {
            Ok(())
        }
    }

    /// Send the staged file to the backend for the current analysis kind.
    ///
    /// Rejected while another request is outstanding.
    pub fn submit(&mut self) -> Result<(), SiteScanError> {
        let kind = match self.state.view {
            ViewState::Analysis(kind) => kind,
            other => {
                return Err(SiteScanError::InvalidTransition {
                    action: "submit an image",
                    from: other.to_string(),
                })
            }
        };

        if self.in_flight.is_some() {
            self.set_message(MSG_BUSY, Severity::Info);
            return Err(SiteScanError::Busy);
        }

        let Some(upload) = self.state.pending_upload.take() else {
            let err = SiteScanError::Validation(MSG_NO_FILE_SELECTED.to_string());
            self.set_message(err.user_message(), Severity::Error);
            return Err(err);
        };

        self.set_message(MSG_PROCESSING, Severity::Info);
        self.state.result = ResultPanel::Loading;

        let token = self.take_token();
        let backend = Arc::clone(&self.backend);
        let events = self.events_tx.clone();
        tracing::info!("Submitting {} for {}", upload.file.name, kind);

        let handle = tokio::spawn(async move {
            let outcome = backend.analyze(upload.file, kind).await;
            let _ = events.send(ControllerEvent::AnalysisFinished {
                token,
                kind,
                outcome,
            });
        });
        self.in_flight = Some(TrackedTask { token, handle });

        self.presenter.render_result(&self.state.result);
        self.render_upload();
        Ok(())
    }

    // ---------------------------------------------------------------
    // Messages
    // ---------------------------------------------------------------

    /// Show a message; it clears itself after the configured delay
    pub fn set_message(&mut self, text: impl Into<String>, severity: Severity) {
        let text = text.into();
        tracing::debug!("[{}] {}", severity.label(), text);
        let ttl = self.settings.message_ttl;
        let message = self.state.message.set(text, severity, ttl, &self.events_tx);
        self.presenter.render_message(Some(message));
    }

    /// Drop the current message before its timer fires
    pub fn clear_message(&mut self) {
        self.state.message.clear();
        self.presenter.render_message(None);
    }

    // ---------------------------------------------------------------
    // Event processing
    // ---------------------------------------------------------------

    /// Wait for the next background completion and apply it
    pub async fn handle_next_event(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.apply(event);
        }
    }

    /// Apply every completion that is already queued. Returns how many were applied.
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Apply one completion; stale ones are ignored
    pub fn apply(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::LoginReady { token } => {
                let matches = self
                    .pending_login
                    .as_ref()
                    .is_some_and(|login| login.task.token == token);
                if !matches || !self.state.view.is_auth() {
                    tracing::debug!("Ignoring stale login completion {}", token);
                    return;
                }
                if let Some(login) = self.pending_login.take() {
                    if let Err(err) = self.show_dashboard(&login.username) {
                        self.set_message(err.user_message(), Severity::Error);
                    }
                }
            }
            ControllerEvent::MessageExpired { id } => {
                if self.state.message.expire(id) {
                    self.presenter.render_message(None);
                }
            }
            ControllerEvent::AnalysisFinished {
                token,
                kind,
                outcome,
            } => {
                let matches = self.in_flight.as_ref().is_some_and(|t| t.token == token);
                if !matches {
                    tracing::debug!("Ignoring stale {} result {}", kind, token);
                    return;
                }
                self.in_flight = None;
                self.finish_analysis(kind, outcome);
            }
        }
    }

    fn finish_analysis(
        &mut self,
        kind: AnalysisKind,
        outcome: Result<AnalysisResult, SiteScanError>,
    ) {
        match outcome {
            Ok(result) => {
                tracing::info!("{} complete", kind);
                self.state.result = ResultPanel::Ready(result);
                self.set_message(MSG_ANALYSIS_COMPLETE, Severity::Success);
            }
            Err(err) => {
                tracing::error!("{} failed: {}", kind, err);
                let message = err.user_message();
                self.state.result = ResultPanel::Ready(AnalysisResult::Error {
                    message: message.clone(),
                });
                self.set_message(message, Severity::Error);
            }
        }
        self.presenter.render_result(&self.state.result);
        self.render_upload();
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    fn require(&self, allowed: bool, action: &'static str) -> Result<(), SiteScanError> {
        if allowed {
            Ok(())
        } else {
            Err(SiteScanError::InvalidTransition {
                action,
                from: self.state.view.to_string(),
            })
        }
    }

    fn take_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    fn cancel_login(&mut self) {
        if let Some(login) = self.pending_login.take() {
            login.task.handle.abort();
        }
    }

    /// Abort an outstanding request; its result will never be rendered
    fn cancel_analysis(&mut self) {
        if let Some(task) = self.in_flight.take() {
            tracing::debug!("Aborting in-flight analysis {}", task.token);
            task.handle.abort();
        }
    }

    fn render_upload(&mut self) {
        self.presenter
            .render_upload(self.state.preview.as_ref(), self.in_flight.is_some());
    }

    fn render_all(&mut self) {
        self.presenter.render_view(self.state.view, &self.state.session);
        self.presenter.render_message(self.state.message.current());
        self.presenter.render_result(&self.state.result);
        self.render_upload();
    }
}

impl<P: Presenter> Drop for Controller<P> {
    fn drop(&mut self) {
        self.cancel_login();
        self.cancel_analysis();
    }
}
