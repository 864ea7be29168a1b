use async_trait::async_trait;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::analysis::stub::serve_once;
use crate::analysis::{
    AnalysisBackend, AnalysisKind, AnalysisResult, HttpAnalysisClient, MockAnalysisBackend,
    VegetationResult,
};
use crate::app::{ResultPanel, UploadPreview};
use crate::presentation::{FileSource, ImageFile, Presenter};
use crate::session::Session;
use crate::utils::SiteScanError;

/// Presenter that remembers everything it was asked to show
#[derive(Default)]
struct RecordingPresenter {
    visible: HashMap<Panel, bool>,
    views: Vec<ViewState>,
    username: Option<String>,
    message: Option<StatusMessage>,
    result: Option<ResultPanel>,
    preview: Option<UploadPreview>,
    busy: bool,
}

impl RecordingPresenter {
    fn visible_count(&self) -> usize {
        self.visible.values().filter(|v| **v).count()
    }

    fn message_text(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.text.as_str())
    }

    fn message_severity(&self) -> Option<Severity> {
        self.message.as_ref().map(|m| m.severity)
    }

    fn result_text(&self) -> String {
        let (_, lines) = self.result.clone().unwrap_or_default().lines();
        lines.join("\n")
    }
}

impl Presenter for RecordingPresenter {
    fn render_view(&mut self, view: ViewState, session: &Session) {
        for (panel, shown) in view.visibility() {
            self.visible.insert(panel, shown);
        }
        self.views.push(view);
        self.username = session.username().map(str::to_string);
    }

    fn render_message(&mut self, message: Option<&StatusMessage>) {
        self.message = message.cloned();
    }

    fn render_result(&mut self, panel: &ResultPanel) {
        self.result = Some(panel.clone());
    }

    fn render_upload(&mut self, preview: Option<&UploadPreview>, busy: bool) {
        self.preview = preview.cloned();
        self.busy = busy;
    }
}

/// File source backed by a fixed in-memory table
#[derive(Default)]
struct MemoryFiles {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFiles {
    fn with(name: &str, bytes: &[u8]) -> Self {
        let mut files = HashMap::new();
        files.insert(name.to_string(), bytes.to_vec());
        Self { files }
    }
}

#[async_trait]
impl FileSource for MemoryFiles {
    async fn select_file(&self, selector: &str) -> Result<Option<ImageFile>, SiteScanError> {
        if selector.is_empty() {
            return Ok(None);
        }
        match self.files.get(selector) {
            Some(bytes) => Ok(Some(ImageFile::new(selector, bytes.clone()))),
            None => Err(SiteScanError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", selector),
            ))),
        }
    }
}

fn settings() -> ControllerSettings {
    ControllerSettings {
        message_ttl: Duration::from_secs(5),
        login_delay: Duration::from_millis(1000),
        auto_submit: false,
    }
}

fn controller_with(
    backend: Arc<dyn AnalysisBackend>,
    files: MemoryFiles,
    settings: ControllerSettings,
) -> Controller<RecordingPresenter> {
    Controller::new(
        RecordingPresenter::default(),
        backend,
        Arc::new(files),
        settings,
    )
}

fn idle_backend() -> Arc<dyn AnalysisBackend> {
    Arc::new(MockAnalysisBackend::new())
}

fn vegetation(percentage: f64) -> AnalysisResult {
    AnalysisResult::Vegetation(VegetationResult {
        vegetation_percentage: percentage,
        classification: "moderate".to_string(),
        message: "ok".to_string(),
    })
}

/// Controller already on the dashboard as alice
fn logged_in(
    backend: Arc<dyn AnalysisBackend>,
    files: MemoryFiles,
    settings: ControllerSettings,
) -> Controller<RecordingPresenter> {
    let mut controller = controller_with(backend, files, settings);
    controller.show_dashboard("alice").unwrap();
    controller
}

#[tokio::test]
async fn test_initial_view_is_login() {
    let controller = controller_with(idle_backend(), MemoryFiles::default(), settings());
    assert_eq!(controller.view(), ViewState::Auth(AuthMode::Login));
    assert_eq!(controller.presenter().visible_count(), 1);
    assert_eq!(controller.presenter().visible[&Panel::Auth], true);
}

#[tokio::test]
async fn test_login_rejects_empty_fields() {
    let mut controller = controller_with(idle_backend(), MemoryFiles::default(), settings());

    let err = controller.login("", "").unwrap_err();
    assert!(err.is_validation());
    assert_eq!(controller.view(), ViewState::Auth(AuthMode::Login));
    assert_eq!(
        controller.presenter().message_text(),
        Some("Please enter both username and password.")
    );
    assert_eq!(controller.presenter().message_severity(), Some(Severity::Error));

    // A missing password is rejected too
    assert!(controller.login("alice", "").is_err());
    assert!(!controller.is_logging_in());
}

#[tokio::test(start_paused = true)]
async fn test_login_enters_dashboard_after_delay() {
    let mut controller = controller_with(idle_backend(), MemoryFiles::default(), settings());

    controller.login("alice", "secret").unwrap();
    assert_eq!(controller.presenter().message_text(), Some("Logging in..."));
    // Nothing happens until the delay elapses
    assert_eq!(controller.view(), ViewState::Auth(AuthMode::Login));

    let started = tokio::time::Instant::now();
    controller.handle_next_event().await;

    assert!(started.elapsed() >= Duration::from_millis(1000));
    assert_eq!(controller.view(), ViewState::Dashboard);
    assert_eq!(controller.state().session.username(), Some("alice"));
    assert_eq!(controller.presenter().username.as_deref(), Some("alice"));
}

#[tokio::test(start_paused = true)]
async fn test_logout_during_login_delay_cancels_login() {
    let mut controller = controller_with(idle_backend(), MemoryFiles::default(), settings());

    controller.login("alice", "secret").unwrap();
    controller.show_auth(AuthMode::Login);

    tokio::time::advance(Duration::from_secs(2)).await;
    tokio::task::yield_now().await;
    controller.drain_events();

    assert_eq!(controller.view(), ViewState::Auth(AuthMode::Login));
    assert!(!controller.state().session.is_active());
}

#[tokio::test]
async fn test_create_account_validation() {
    let mut controller = controller_with(idle_backend(), MemoryFiles::default(), settings());
    controller.switch_auth_mode(AuthMode::CreateAccount).unwrap();

    let err = controller.create_account("", "x", "x").unwrap_err();
    assert_eq!(err.user_message(), "Please fill in all fields.");

    let err = controller.create_account("a", "pw1", "pw2").unwrap_err();
    assert_eq!(err.user_message(), "Passwords do not match.");

    let err = controller.create_account("a", "12345", "12345").unwrap_err();
    assert_eq!(err.user_message(), "Password must be at least 6 characters long.");
    assert_eq!(controller.view(), ViewState::Auth(AuthMode::CreateAccount));

    controller.create_account("a", "abcdef", "abcdef").unwrap();
    assert_eq!(controller.view(), ViewState::Auth(AuthMode::Login));
    assert_eq!(
        controller.presenter().message_text(),
        Some("Account created successfully! Please log in.")
    );
    assert_eq!(controller.presenter().message_severity(), Some(Severity::Success));
    // No account is persisted and nobody is logged in
    assert!(!controller.state().session.is_active());
}

#[tokio::test]
async fn test_show_auth_clears_message_and_session() {
    let mut controller = logged_in(idle_backend(), MemoryFiles::default(), settings());
    controller.set_message("hello", Severity::Info);

    controller.show_auth(AuthMode::CreateAccount);

    assert_eq!(controller.view(), ViewState::Auth(AuthMode::CreateAccount));
    assert!(controller.presenter().message.is_none());
    assert!(!controller.state().session.is_active());
}

#[tokio::test]
async fn test_show_dashboard_requires_username() {
    let mut controller = controller_with(idle_backend(), MemoryFiles::default(), settings());
    assert!(controller.show_dashboard("").is_err());
    assert_eq!(controller.view(), ViewState::Auth(AuthMode::Login));
}

#[tokio::test]
async fn test_illegal_transitions_leave_state_alone() {
    let mut controller = controller_with(idle_backend(), MemoryFiles::default(), settings());

    assert!(matches!(
        controller.show_analysis(AnalysisKind::Soil),
        Err(SiteScanError::InvalidTransition { .. })
    ));
    assert!(controller.logout().is_err());
    assert!(controller.back_to_dashboard().is_err());
    assert!(controller.create_account("a", "abcdef", "abcdef").is_err());
    assert_eq!(controller.view(), ViewState::Auth(AuthMode::Login));

    // The create-account form never leads to the dashboard
    controller.switch_auth_mode(AuthMode::CreateAccount).unwrap();
    assert!(matches!(
        controller.show_dashboard("alice"),
        Err(SiteScanError::InvalidTransition { .. })
    ));
    assert_eq!(controller.view(), ViewState::Auth(AuthMode::CreateAccount));
    assert!(!controller.state().session.is_active());

    // One analysis page cannot open another directly
    let mut controller = logged_in(idle_backend(), MemoryFiles::default(), settings());
    controller.show_analysis(AnalysisKind::Soil).unwrap();
    assert!(matches!(
        controller.show_analysis(AnalysisKind::Vegetation),
        Err(SiteScanError::InvalidTransition { .. })
    ));
    assert_eq!(controller.view(), ViewState::Analysis(AnalysisKind::Soil));
    assert_eq!(controller.presenter().visible_count(), 1);
}

#[tokio::test]
async fn test_logout_from_dashboard_clears_session() {
    let mut controller = logged_in(idle_backend(), MemoryFiles::default(), settings());
    assert_eq!(controller.view(), ViewState::Dashboard);

    controller.logout().unwrap();

    assert_eq!(controller.view(), ViewState::Auth(AuthMode::Login));
    assert_eq!(controller.state().session.username(), None);
    assert!(!controller.state().session.is_active());
    assert_eq!(controller.presenter().username, None);
    assert_eq!(controller.presenter().visible[&Panel::Auth], true);
    assert_eq!(controller.presenter().visible_count(), 1);

    // The old session cannot be resumed without logging in again
    assert!(controller.back_to_dashboard().is_err());
    assert!(controller.show_analysis(AnalysisKind::Soil).is_err());
}

#[tokio::test]
async fn test_navigation_cycle() {
    let mut controller = logged_in(idle_backend(), MemoryFiles::default(), settings());

    controller.show_analysis(AnalysisKind::Vegetation).unwrap();
    assert_eq!(controller.view(), ViewState::Analysis(AnalysisKind::Vegetation));
    assert_eq!(
        controller.presenter().result_text(),
        "Select an image to begin analysis."
    );

    controller.back_to_dashboard().unwrap();
    assert_eq!(controller.view(), ViewState::Dashboard);
    assert_eq!(controller.state().session.username(), Some("alice"));

    controller.show_analysis(AnalysisKind::Soil).unwrap();
    controller.logout().unwrap();
    assert_eq!(controller.view(), ViewState::Auth(AuthMode::Login));
    assert!(controller.state().session.username().is_none());
    assert!(controller.presenter().username.is_none());
}

#[tokio::test]
async fn test_show_analysis_discards_pending_upload() {
    let files = MemoryFiles::with("site.png", b"pixels");
    let mut controller = logged_in(idle_backend(), files, settings());

    controller.show_analysis(AnalysisKind::Soil).unwrap();
    controller.choose_file("site.png").await.unwrap();
    assert!(controller.state().pending_upload.is_some());
    assert_eq!(
        controller.presenter().preview.as_ref().map(|p| p.data_url.as_str()),
        Some("data:image/png;base64,cGl4ZWxz")
    );

    controller.back_to_dashboard().unwrap();
    controller.show_analysis(AnalysisKind::Vegetation).unwrap();
    assert!(controller.state().pending_upload.is_none());
    assert!(controller.state().preview.is_none());
    assert!(controller.presenter().preview.is_none());
}

#[tokio::test]
async fn test_choose_file_errors() {
    let files = MemoryFiles::with("empty.png", b"");
    let mut controller = logged_in(idle_backend(), files, settings());
    controller.show_analysis(AnalysisKind::Soil).unwrap();

    let err = controller.choose_file("empty.png").await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(
        controller.presenter().message_text(),
        Some("The selected file is empty.")
    );

    let err = controller.choose_file("missing.png").await.unwrap_err();
    assert!(matches!(err, SiteScanError::Io(_)));
    assert_eq!(controller.presenter().message_severity(), Some(Severity::Error));

    // Picking nothing clears the preview without complaint
    controller.choose_file("").await.unwrap();
    assert!(controller.presenter().preview.is_none());
}

#[tokio::test]
async fn test_submit_without_file() {
    let mut controller = logged_in(idle_backend(), MemoryFiles::default(), settings());
    controller.show_analysis(AnalysisKind::Vegetation).unwrap();

    let err = controller.submit().unwrap_err();
    assert_eq!(err.user_message(), "Please select an image first.");
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn test_submit_success_with_mocked_backend() {
    let mut backend = MockAnalysisBackend::new();
    backend
        .expect_analyze()
        .withf(|file, kind| file.name == "site.png" && *kind == AnalysisKind::Vegetation)
        .times(1)
        .returning(|_, _| Ok(vegetation(42.0)));

    let files = MemoryFiles::with("site.png", b"pixels");
    let mut controller = logged_in(Arc::new(backend), files, settings());
    controller.show_analysis(AnalysisKind::Vegetation).unwrap();
    controller.choose_file("site.png").await.unwrap();

    controller.submit().unwrap();
    assert!(controller.is_busy());
    assert!(controller.presenter().busy);
    assert_eq!(controller.presenter().message_text(), Some("Processing image..."));
    assert_eq!(controller.presenter().result, Some(ResultPanel::Loading));

    controller.handle_next_event().await;

    assert!(!controller.is_busy());
    assert_eq!(controller.presenter().result, Some(ResultPanel::Ready(vegetation(42.0))));
    assert_eq!(controller.presenter().message_text(), Some("Analysis complete!"));
    assert_eq!(controller.presenter().message_severity(), Some(Severity::Success));
    // The preview stays visible after submission
    assert!(controller.presenter().preview.is_some());
}

#[tokio::test]
async fn test_second_submit_rejected_while_in_flight() {
    let mut backend = MockAnalysisBackend::new();
    backend
        .expect_analyze()
        .times(1)
        .returning(|_, _| Ok(vegetation(10.0)));

    let files = MemoryFiles::with("site.png", b"pixels");
    let mut controller = logged_in(Arc::new(backend), files, settings());
    controller.show_analysis(AnalysisKind::Vegetation).unwrap();

    controller.choose_file("site.png").await.unwrap();
    controller.submit().unwrap();

    controller.choose_file("site.png").await.unwrap();
    assert!(matches!(controller.submit(), Err(SiteScanError::Busy)));
    assert_eq!(
        controller.presenter().message_text(),
        Some("An analysis is already in progress.")
    );

    controller.handle_next_event().await;
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn test_navigation_away_drops_in_flight_result() {
    let mut backend = MockAnalysisBackend::new();
    backend
        .expect_analyze()
        .returning(|_, _| Ok(vegetation(99.0)));

    let files = MemoryFiles::with("site.png", b"pixels");
    let mut controller = logged_in(Arc::new(backend), files, settings());
    controller.show_analysis(AnalysisKind::Vegetation).unwrap();
    controller.choose_file("site.png").await.unwrap();
    controller.submit().unwrap();

    controller.back_to_dashboard().unwrap();
    assert!(!controller.is_busy());
    controller.show_analysis(AnalysisKind::Vegetation).unwrap();

    tokio::task::yield_now().await;
    controller.drain_events();
    assert_eq!(controller.presenter().result, Some(ResultPanel::Idle));
}

#[tokio::test]
async fn test_backend_error_renders_failure() {
    let mut backend = MockAnalysisBackend::new();
    backend.expect_analyze().returning(|_, _| {
        Err(SiteScanError::Network("connection refused".to_string()))
    });

    let files = MemoryFiles::with("site.png", b"pixels");
    let mut controller = logged_in(Arc::new(backend), files, settings());
    controller.show_analysis(AnalysisKind::Soil).unwrap();
    controller.choose_file("site.png").await.unwrap();
    controller.submit().unwrap();
    controller.handle_next_event().await;

    assert_eq!(controller.presenter().message_text(), Some("connection refused"));
    assert_eq!(controller.presenter().result_text(), "Error processing image.");
}

#[tokio::test]
async fn test_auto_submit_sends_on_selection() {
    let mut backend = MockAnalysisBackend::new();
    backend
        .expect_analyze()
        .times(1)
        .returning(|_, _| Ok(vegetation(5.0)));

    let files = MemoryFiles::with("site.png", b"pixels");
    let settings = ControllerSettings {
        auto_submit: true,
        ..settings()
    };
    let mut controller = logged_in(Arc::new(backend), files, settings);
    controller.show_analysis(AnalysisKind::Vegetation).unwrap();

    controller.choose_file("site.png").await.unwrap();
    assert!(controller.is_busy());
    controller.handle_next_event().await;
    assert_eq!(controller.presenter().message_text(), Some("Analysis complete!"));
}

#[tokio::test]
async fn test_vegetation_against_stub_server() {
    let (url, _captured) = serve_once(
        200,
        r#"{"vegetation_percentage": 42, "classification": "moderate", "message": "ok"}"#,
    )
    .await;
    let backend = Arc::new(HttpAnalysisClient::new(&url, None).unwrap());

    let files = MemoryFiles::with("site.png", b"pixels");
    let mut controller = logged_in(backend, files, settings());
    controller.show_analysis(AnalysisKind::Vegetation).unwrap();
    controller.choose_file("site.png").await.unwrap();
    controller.submit().unwrap();
    controller.handle_next_event().await;

    let rendered = controller.presenter().result_text();
    assert!(rendered.contains("42"));
    assert!(rendered.contains("moderate"));
    assert_eq!(controller.presenter().message_severity(), Some(Severity::Success));
}

#[tokio::test]
async fn test_soil_server_error_against_stub_server() {
    let (url, _captured) = serve_once(500, r#"{"detail": "bad image"}"#).await;
    let backend = Arc::new(HttpAnalysisClient::new(&url, None).unwrap());

    let files = MemoryFiles::with("site.png", b"pixels");
    let mut controller = logged_in(backend, files, settings());
    controller.show_analysis(AnalysisKind::Soil).unwrap();
    controller.choose_file("site.png").await.unwrap();
    controller.submit().unwrap();
    controller.handle_next_event().await;

    assert_eq!(controller.presenter().message_text(), Some("bad image"));
    assert_eq!(controller.presenter().message_severity(), Some(Severity::Error));
    assert_eq!(controller.presenter().result_text(), "Error processing image.");
}

#[tokio::test(start_paused = true)]
async fn test_message_auto_clears() {
    let mut controller = controller_with(idle_backend(), MemoryFiles::default(), settings());

    controller.set_message("hello", Severity::Info);
    controller.handle_next_event().await;

    assert!(controller.presenter().message.is_none());
    assert!(controller.state().message.current().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_newer_message_outlives_older_timer() {
    let mut controller = controller_with(idle_backend(), MemoryFiles::default(), settings());

    controller.set_message("first", Severity::Info);
    tokio::time::advance(Duration::from_secs(3)).await;
    controller.set_message("second", Severity::Error);

    // Past the first message's deadline the second is still shown
    tokio::time::advance(Duration::from_secs(3)).await;
    tokio::task::yield_now().await;
    controller.drain_events();
    assert_eq!(controller.presenter().message_text(), Some("second"));

    // Its own timer eventually clears it
    controller.handle_next_event().await;
    assert!(controller.presenter().message.is_none());
}

#[derive(Debug, Clone)]
enum NavCall {
    Auth(AuthMode),
    Dashboard(String),
    Analysis(AnalysisKind),
    Back,
    Logout,
}

fn nav_call() -> impl Strategy<Value = NavCall> {
    prop_oneof![
        prop_oneof![Just(AuthMode::Login), Just(AuthMode::CreateAccount)].prop_map(NavCall::Auth),
        "[a-z]{0,6}".prop_map(NavCall::Dashboard),
        prop_oneof![Just(AnalysisKind::Vegetation), Just(AnalysisKind::Soil)]
            .prop_map(NavCall::Analysis),
        Just(NavCall::Back),
        Just(NavCall::Logout),
    ]
}

proptest! {
    #[test]
    fn prop_exactly_one_view_visible(calls in proptest::collection::vec(nav_call(), 1..40)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let _guard = rt.enter();

        let mut controller = controller_with(idle_backend(), MemoryFiles::default(), settings());
        for call in calls {
            let _ = match call {
                NavCall::Auth(mode) => {
                    controller.show_auth(mode);
                    Ok(())
                }
                NavCall::Dashboard(name) => controller.show_dashboard(&name),
                NavCall::Analysis(kind) => controller.show_analysis(kind),
                NavCall::Back => controller.back_to_dashboard(),
                NavCall::Logout => controller.logout(),
            };
            prop_assert_eq!(controller.presenter().visible_count(), 1);
            prop_assert_eq!(
                controller.presenter().visible[&controller.view().panel()],
                true
            );
        }
    }
}
