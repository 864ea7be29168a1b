pub mod analysis;
pub mod app;
pub mod cli;
pub mod constants;
pub mod controller;
pub mod presentation;
pub mod runtime;
pub mod session;
pub mod tui;
pub mod utils;

pub use analysis::{AnalysisBackend, AnalysisKind, AnalysisResult, BackendFactory};
pub use app::{load_config, Config};
pub use controller::{Controller, ViewState};
pub use tui::run_ui;
pub use utils::SiteScanError;
