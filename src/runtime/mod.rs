/// Runtime orchestrator module - Gateway

mod non_interactive;
mod orchestrator;

pub use non_interactive::{ExecutionMetadata, NonInteractiveResult, NonInteractiveRunner};
pub use orchestrator::{apply_overrides, resolve_config, Orchestrator};
