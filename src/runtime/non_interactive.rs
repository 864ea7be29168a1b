use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use crate::{
    analysis::{AnalysisBackend, AnalysisKind, AnalysisResult, BackendFactory},
    app::Config,
    cli::OutputFormat,
    presentation::{DiskFileSource, FileSource},
    utils::SiteScanError,
};

/// Result of a non-interactive run
#[derive(Debug, Serialize)]
pub struct NonInteractiveResult {
    /// File that was uploaded
    pub file: String,
    pub kind: AnalysisKind,
    /// The backend's answer, or the error placeholder
    pub result: AnalysisResult,
    /// Metadata about the execution
    pub metadata: ExecutionMetadata,
}

#[derive(Debug, Serialize)]
pub struct ExecutionMetadata {
    /// Backend used
    pub backend: String,
    /// Execution time in milliseconds
    pub duration_ms: u128,
    /// HTTP status when the backend rejected the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl NonInteractiveResult {
    pub fn is_error(&self) -> bool {
        self.result.is_error()
    }
}

/// Non-interactive runner for analyzing a single image
pub struct NonInteractiveRunner {
    backend: Arc<dyn AnalysisBackend>,
    files: Arc<dyn FileSource>,
}

impl NonInteractiveRunner {
    /// Create a runner for the configured backend
    pub fn new(config: &Config) -> Result<Self> {
        let backend = BackendFactory::create(config)?;
        Ok(Self::with_backend(backend, Arc::new(DiskFileSource)))
    }

    pub fn with_backend(backend: Arc<dyn AnalysisBackend>, files: Arc<dyn FileSource>) -> Self {
        Self { backend, files }
    }

    /// Upload `path` for `kind` and wait for the answer.
    ///
    /// Backend failures are reported inside the result; only an unreadable
    /// file is an `Err`.
    pub async fn execute(&self, kind: AnalysisKind, path: &Path) -> Result<NonInteractiveResult> {
        let start_time = std::time::Instant::now();
        let selector = path.to_string_lossy();

        let file = self
            .files
            .select_file(&selector)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?
            .ok_or_else(|| anyhow::anyhow!("No file given"))?;

        let file_name = file.name.clone();
        tracing::info!("Analyzing {} with {}", file_name, self.backend.name());

        let (result, status) = match self.backend.analyze(file, kind).await {
            Ok(result) => (result, None),
            Err(err) => {
                tracing::error!("{} failed: {}", kind, err);
                let status = match &err {
                    SiteScanError::Server { status, .. } => Some(*status),
                    _ => None,
                };
                (
                    AnalysisResult::Error {
                        message: err.user_message(),
                    },
                    status,
                )
            }
        };

        Ok(NonInteractiveResult {
            file: file_name,
            kind,
            result,
            metadata: ExecutionMetadata {
                backend: self.backend.name(),
                duration_ms: start_time.elapsed().as_millis(),
                status,
            },
        })
    }

    /// Format a result for printing
    pub fn format_result(&self, result: &NonInteractiveResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(result)
                .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize result: {}\"}}", e)),
            OutputFormat::Text => {
                let mut output = String::new();
                output.push_str(&format!("{}: {}\n", result.kind.title().bold(), result.file));

                match &result.result {
                    AnalysisResult::Error { message } => {
                        for line in result.result.summary_lines() {
                            output.push_str(&format!("{}\n", line.red()));
                        }
                        output.push_str(&format!("{}\n", message));
                    }
                    ok => {
                        for line in ok.summary_lines() {
                            output.push_str(&format!("{}\n", line));
                        }
                    }
                }

                output.push_str(&format!(
                    "{}\n",
                    format!(
                        "Backend: {} | Duration: {}ms",
                        result.metadata.backend, result.metadata.duration_ms
                    )
                    .dimmed()
                ));
                output
            }
        }
    }
}
