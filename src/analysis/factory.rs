use anyhow::{Context as _, Result};
use std::sync::Arc;

use super::client::HttpAnalysisClient;
use super::simulated::SimulatedBackend;
use super::traits::AnalysisBackend;
use crate::app::{BackendMode, Config};

/// Factory for creating the configured analysis backend
pub struct BackendFactory;

impl BackendFactory {
    /// Create the backend selected by `config.backend.mode`
    pub fn create(config: &Config) -> Result<Arc<dyn AnalysisBackend>> {
        let backend: Arc<dyn AnalysisBackend> = match config.backend.mode {
            BackendMode::Remote => {
                let url = config.backend.url.trim();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    anyhow::bail!(
                        "Invalid backend URL '{}'. Expected an http:// or https:// URL",
                        url
                    );
                }
                let client = HttpAnalysisClient::new(url, config.backend.request_timeout())
                    .context("Failed to create analysis client")?;
                Arc::new(client)
            }
            BackendMode::Mock => Arc::new(SimulatedBackend::new(config.backend.mock_latency())),
        };

        tracing::info!("Using analysis backend: {}", backend.name());
        Ok(backend)
    }
}
