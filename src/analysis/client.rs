use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;

use super::traits::AnalysisBackend;
use super::types::{AnalysisKind, AnalysisResult, ErrorBody, SoilResult, VegetationResult};
use crate::constants::{MSG_BACKEND_ERROR, MSG_EMPTY_FILE, UPLOAD_FIELD_NAME};
use crate::presentation::ImageFile;
use crate::utils::SiteScanError;

/// Talks to the remote analysis service over JSON-over-HTTP
pub struct HttpAnalysisClient {
    client: Client,
    base_url: String,
    name: String,
}

impl HttpAnalysisClient {
    /// Create a client for `base_url`. No timeout is applied unless one is given.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, SiteScanError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SiteScanError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            name: format!("remote ({})", base_url),
            base_url,
        })
    }

    /// Full URL for an analysis kind
    pub fn endpoint_url(&self, kind: AnalysisKind) -> String {
        format!("{}{}", self.base_url, kind.endpoint())
    }

    fn build_form(file: &ImageFile) -> Result<Form, SiteScanError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.mime)
            .map_err(|e| SiteScanError::Validation(format!("Invalid file type: {}", e)))?;
        Ok(Form::new().part(UPLOAD_FIELD_NAME, part))
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisClient {
    async fn analyze(
        &self,
        file: ImageFile,
        kind: AnalysisKind,
    ) -> Result<AnalysisResult, SiteScanError> {
        if file.is_empty() {
            return Err(SiteScanError::Validation(MSG_EMPTY_FILE.to_string()));
        }

        let url = self.endpoint_url(kind);
        let form = Self::build_form(&file)?;

        tracing::info!("Uploading {} ({} bytes) to {}", file.name, file.len(), url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SiteScanError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message())
                .unwrap_or_else(|| MSG_BACKEND_ERROR.to_string());

            tracing::warn!("Backend returned {} for {}: {}", status, url, message);
            return Err(SiteScanError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SiteScanError::Network(e.to_string()))?;

        let result = match kind {
            AnalysisKind::Vegetation => {
                serde_json::from_slice::<VegetationResult>(&body).map(AnalysisResult::Vegetation)
            }
            AnalysisKind::Soil => {
                serde_json::from_slice::<SoilResult>(&body).map(AnalysisResult::Soil)
            }
        }
        .map_err(|e| SiteScanError::Decode(e.to_string()))?;

        tracing::debug!("Analysis result from {}: {:?}", url, result);
        Ok(result)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}
