use async_trait::async_trait;

use super::types::{AnalysisKind, AnalysisResult};
use crate::presentation::ImageFile;
use crate::utils::SiteScanError;

/// Core trait that every analysis backend implements
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Submit one image and wait for the structured result.
    ///
    /// Returns `Vegetation` or `Soil` matching `kind` on success; every
    /// failure is reported through the error.
    async fn analyze(
        &self,
        file: ImageFile,
        kind: AnalysisKind,
    ) -> Result<AnalysisResult, SiteScanError>;

    /// Human-readable backend name for status output
    fn name(&self) -> String;
}
