use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::time::Duration;

use super::traits::AnalysisBackend;
use super::types::{AnalysisKind, AnalysisResult, SoilResult, VegetationResult};
use crate::constants::{MOCK_MESSAGE, MOCK_SOIL_TYPES, MSG_EMPTY_FILE};
use crate::presentation::ImageFile;
use crate::utils::SiteScanError;

/// Fabricates results locally without contacting any service.
///
/// Values are derived from the SHA-256 of the image so the same file always
/// yields the same result.
pub struct SimulatedBackend {
    latency: Duration,
}

impl SimulatedBackend {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Build the result for `file` without waiting
    pub fn fabricate(file: &ImageFile, kind: AnalysisKind) -> AnalysisResult {
        let digest = Sha256::digest(&file.bytes);
        let seed = u16::from_be_bytes([digest[0], digest[1]]);

        match kind {
            AnalysisKind::Vegetation => {
                // One decimal place in [0, 100)
                let percentage = f64::from(seed % 1000) / 10.0;
                AnalysisResult::Vegetation(VegetationResult {
                    vegetation_percentage: percentage,
                    classification: classify_vegetation(percentage).to_string(),
                    message: MOCK_MESSAGE.to_string(),
                })
            }
            AnalysisKind::Soil => {
                let soil_type = MOCK_SOIL_TYPES[usize::from(digest[2]) % MOCK_SOIL_TYPES.len()];
                // Two decimal places in [0.5, 1.0)
                let confidence = 0.5 + f64::from(seed % 50) / 100.0;
                AnalysisResult::Soil(SoilResult {
                    soil_type: soil_type.to_string(),
                    confidence_score: confidence,
                    message: MOCK_MESSAGE.to_string(),
                })
            }
        }
    }
}

fn classify_vegetation(percentage: f64) -> &'static str {
    if percentage < 30.0 {
        "low"
    } else if percentage < 60.0 {
        "moderate"
    } else {
        "high"
    }
}

#[async_trait]
impl AnalysisBackend for SimulatedBackend {
    async fn analyze(
        &self,
        file: ImageFile,
        kind: AnalysisKind,
    ) -> Result<AnalysisResult, SiteScanError> {
        if file.is_empty() {
            return Err(SiteScanError::Validation(MSG_EMPTY_FILE.to_string()));
        }

        tracing::debug!("Mock analysis of {} as {}", file.name, kind);
        tokio::time::sleep(self.latency).await;
        Ok(Self::fabricate(&file, kind))
    }

    fn name(&self) -> String {
        "mock".to_string()
    }
}
