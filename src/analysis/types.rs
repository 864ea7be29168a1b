use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{RESULT_FAILED, SOIL_ENDPOINT, VEGETATION_ENDPOINT};

/// Which of the two remote endpoints a submission targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Vegetation,
    Soil,
}

impl AnalysisKind {
    /// Path appended to the backend base URL
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Vegetation => VEGETATION_ENDPOINT,
            Self::Soil => SOIL_ENDPOINT,
        }
    }

    /// Heading shown on the analysis page
    pub fn title(&self) -> &'static str {
        match self {
            Self::Vegetation => "Vegetation Analysis",
            Self::Soil => "Soil Detection",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Success body of `POST /analyze-vegetation/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetationResult {
    pub vegetation_percentage: f64,
    pub classification: String,
    pub message: String,
}

/// Success body of `POST /detect-soil/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilResult {
    pub soil_type: String,
    /// Fraction in `0..=1`
    pub confidence_score: f64,
    pub message: String,
}

/// Error body the backend sends with non-success statuses.
///
/// `detail` is usually a string, but validation failures carry a list of
/// objects, so any JSON value is accepted.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Text for the message slot; `None` when the detail is missing or empty
    pub fn message(&self) -> Option<String> {
        use serde_json::Value;

        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(text.clone()),
            Value::Array(items) if items.is_empty() => None,
            Value::Object(fields) if fields.is_empty() => None,
            other => Some(other.to_string()),
        }
    }
}

/// Outcome of one analysis, ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisResult {
    Vegetation(VegetationResult),
    Soil(SoilResult),
    Error { message: String },
}

impl AnalysisResult {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Vegetation(_) => AnalysisKind::Vegetation.title(),
            Self::Soil(_) => AnalysisKind::Soil.title(),
            Self::Error { .. } => "Error",
        }
    }

    /// Fixed-structure summary lines for the result panel
    pub fn summary_lines(&self) -> Vec<String> {
        match self {
            Self::Vegetation(v) => vec![
                format!("Vegetation %: {}%", v.vegetation_percentage),
                format!("Classification: {}", v.classification),
                v.message.clone(),
            ],
            Self::Soil(s) => vec![
                format!("Soil Type: {}", s.soil_type),
                format!("Confidence: {}%", confidence_percent(s.confidence_score)),
                s.message.clone(),
            ],
            Self::Error { .. } => vec![RESULT_FAILED.to_string()],
        }
    }
}

/// Whole-number percentage for a `0..=1` confidence score
pub fn confidence_percent(score: f64) -> i64 {
    (score * 100.0).round() as i64
}
