// Gateway module for analysis - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod client;
mod factory;
mod simulated;
mod traits;
mod types;

// Public re-exports - the ONLY way to access analysis functionality
pub use client::HttpAnalysisClient;
pub use factory::BackendFactory;
pub use simulated::SimulatedBackend;
pub use traits::AnalysisBackend;
pub use types::{
    confidence_percent, AnalysisKind, AnalysisResult, SoilResult, VegetationResult,
};

#[cfg(test)]
pub(crate) use client::stub;
#[cfg(test)]
pub(crate) use traits::MockAnalysisBackend;
