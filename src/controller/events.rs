use crate::analysis::{AnalysisKind, AnalysisResult};
use crate::utils::SiteScanError;

/// Completion notices posted by the controller's background tasks.
///
/// Tasks never touch state directly; the controller applies these on its
/// own thread and drops any whose token no longer matches.
#[derive(Debug)]
pub enum ControllerEvent {
    /// The artificial login delay elapsed
    LoginReady { token: u64 },
    /// A message's display time is over
    MessageExpired { id: u64 },
    /// An analysis request settled
    AnalysisFinished {
        token: u64,
        kind: AnalysisKind,
        outcome: Result<AnalysisResult, SiteScanError>,
    },
}
