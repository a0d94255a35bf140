//! Submission lifecycle states

use std::fmt;

/// Lifecycle of the capture-and-submit flow.
///
/// The state always describes the LATEST submission; an older request still
/// in flight no longer owns the state and its outcome is discarded when it
/// lands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
    /// No snapshot taken yet
    #[default]
    Idle,
    /// A snapshot exists and nothing is in flight for it
    Captured,
    /// The latest submission is in flight
    Uploading,
    /// The latest submission came back with a result set
    Succeeded,
    /// The latest submission failed
    Failed,
}

impl SubmissionState {
    /// Whether a submit would do anything in this state.
    ///
    /// Submitting needs a snapshot, not a particular phase: resubmitting
    /// after success or failure is fine, and submitting while a request is
    /// in flight just supersedes it.
    pub fn allows_submit(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self, Self::Uploading)
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Captured => "captured",
            Self::Uploading => "uploading",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        })
    }
}
