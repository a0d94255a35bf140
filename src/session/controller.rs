//! Submission controller
//!
//! The reducer that owns the session: which snapshot is active, what the
//! latest submission did, and which in-flight request is still allowed to
//! commit a result. All transitions happen here so the flow can be tested
//! without a camera or a network.

use crate::capture::image::Snapshot;
use crate::remote::UploadError;
use crate::session::results::ResultSet;
use crate::session::state::SubmissionState;

/// A submit the controller has authorized.
///
/// The caller performs the request and reports back through
/// [`Controller::finish`] with the same generation tag.
#[derive(Clone, Debug)]
pub struct PendingUpload {
    pub generation: u64,
    pub snapshot: Snapshot,
}

/// What an upload came back with
#[derive(Debug)]
pub enum UploadOutcome {
    Success(ResultSet),
    Failure(UploadError),
}

#[derive(Debug, Default)]
pub struct Controller {
    state: SubmissionState,
    snapshot: Option<Snapshot>,
    results: Option<ResultSet>,
    last_error: Option<String>,
    generation: u64,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Install a fresh snapshot.
    ///
    /// Allowed in every state. Clears previous results and error state and
    /// invalidates any request still in flight.
    pub fn capture(&mut self, snapshot: Snapshot) {
        self.generation += 1;
        self.snapshot = Some(snapshot);
        self.results = None;
        self.last_error = None;
        self.state = SubmissionState::Captured;
        log::debug!("captured snapshot, generation {}", self.generation);
    }

    /// Authorize an upload of the active snapshot.
    ///
    /// Returns `None` when no snapshot exists and changes nothing in that
    /// case. A new authorization supersedes any request still in flight;
    /// the superseded one is discarded when it lands.
    pub fn submit(&mut self) -> Option<PendingUpload> {
        let snapshot = self.snapshot.clone()?;
        self.generation += 1;
        self.state = SubmissionState::Uploading;
        log::debug!("submitting snapshot, generation {}", self.generation);
        Some(PendingUpload {
            generation: self.generation,
            snapshot,
        })
    }

    /// Commit an upload outcome.
    ///
    /// An outcome tagged with a superseded generation is dropped without
    /// touching any state; the return value says whether the outcome was
    /// committed. A failure keeps the results of an earlier success
    /// visible.
    pub fn finish(&mut self, generation: u64, outcome: UploadOutcome) -> bool {
        if generation != self.generation {
            log::debug!(
                "discarding stale upload outcome (generation {generation}, current {})",
                self.generation
            );
            return false;
        }
        match outcome {
            UploadOutcome::Success(results) => {
                self.results = Some(results);
                self.last_error = None;
                self.state = SubmissionState::Succeeded;
            }
            UploadOutcome::Failure(err) => {
                log::error!("upload failed: {err}");
                self.last_error = Some(err.to_string());
                self.state = SubmissionState::Failed;
            }
        }
        true
    }
}
