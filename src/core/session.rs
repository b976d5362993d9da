//! In-memory state for one analysis attempt at a time.
//!
//! The session owns the selected upload, the job description, and whatever the last
//! attempt produced. Handlers mutate it synchronously; the network call happens outside
//! and reports back through [`AnalysisSession::finish_submit`].

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::models::{AnalysisOutcome, AnalysisResponse, UploadCandidate};
use super::validation::{validate_upload, ValidatedUpload};

pub const MISSING_INPUT_MESSAGE: &str = "Please upload a resume and enter a job description";
pub const BUSY_MESSAGE: &str = "An analysis is already in progress";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttemptState {
    #[default]
    Idle,
    Rejected,
    Accepted,
    Submitting,
    Succeeded,
    SucceededWithServiceError,
    Failed,
}

/// Inputs captured when an attempt starts.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub attempt_id: Uuid,
    pub upload: ValidatedUpload,
    pub job_description: String,
}

#[derive(Debug, Default)]
pub struct AnalysisSession {
    upload: Option<ValidatedUpload>,
    job_description: String,
    outcome: Option<AnalysisOutcome>,
    error: Option<String>,
    in_flight: Option<Uuid>,
    state: AttemptState,
    reveal_results: bool,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the validation gate on a newly selected file.
    ///
    /// A rejected file clears any previous selection; an accepted one clears the error and
    /// the previous result.
    pub fn select_file(&mut self, candidate: UploadCandidate) -> Result<(), String> {
        if self.in_flight.is_some() {
            return Err(BUSY_MESSAGE.to_string());
        }

        let file_name = candidate.file_name.clone();
        match validate_upload(candidate) {
            Ok(upload) => {
                debug!(file = %file_name, size = upload.size_bytes(), "upload accepted");
                self.upload = Some(upload);
                self.error = None;
                self.outcome = None;
                self.reveal_results = false;
                self.state = AttemptState::Accepted;
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                debug!(file = %file_name, %message, "upload rejected");
                self.upload = None;
                self.error = Some(message.clone());
                self.state = AttemptState::Rejected;
                Err(message)
            }
        }
    }

    /// Ignored while an attempt is running; the submitted text is already captured.
    pub fn set_job_description(&mut self, text: impl Into<String>) {
        if self.in_flight.is_none() {
            self.job_description = text.into();
        }
    }

    /// Starts an attempt. Returns `None` while another attempt is running or when an input
    /// is missing.
    pub fn begin_submit(&mut self) -> Option<SubmitRequest> {
        if self.in_flight.is_some() {
            debug!("analysis already in flight; ignoring submit");
            return None;
        }

        let upload = match &self.upload {
            Some(upload) if !self.job_description.trim().is_empty() => upload.clone(),
            _ => {
                self.error = Some(MISSING_INPUT_MESSAGE.to_string());
                return None;
            }
        };

        let attempt_id = Uuid::new_v4();
        self.in_flight = Some(attempt_id);
        self.error = None;
        self.reveal_results = false;
        self.state = AttemptState::Submitting;

        Some(SubmitRequest {
            attempt_id,
            upload,
            job_description: self.job_description.clone(),
        })
    }

    /// Records the result of an attempt. Results for an attempt that is not the current one
    /// are dropped and `false` is returned.
    pub fn finish_submit(
        &mut self,
        attempt_id: Uuid,
        result: Result<AnalysisResponse, String>,
    ) -> bool {
        if self.in_flight != Some(attempt_id) {
            debug!(%attempt_id, "discarding result of a stale attempt");
            return false;
        }
        self.in_flight = None;

        match result.map(AnalysisOutcome::from_response) {
            Ok(outcome) => match outcome.error_message().map(str::to_string) {
                Some(message) => {
                    warn!(%attempt_id, %message, "analysis service reported an error");
                    self.error = Some(message);
                    self.outcome = Some(outcome);
                    self.state = AttemptState::SucceededWithServiceError;
                }
                None => {
                    info!(%attempt_id, "analysis completed");
                    self.outcome = Some(outcome);
                    self.error = None;
                    self.reveal_results = true;
                    self.state = AttemptState::Succeeded;
                }
            },
            Err(message) => {
                warn!(%attempt_id, %message, "analysis failed");
                self.error = Some(message);
                self.state = AttemptState::Failed;
            }
        }

        true
    }

    /// Returns to the initial empty state. Refused (returns `false`) while an attempt is in
    /// flight, so a second request can never start before the first one resolves.
    pub fn reset(&mut self) -> bool {
        if self.in_flight.is_some() {
            debug!("analysis in flight; ignoring reset");
            return false;
        }

        *self = Self::default();
        true
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn upload(&self) -> Option<&ValidatedUpload> {
        self.upload.as_ref()
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The result to display, hidden whenever an error is showing.
    pub fn result(&self) -> Option<&AnalysisResponse> {
        if self.error.is_some() {
            return None;
        }

        match &self.outcome {
            Some(AnalysisOutcome::Completed(response)) => Some(response),
            _ => None,
        }
    }

    /// Returns `true` once after a clean success so the view can bring the results into focus.
    pub fn take_reveal_results(&mut self) -> bool {
        std::mem::take(&mut self.reveal_results)
    }
}
