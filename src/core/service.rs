use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;
use tracing::{info, info_span, Instrument};

use super::analysis_client::AnalysisClient;
use super::config::ApiConfig;
use super::errors::CoreError;
use super::models::{AnalysisResponse, UploadCandidate};
use super::session::{AnalysisSession, AttemptState};

/// Read-only copy of the session for rendering.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub state: AttemptState,
    pub busy: bool,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub job_description: String,
    pub result: Option<AnalysisResponse>,
    pub error: Option<String>,
    pub reveal_results: bool,
}

pub struct CoreService {
    config: ApiConfig,
    client: AnalysisClient,
    session: Mutex<AnalysisSession>,
}

impl CoreService {
    pub fn new(config: ApiConfig) -> anyhow::Result<Arc<Self>> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ResumeMatchDesktop/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: ApiConfig, client: reqwest::Client) -> Arc<Self> {
        Arc::new(Self {
            config,
            client: AnalysisClient::new(client),
            session: Mutex::new(AnalysisSession::new()),
        })
    }

    pub async fn select_file(&self, candidate: UploadCandidate) -> Result<(), String> {
        self.session.lock().await.select_file(candidate)
    }

    pub async fn set_job_description(&self, text: impl Into<String>) {
        self.session.lock().await.set_job_description(text);
    }

    /// Runs one analysis attempt. Returns `false` without touching the network when an
    /// attempt is already in flight or an input is missing.
    pub async fn analyze(&self) -> bool {
        let Some(request) = self.session.lock().await.begin_submit() else {
            return false;
        };

        let span = info_span!("analysis", attempt_id = %request.attempt_id);
        let result = async {
            info!(file = request.upload.file_name(), "submitting resume for analysis");
            self.client
                .analyze(&self.config, &request.upload, &request.job_description)
                .await
        }
        .instrument(span)
        .await
        .map_err(|err| {
            if let Some(status) = err.downcast_ref::<CoreError>().and_then(CoreError::status) {
                info!(status, "analysis service returned an error status");
            }
            err.to_string()
        });

        self.session
            .lock()
            .await
            .finish_submit(request.attempt_id, result);
        true
    }

    /// Clears the session. Returns `false` while an attempt is in flight.
    pub async fn reset(&self) -> bool {
        self.session.lock().await.reset()
    }

    pub async fn snapshot(&self) -> SessionView {
        let mut session = self.session.lock().await;
        let reveal_results = session.take_reveal_results();
        let upload = session.upload();

        SessionView {
            state: session.state(),
            busy: session.is_busy(),
            file_name: upload.map(|u| u.file_name().to_string()),
            file_size: upload.map(|u| u.size_bytes()),
            job_description: session.job_description().to_string(),
            result: session.result().cloned(),
            error: session.error().map(str::to_string),
            reveal_results,
        }
    }
}
