use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where the bytes of an upload live. The content is never read into memory by the
/// session; the submission client streams it straight into the request body.
#[derive(Debug, Clone)]
pub enum UploadContent {
    File(PathBuf),
    Memory(Bytes),
}

#[derive(Debug, Clone)]
pub struct UploadCandidate {
    pub file_name: String,
    pub size_bytes: u64,
    pub content: UploadContent,
}

impl UploadCandidate {
    pub fn from_bytes(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            file_name: file_name.into(),
            size_bytes: data.len() as u64,
            content: UploadContent::Memory(data),
        }
    }

    /// Builds a candidate from file metadata only; the file itself is opened at submit time.
    pub async fn from_path(path: &Path) -> anyhow::Result<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        let file_name = path
            .file_name()
            .and_then(|v| v.to_str())
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            file_name,
            size_bytes: metadata.len(),
            content: UploadContent::File(path.to_path_buf()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub score: f64,
    #[serde(default)]
    pub matching_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub missing_qualifications: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_ai: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error body of the service. `detail` is a string for handled errors and a list of
/// `{loc, msg, type}` objects for request validation failures (422).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDetail {
    pub detail: Option<Value>,
}

impl ErrorDetail {
    pub fn message(&self) -> Option<String> {
        let message = match self.detail.as_ref()? {
            Value::Null => return None,
            Value::String(text) => text.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item.get("msg").and_then(Value::as_str) {
                    Some(msg) => msg.to_string(),
                    None => item.as_str().map(str::to_string).unwrap_or_else(|| item.to_string()),
                })
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        };

        Some(message).filter(|v| !v.trim().is_empty())
    }
}

/// A service response with the embedded `error` field resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Completed(AnalysisResponse),
    ServiceError { message: String },
}

impl AnalysisOutcome {
    pub fn from_response(response: AnalysisResponse) -> Self {
        match response.error.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => AnalysisOutcome::ServiceError {
                message: message.to_string(),
            },
            _ => AnalysisOutcome::Completed(response),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            AnalysisOutcome::Completed(_) => None,
            AnalysisOutcome::ServiceError { message } => Some(message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Excellent
        } else if score >= 60.0 {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent Match",
            ScoreBand::Good => "Good Match",
            ScoreBand::NeedsImprovement => "Needs Improvement",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            BuildMode::Development
        } else {
            BuildMode::Production
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(BuildMode::Development),
            "production" | "prod" => Some(BuildMode::Production),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSettings {
    pub api_url: Option<String>,
    pub origin: Option<String>,
}

impl PersistedSettings {
    pub fn sanitized(self) -> Self {
        Self {
            api_url: non_blank(self.api_url),
            origin: non_blank(self.origin),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
