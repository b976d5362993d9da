use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unsupported file type")]
    UnsupportedFileType,
    #[error("file size ({size}) exceeds the maximum allowed size of {limit}")]
    FileTooLarge { size: String, limit: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{message}")]
    AnalysisService { status: u16, message: String },
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn status(&self) -> Option<u16> {
        match self {
            CoreError::AnalysisService { status, .. } => Some(*status),
            _ => None,
        }
    }
}
