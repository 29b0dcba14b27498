use cam4_platforms::extractor::error::ExtractorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Extractor(#[from] ExtractorError),

    #[error("{username}: {source}")]
    Performer {
        username: String,
        #[source]
        source: ExtractorError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to write configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// Performer-state outcomes, printed without the "Error:" prefix.
    pub fn is_expected(&self) -> bool {
        match self {
            AppError::Extractor(e) | AppError::Performer { source: e, .. } => e.is_expected(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
