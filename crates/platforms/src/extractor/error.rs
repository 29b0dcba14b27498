use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
    #[error("unsupported extractor")]
    UnsupportedExtractor,
    #[error("Performer not found")]
    PerformerNotFound,
    #[error("Performer is currently offline")]
    PerformerOffline,
    #[error("Performer is online but not currently streaming")]
    PerformerNotStreaming,
    #[error("Stream info found but no playlist URL available")]
    NoPlaylistUrl,
    #[error("Stream not accessible - performer may be in a private show or away")]
    StreamNotAccessible,
    #[error("hls playlist error: {0}")]
    HlsPlaylistError(String),
    #[error("flaresolverr error: {0}")]
    FlareSolverr(String),
    #[error("process error: {0}")]
    ProcessError(String),
}

impl ExtractorError {
    /// Errors that describe the performer's state rather than a failure of
    /// the tool itself. Callers usually print these without a backtrace.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            ExtractorError::InvalidUrl(_)
                | ExtractorError::PerformerNotFound
                | ExtractorError::PerformerOffline
                | ExtractorError::PerformerNotStreaming
                | ExtractorError::NoPlaylistUrl
                | ExtractorError::StreamNotAccessible
        )
    }
}
