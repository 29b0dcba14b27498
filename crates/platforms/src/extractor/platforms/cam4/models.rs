use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extractor::error::ExtractorError;

/// Body of `GET /rest/v1.0/profile/{username}/info`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInfo {
    #[serde(default)]
    pub online: Option<Value>,
}

impl ProfileInfo {
    /// Missing, `null`, `false`, zero and empty values all read as offline.
    pub fn is_online(&self) -> bool {
        match &self.online {
            None | Some(Value::Null) => false,
            Some(Value::Bool(online)) => *online,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
        }
    }
}

/// Body of `GET /rest/v1.0/profile/{username}/streamInfo`, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamMetadata(Value);

impl StreamMetadata {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// HLS master playlist of the live stream, if the service provided one.
    pub fn cdn_url(&self) -> Option<&str> {
        self.0
            .get("cdnURL")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformerStatus {
    NotFound,
    Offline,
    OnlineNotStreaming,
    PrivateOrAway,
    Streaming,
}

impl PerformerStatus {
    /// Map a terminal probe error to the status it reports.
    ///
    /// Transport and decoding failures have no status and return `None`.
    pub fn from_error(error: &ExtractorError) -> Option<Self> {
        match error {
            ExtractorError::PerformerNotFound => Some(Self::NotFound),
            ExtractorError::PerformerOffline => Some(Self::Offline),
            ExtractorError::PerformerNotStreaming | ExtractorError::NoPlaylistUrl => {
                Some(Self::OnlineNotStreaming)
            }
            ExtractorError::StreamNotAccessible => Some(Self::PrivateOrAway),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Offline => "offline",
            Self::OnlineNotStreaming => "online_not_streaming",
            Self::PrivateOrAway => "private_or_away",
            Self::Streaming => "streaming",
        }
    }

    pub fn availability(&self) -> PerformerAvailability {
        let (exists, is_online, is_streaming) = match self {
            Self::NotFound => (false, false, false),
            Self::Offline => (true, false, false),
            Self::OnlineNotStreaming => (true, true, false),
            Self::PrivateOrAway | Self::Streaming => (true, true, true),
        };
        PerformerAvailability {
            exists,
            is_online,
            is_streaming,
        }
    }
}

/// What the profile and stream-info endpoints said about a performer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PerformerAvailability {
    pub exists: bool,
    pub is_online: bool,
    pub is_streaming: bool,
}

/// Outcome of a full status check, suitable for printing or JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformerReport {
    pub username: String,
    pub status: PerformerStatus,
    pub stream_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub error: Option<String>,
}

impl PerformerReport {
    pub fn is_streaming(&self) -> bool {
        self.status == PerformerStatus::Streaming
    }

    pub fn availability(&self) -> PerformerAvailability {
        self.status.availability()
    }
}
