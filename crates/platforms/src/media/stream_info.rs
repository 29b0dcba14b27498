use crate::media::MediaFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StreamInfo {
    pub url: String,
    pub format: MediaFormat,
    // Quality of the stream, e.g., "1920x1080" or "source"
    pub quality: String,
    // Bitrate of the stream in kbps
    pub bitrate: u64,
    pub priority: u32,
    pub codec: String,
    pub fps: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

impl StreamInfo {
    pub fn builder(url: impl Into<String>, format: MediaFormat) -> StreamInfoBuilder {
        StreamInfoBuilder {
            info: StreamInfo {
                url: url.into(),
                format,
                quality: String::new(),
                bitrate: 0,
                priority: 0,
                codec: String::new(),
                fps: 0.0,
                extras: None,
            },
        }
    }

    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[derive(Debug, Clone)]
pub struct StreamInfoBuilder {
    info: StreamInfo,
}

impl StreamInfoBuilder {
    pub fn quality(mut self, quality: impl Into<String>) -> Self {
        self.info.quality = quality.into();
        self
    }

    pub fn bitrate(mut self, bitrate: u64) -> Self {
        self.info.bitrate = bitrate;
        self
    }

    pub fn priority(mut self, priority: u32) -> Self {
        self.info.priority = priority;
        self
    }

    pub fn codec(mut self, codec: impl Into<String>) -> Self {
        self.info.codec = codec.into();
        self
    }

    pub fn fps(mut self, fps: f64) -> Self {
        self.info.fps = fps;
        self
    }

    pub fn extras_opt(mut self, extras: Option<serde_json::Value>) -> Self {
        self.info.extras = extras;
        self
    }

    pub fn build(self) -> StreamInfo {
        self.info
    }
}

impl fmt::Display for StreamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.format, self.quality)?;
        if self.bitrate > 0 {
            write!(f, " ({} kbps)", self.bitrate)?;
        }
        Ok(())
    }
}
