use rustc_hash::FxHashMap;

use super::stream_info::StreamInfo;
use serde::{Deserialize, Serialize};

/// Information about a live room as returned by an extractor.
///
/// * `site_url` - home page of the platform
/// * `title` / `artist` - stream title and performer name
/// * `cover_url` - thumbnail of the current broadcast
/// * `artist_url` - performer's profile page
/// * `streams` - playable variants, best first
/// * `headers` - HTTP headers the streams must be fetched with
/// * `extras` - platform specific metadata
///
/// ```rust
/// use cam4_platforms::media::media_info::MediaInfo;
///
/// let media = MediaInfo::builder("https://www.cam4.com", "someone", "someone")
///     .cover_url("https://snapshots.xcdnpro.com/thumbnails/someone")
///     .is_live(true)
///     .build();
/// assert!(media.is_live);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MediaInfo {
    pub site_url: String,
    pub title: String,
    pub artist: String,
    pub cover_url: Option<String>,
    pub artist_url: Option<String>,
    pub is_live: bool,
    pub streams: Vec<StreamInfo>,
    pub headers: Option<FxHashMap<String, String>>,
    pub extras: Option<serde_json::Value>,
}

impl MediaInfo {
    pub fn builder(
        site_url: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
    ) -> MediaInfoBuilder {
        MediaInfoBuilder::new(site_url, title, artist)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[derive(Debug, Clone)]
pub struct MediaInfoBuilder {
    info: MediaInfo,
}

impl MediaInfoBuilder {
    pub fn new(
        site_url: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
    ) -> Self {
        Self {
            info: MediaInfo {
                site_url: site_url.into(),
                title: title.into(),
                artist: artist.into(),
                cover_url: None,
                artist_url: None,
                is_live: false,
                streams: Vec::new(),
                headers: None,
                extras: None,
            },
        }
    }

    pub fn cover_url(mut self, cover_url: impl Into<String>) -> Self {
        self.info.cover_url = Some(cover_url.into());
        self
    }

    pub fn artist_url(mut self, artist_url: impl Into<String>) -> Self {
        self.info.artist_url = Some(artist_url.into());
        self
    }

    pub fn is_live(mut self, is_live: bool) -> Self {
        self.info.is_live = is_live;
        self
    }

    pub fn streams(mut self, streams: Vec<StreamInfo>) -> Self {
        self.info.streams = streams;
        self
    }

    pub fn headers(mut self, headers: FxHashMap<String, String>) -> Self {
        self.info.headers = Some(headers);
        self
    }

    pub fn extras(mut self, extras: serde_json::Value) -> Self {
        self.info.extras = Some(extras);
        self
    }

    pub fn build(self) -> MediaInfo {
        self.info
    }
}
