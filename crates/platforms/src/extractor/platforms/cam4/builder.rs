use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use super::flaresolverr::{FlareSolverr, Fetched};
use super::models::{PerformerReport, PerformerStatus, ProfileInfo, StreamMetadata};
use crate::extractor::error::ExtractorError;
use crate::extractor::hls_extractor::parse_hls_streams;
use crate::extractor::platform_extractor::{Extractor, PlatformExtractor};
use crate::extractor::utils::{capture_group_1_or_invalid_url, extras_get_str, is_empty_json};
use crate::media::{MediaInfo, StreamInfo};
use crate::recorder::{Recorder, Recording, default_output_name};

pub static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://(?:[^/]+\.)?cam4\.com/([a-z0-9_]+)").unwrap()
});

/// Markers the CDN serves instead of a playlist for private or away rooms.
const PRIVATE_MARKERS: [&str; 2] = ["not allowed to view", "session is not allowed"];

/// A live stream that passed every availability check.
#[derive(Debug, Clone)]
pub struct LiveStream {
    pub metadata: StreamMetadata,
    pub playlist_url: String,
    pub streams: Vec<StreamInfo>,
}

pub struct Cam4 {
    pub extractor: Extractor,
    api_base_url: String,
    thumbnail_base_url: String,
    relay: Option<FlareSolverr>,
}

impl Cam4 {
    pub const BASE_URL: &str = "https://www.cam4.com";
    const API_BASE_URL: &str = "https://www.cam4.com/rest/v1.0/profile";
    const THUMBNAIL_BASE_URL: &str = "https://snapshots.xcdnpro.com/thumbnails";
    const COOKIE_DOMAIN: &str = "cam4.com";

    /// `cookies` may be a `name=value; ...` string or the content of a
    /// Netscape `cookies.txt` file. Recognised `extras` keys are
    /// `api_base_url`, `thumbnail_base_url`, `flaresolverr_url` and
    /// `user_agent`.
    pub fn new(
        platform_url: String,
        client: Client,
        cookies: Option<String>,
        extras: Option<serde_json::Value>,
    ) -> Self {
        let mut extractor = Extractor::new("CAM4", platform_url, client);
        extractor.set_origin_and_referer_static(Self::BASE_URL);

        if let Some(cookies) = cookies {
            if cookies.contains('\t') {
                extractor.set_cookies_from_netscape(&cookies, Self::COOKIE_DOMAIN);
            } else {
                extractor.set_cookies_from_string(&cookies);
            }
        }

        let extras = extras.as_ref();
        if let Some(user_agent) = extras_get_str(extras, "user_agent") {
            extractor.add_header_str("user-agent", user_agent);
        }
        let api_base_url = extras_get_str(extras, "api_base_url")
            .unwrap_or(Self::API_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        let thumbnail_base_url = extras_get_str(extras, "thumbnail_base_url")
            .unwrap_or(Self::THUMBNAIL_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        let relay = extras_get_str(extras, "flaresolverr_url")
            .map(|url| FlareSolverr::new(extractor.client.clone(), url));

        Self {
            extractor,
            api_base_url,
            thumbnail_base_url,
            relay,
        }
    }

    /// Performer identifier from the room url, lower-cased.
    pub fn username(&self) -> Result<String, ExtractorError> {
        capture_group_1_or_invalid_url(&URL_REGEX, &self.extractor.url).map(str::to_lowercase)
    }

    pub fn thumbnail_url(&self, username: &str) -> String {
        format!("{}/{username}", self.thumbnail_base_url)
    }

    pub fn relay(&self) -> Option<&FlareSolverr> {
        self.relay.as_ref()
    }

    async fn fetch(&self, url: &str) -> Result<Fetched, ExtractorError> {
        if let Some(relay) = &self.relay {
            match relay.get(url).await {
                Ok(fetched) => return Ok(fetched),
                Err(e) => warn!(error = %e, "FlareSolverr request failed, retrying directly"),
            }
        }

        let response = self.extractor.get(url).send().await?;
        Ok(Fetched {
            status: response.status(),
            body: response.bytes().await?,
        })
    }

    async fn get_profile_info(&self, username: &str) -> Result<ProfileInfo, ExtractorError> {
        let url = format!("{}/{username}/info", self.api_base_url);
        debug!(url, "Fetching profile info");

        let fetched = self.fetch(&url).await?;
        if fetched.status == StatusCode::NOT_FOUND {
            return Err(ExtractorError::PerformerNotFound);
        }
        if !fetched.status.is_success() {
            return Err(ExtractorError::UnexpectedStatus {
                status: fetched.status.as_u16(),
                url,
            });
        }

        Ok(serde_json::from_slice(&fetched.body)?)
    }

    /// `None` when the service reports no current stream.
    async fn get_stream_info(
        &self,
        username: &str,
    ) -> Result<Option<StreamMetadata>, ExtractorError> {
        let url = format!("{}/{username}/streamInfo", self.api_base_url);
        debug!(url, "Fetching stream info");

        let fetched = self.fetch(&url).await?;
        if matches!(fetched.status, StatusCode::NO_CONTENT | StatusCode::NOT_FOUND) {
            return Ok(None);
        }
        if !fetched.status.is_success() {
            return Err(ExtractorError::UnexpectedStatus {
                status: fetched.status.as_u16(),
                url,
            });
        }
        if fetched.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let value: serde_json::Value = serde_json::from_slice(&fetched.body)?;
        if is_empty_json(&value) {
            return Ok(None);
        }
        Ok(Some(StreamMetadata::new(value)))
    }

    /// Classify the performer before any stream lookup.
    ///
    /// Checks run in a fixed order and stop at the first failure: the profile
    /// must exist, report the performer online, and the stream-info endpoint
    /// must return metadata. The metadata is returned as received.
    pub async fn check_availability(
        &self,
        performer_id: &str,
    ) -> Result<StreamMetadata, ExtractorError> {
        let profile = self.get_profile_info(performer_id).await?;
        if !profile.is_online() {
            return Err(ExtractorError::PerformerOffline);
        }

        self.get_stream_info(performer_id)
            .await?
            .ok_or(ExtractorError::PerformerNotStreaming)
    }

    /// Fetch the playlist behind `metadata` and make sure it is viewable.
    pub async fn locate_streams(
        &self,
        metadata: &StreamMetadata,
    ) -> Result<(String, Vec<StreamInfo>), ExtractorError> {
        let playlist_url = metadata
            .cdn_url()
            .ok_or(ExtractorError::NoPlaylistUrl)?
            .to_string();
        debug!(playlist_url, "Verifying stream accessibility");

        let fetched = self.fetch(&playlist_url).await?;
        let text = fetched.text_lossy();
        let lowered = text.to_lowercase();
        if PRIVATE_MARKERS.iter().any(|m| lowered.contains(m))
            || matches!(
                fetched.status,
                StatusCode::BAD_REQUEST | StatusCode::FORBIDDEN
            )
        {
            return Err(ExtractorError::StreamNotAccessible);
        }
        if !text.contains("#EXTM3U") {
            return Err(ExtractorError::HlsPlaylistError(
                "Invalid stream response".to_string(),
            ));
        }

        let streams = parse_hls_streams(&fetched.body, &playlist_url, None)?;
        Ok((playlist_url, streams))
    }

    pub async fn resolve(&self, username: &str) -> Result<LiveStream, ExtractorError> {
        let metadata = self.check_availability(username).await?;
        let (playlist_url, streams) = self.locate_streams(&metadata).await?;
        Ok(LiveStream {
            metadata,
            playlist_url,
            streams,
        })
    }

    /// Run every check and describe the outcome.
    ///
    /// Performer-state failures become a report, and so does a playlist the
    /// CDN refuses or mangles. Other transport and decoding errors are
    /// returned as errors.
    pub async fn probe(&self) -> Result<PerformerReport, ExtractorError> {
        let username = self.username()?;
        let thumbnail_url = self.thumbnail_url(&username);

        let outcome = match self.check_availability(&username).await {
            Ok(metadata) => match self.locate_streams(&metadata).await {
                Ok((playlist_url, _)) => Ok(playlist_url),
                Err(ExtractorError::HlsPlaylistError(message)) => {
                    Err((PerformerStatus::PrivateOrAway, message))
                }
                Err(ExtractorError::HttpError(e)) => Err((
                    PerformerStatus::PrivateOrAway,
                    format!("Error accessing stream: {e}"),
                )),
                Err(e) => Err(Self::report_failure(e)?),
            },
            Err(e) => Err(Self::report_failure(e)?),
        };

        let report = match outcome {
            Ok(playlist_url) => PerformerReport {
                username,
                status: PerformerStatus::Streaming,
                stream_url: Some(playlist_url),
                thumbnail_url: Some(thumbnail_url),
                error: None,
            },
            Err((status, message)) => PerformerReport {
                username,
                status,
                stream_url: None,
                thumbnail_url: (status != PerformerStatus::NotFound).then_some(thumbnail_url),
                error: Some(message),
            },
        };

        info!(username = %report.username, status = report.status.as_str(), "Probe finished");
        Ok(report)
    }

    /// Status and message for a performer-state error; other errors pass through.
    fn report_failure(error: ExtractorError) -> Result<(PerformerStatus, String), ExtractorError> {
        let status = PerformerStatus::from_error(&error).ok_or(error)?;
        let message = match status {
            PerformerStatus::NotFound => ExtractorError::PerformerNotFound,
            PerformerStatus::Offline => ExtractorError::PerformerOffline,
            PerformerStatus::OnlineNotStreaming => ExtractorError::PerformerNotStreaming,
            PerformerStatus::PrivateOrAway | PerformerStatus::Streaming => {
                ExtractorError::StreamNotAccessible
            }
        };
        Ok((status, message.to_string()))
    }

    /// Save the performer's thumbnail, by default to `{username}_thumb.jpg`.
    pub async fn download_thumbnail(
        &self,
        output: Option<&Path>,
    ) -> Result<PathBuf, ExtractorError> {
        let username = self.username()?;
        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(format!("{username}_thumb.jpg")));

        let bytes = self
            .extractor
            .get(&self.thumbnail_url(&username))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        tokio::fs::write(&output, &bytes).await?;

        info!(path = %output.display(), "Thumbnail saved");
        Ok(output)
    }

    /// Start recording the live stream; fails with the probe error when the
    /// performer is not streaming.
    pub async fn record(
        &self,
        recorder: &Recorder,
        output: Option<&Path>,
    ) -> Result<Recording, ExtractorError> {
        let username = self.username()?;
        let live = self.resolve(&username).await?;
        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_output_name(&username));

        debug!(stream_url = %live.playlist_url, "Recording stream");
        recorder.spawn(&live.playlist_url, &output)
    }
}

#[async_trait]
impl PlatformExtractor for Cam4 {
    fn get_extractor(&self) -> &Extractor {
        &self.extractor
    }

    async fn extract(&self) -> Result<MediaInfo, ExtractorError> {
        let username = self.username()?;
        let live = self.resolve(&username).await?;

        Ok(MediaInfo::builder(Self::BASE_URL, username.as_str(), username.as_str())
            .cover_url(self.thumbnail_url(&username))
            .artist_url(format!("{}/{username}", Self::BASE_URL))
            .is_live(true)
            .streams(live.streams)
            .headers(self.extractor.get_platform_headers_map())
            .extras(live.metadata.into_value())
            .build())
    }
}
