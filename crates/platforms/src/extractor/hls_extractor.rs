use m3u8_rs::{MasterPlaylist, Playlist};
use url::Url;

use super::error::ExtractorError;
use crate::media::{MediaFormat, stream_info::StreamInfo};

/// Parse an HLS playlist body fetched from `m3u8_url` into stream variants.
///
/// A master playlist yields one stream per (non I-frame) variant, highest
/// bandwidth first. A media playlist is itself the only stream.
pub fn parse_hls_streams(
    body: &[u8],
    m3u8_url: &str,
    extras: Option<serde_json::Value>,
) -> Result<Vec<StreamInfo>, ExtractorError> {
    let base_url =
        Url::parse(m3u8_url).map_err(|e| ExtractorError::HlsPlaylistError(e.to_string()))?;

    let playlist = m3u8_rs::parse_playlist_res(body)
        .map_err(|e| ExtractorError::HlsPlaylistError(e.to_string()))?;

    let streams = match playlist {
        Playlist::MasterPlaylist(pl) => process_master_playlist(pl, &base_url, extras)?,
        Playlist::MediaPlaylist(_) => vec![
            StreamInfo::builder(m3u8_url, MediaFormat::Hls)
                .quality("source")
                .extras_opt(extras)
                .build(),
        ],
    };

    Ok(streams)
}

fn process_master_playlist(
    playlist: MasterPlaylist,
    base_url: &Url,
    extras: Option<serde_json::Value>,
) -> Result<Vec<StreamInfo>, ExtractorError> {
    let mut variants: Vec<_> = playlist
        .variants
        .into_iter()
        .filter(|v| !v.is_i_frame)
        .collect();
    variants.sort_by(|a, b| b.bandwidth.cmp(&a.bandwidth));

    variants
        .into_iter()
        .enumerate()
        .map(|(index, variant)| {
            let stream_url = base_url
                .join(&variant.uri)
                .map_err(|e| ExtractorError::HlsPlaylistError(e.to_string()))?;
            let quality = variant
                .resolution
                .map(|r| format!("{}x{}", r.width, r.height))
                .unwrap_or_else(|| "source".to_string());

            Ok(StreamInfo::builder(stream_url.as_str(), MediaFormat::Hls)
                .quality(quality)
                .bitrate(variant.bandwidth / 1000)
                .priority(index as u32)
                .codec(variant.codecs.unwrap_or_default())
                .fps(variant.frame_rate.unwrap_or(0.0))
                .extras_opt(extras.clone())
                .build())
        })
        .collect()
}
