use std::sync::LazyLock;

use super::default::default_client;
use super::error::ExtractorError;
use super::platform_extractor::PlatformExtractor;
use crate::extractor::platforms::{self, cam4::Cam4};
use regex::Regex;
use reqwest::Client;

type ExtractorConstructor =
    fn(String, Client, Option<String>, Option<serde_json::Value>) -> Box<dyn PlatformExtractor>;

struct PlatformEntry {
    name: &'static str,
    regex: &'static LazyLock<Regex>,
    constructor: ExtractorConstructor,
}

macro_rules! platform_registry {
    ( $( $name:literal : $regex:path => $builder:path ),+ $(,)? ) => {
        &[
            $(
                PlatformEntry {
                    name: $name,
                    regex: &$regex,
                    constructor: |url, client, cookies, extras| {
                        Box::new($builder(url, client, cookies, extras))
                            as Box<dyn PlatformExtractor>
                    },
                },
            )+
        ]
    };
}

static PLATFORMS: &[PlatformEntry] = platform_registry![
    "CAM4": platforms::cam4::URL_REGEX => Cam4::new,
];

/// A factory for creating platform-specific extractors.
pub struct ExtractorFactory {
    client: Client,
}

impl Default for ExtractorFactory {
    fn default() -> Self {
        Self::new(default_client())
    }
}

impl ExtractorFactory {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn supported_platforms() -> impl Iterator<Item = &'static str> {
        PLATFORMS.iter().map(|p| p.name)
    }

    pub fn is_supported(url: &str) -> bool {
        PLATFORMS.iter().any(|p| p.regex.is_match(url))
    }

    pub fn create_extractor(
        &self,
        url: &str,
        cookies: Option<String>,
        extras: Option<serde_json::Value>,
    ) -> Result<Box<dyn PlatformExtractor>, ExtractorError> {
        PLATFORMS
            .iter()
            .find(|platform| platform.regex.is_match(url))
            .map(|platform| {
                (platform.constructor)(url.to_string(), self.client.clone(), cookies, extras)
            })
            .ok_or(ExtractorError::UnsupportedExtractor)
    }
}
