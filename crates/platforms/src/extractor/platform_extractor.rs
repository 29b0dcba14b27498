use crate::extractor::default::DEFAULT_UA;

use super::{super::media::media_info::MediaInfo, error::ExtractorError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use rustc_hash::FxHashMap;
use std::str::FromStr;
use tracing::debug;

/// Base extractor shared by platform implementations.
///
/// Holds the target url, the HTTP client, default headers and a small cookie
/// store. Cookies are attached to every request built through [`Extractor::request`].
///
/// ```rust,no_run
/// # use cam4_platforms::extractor::{default_client, platform_extractor::Extractor};
/// let mut extractor = Extractor::new("CAM4", "https://www.cam4.com/someone", default_client());
/// extractor.set_cookies_from_string("token=xyz789; user_id=12345");
/// assert!(extractor.has_cookie("token"));
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    // url to extract from, e.g., "https://www.cam4.com/someone"
    pub url: String,
    // name of the platform, e.g., "CAM4"
    pub platform_name: String,
    pub client: Client,
    platform_headers: HeaderMap,
    cookies: FxHashMap<String, String>,
}

impl Extractor {
    pub fn new<S1: Into<String>, S2: Into<String>>(
        platform_name: S1,
        platform_url: S2,
        client: Client,
    ) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(DEFAULT_UA),
        );
        default_headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        default_headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );

        Self {
            platform_name: platform_name.into(),
            url: platform_url.into(),
            client,
            platform_headers: default_headers,
            cookies: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn set_origin_and_referer_static(&mut self, base_url: &'static str) {
        let v = HeaderValue::from_static(base_url);
        self.platform_headers
            .insert(reqwest::header::ORIGIN, v.clone());
        self.platform_headers.insert(reqwest::header::REFERER, v);
    }

    pub fn add_header_str<K: AsRef<str>, V: AsRef<str>>(&mut self, key: K, value: V) {
        match HeaderName::from_str(key.as_ref()) {
            Ok(name) => match HeaderValue::from_str(value.as_ref()) {
                Ok(value) => {
                    self.platform_headers.insert(name, value);
                }
                Err(e) => {
                    debug!(error = %e, "Invalid header value; skipping");
                }
            },
            Err(e) => {
                debug!(error = %e, "Invalid header name; skipping");
            }
        }
    }

    pub fn add_cookie<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        self.cookies.insert(name.into(), value.into());
    }

    /// Set cookies from a cookie string (format: "name1=value1; name2=value2").
    pub fn set_cookies_from_string(&mut self, cookie_string: &str) {
        // Accept common separators: ';' from Cookie headers and '\n' from copy/paste.
        for part in cookie_string.split(&[';', '\n'][..]).map(str::trim) {
            if part.is_empty() {
                continue;
            }

            let Some((name, value)) = part.split_once('=') else {
                continue;
            };
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                continue;
            }

            self.cookies.insert(name.to_owned(), value.to_owned());
        }
    }

    /// Import cookies from a Netscape `cookies.txt` export.
    ///
    /// Only entries whose domain contains `domain_filter` are kept. Returns the
    /// number of cookies imported.
    pub fn set_cookies_from_netscape(&mut self, content: &str, domain_filter: &str) -> usize {
        let mut imported = 0;
        for line in content.lines().map(str::trim) {
            // `#HttpOnly_` prefixed lines are regular entries in curl's format.
            let line = line.strip_prefix("#HttpOnly_").unwrap_or(line);
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 7 {
                continue;
            }
            let (domain, name, value) = (fields[0], fields[5], fields[6]);
            if !domain.contains(domain_filter) || name.is_empty() {
                continue;
            }

            self.cookies.insert(name.to_owned(), value.to_owned());
            imported += 1;
        }
        debug!(imported, "Loaded cookies from netscape file");
        imported
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub fn get_cookie(&self, name: &str) -> Option<&String> {
        self.cookies.get(name)
    }

    fn build_cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }

        let mut cookie_string = String::with_capacity(
            self.cookies
                .iter()
                .map(|(k, v)| k.len() + 1 + v.len() + 2)
                .sum(),
        );

        for (name, value) in &self.cookies {
            if !cookie_string.is_empty() {
                cookie_string.push_str("; ");
            }
            cookie_string.push_str(name);
            cookie_string.push('=');
            cookie_string.push_str(value);
        }

        Some(cookie_string)
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    /// Create an HTTP request carrying the platform headers and stored cookies.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut headers = self.platform_headers.clone();

        if let Some(cookie_header) = self.build_cookie_header() {
            match HeaderValue::from_str(&cookie_header) {
                Ok(value) => {
                    headers.insert(reqwest::header::COOKIE, value);
                }
                Err(e) => {
                    debug!(error = %e, "Failed to build Cookie header");
                }
            }
        }

        self.client.request(method, url).headers(headers)
    }

    pub fn get_platform_headers(&self) -> &HeaderMap {
        &self.platform_headers
    }

    pub fn get_platform_headers_map(&self) -> FxHashMap<String, String> {
        let mut headers_map =
            FxHashMap::with_capacity_and_hasher(self.platform_headers.len(), Default::default());

        for (key, value) in &self.platform_headers {
            if let Ok(value) = value.to_str() {
                headers_map.insert(key.as_str().to_owned(), value.to_owned());
            }
        }

        headers_map
    }
}

#[async_trait]
pub trait PlatformExtractor: Send + Sync {
    fn get_extractor(&self) -> &Extractor;

    fn get_platform_headers(&self) -> &HeaderMap {
        self.get_extractor().get_platform_headers()
    }

    async fn extract(&self) -> Result<MediaInfo, ExtractorError>;
}
