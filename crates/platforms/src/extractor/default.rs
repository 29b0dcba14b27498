use std::sync::OnceLock;
use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use tracing::{debug, warn};

use super::error::ExtractorError;

pub(crate) const DEFAULT_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Options for the HTTP client shared by extractors.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Total request timeout. `Duration::ZERO` keeps reqwest's default.
    pub timeout: Duration,
    /// Explicit proxy url (`http://`, `https://` or `socks5://`).
    pub proxy: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
        }
    }
}

pub fn install_rustls_provider() {
    static PROVIDER_INSTALLED: OnceLock<()> = OnceLock::new();
    PROVIDER_INSTALLED.get_or_init(|| {
        if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
            // Another crate installed a provider first.
            debug!(existing_provider = ?e, "rustls CryptoProvider already installed");
        }
    });
}

pub fn create_client_builder(options: &ClientOptions) -> Result<ClientBuilder, ExtractorError> {
    install_rustls_provider();

    let mut builder = Client::builder()
        .user_agent(DEFAULT_UA)
        .pool_max_idle_per_host(5);

    if !options.timeout.is_zero() {
        builder = builder.timeout(options.timeout);
    }

    if let Some(proxy) = options.proxy.as_deref() {
        debug!(proxy, "Using explicit proxy");
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }

    Ok(builder)
}

pub fn build_client(options: &ClientOptions) -> Result<Client, ExtractorError> {
    Ok(create_client_builder(options)?.build()?)
}

pub fn default_client() -> Client {
    match build_client(&ClientOptions::default()) {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Failed to build configured client, using reqwest defaults");
            Client::new()
        }
    }
}
