//! Client for a FlareSolverr relay, which performs requests in a real browser.

use std::time::Duration;

use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::extractor::error::ExtractorError;

/// A response fetched either directly or through the relay.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: StatusCode,
    pub body: Bytes,
}

impl Fetched {
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    status: String,
    #[serde(default)]
    message: String,
    solution: Option<RelaySolution>,
}

#[derive(Debug, Deserialize)]
struct RelaySolution {
    #[serde(default = "default_status")]
    status: u16,
    #[serde(default)]
    response: String,
}

fn default_status() -> u16 {
    200
}

#[derive(Debug, Clone)]
pub struct FlareSolverr {
    client: Client,
    base_url: String,
    max_timeout: Duration,
}

impl FlareSolverr {
    pub const DEFAULT_URL: &str = "http://localhost:8191";

    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_timeout: Duration::from_secs(10),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn is_available(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                debug!(error = %e, "FlareSolverr health check failed");
                false
            }
        }
    }

    pub async fn get(&self, url: &str) -> Result<Fetched, ExtractorError> {
        let payload = serde_json::json!({
            "cmd": "request.get",
            "url": url,
            "maxTimeout": self.max_timeout.as_millis() as u64,
        });
        debug!(url, relay = %self.base_url, "Relaying request");

        let response = self
            .client
            .post(format!("{}/v1", self.base_url))
            .json(&payload)
            .timeout(Duration::from_secs(60))
            .send()
            .await?
            .error_for_status()?
            .json::<RelayResponse>()
            .await?;

        if response.status != "ok" {
            let message = if response.message.is_empty() {
                "Unknown error".to_string()
            } else {
                response.message
            };
            return Err(ExtractorError::FlareSolverr(message));
        }

        let solution = response
            .solution
            .ok_or_else(|| ExtractorError::FlareSolverr("missing solution".to_string()))?;
        let status = StatusCode::from_u16(solution.status)
            .map_err(|e| ExtractorError::FlareSolverr(e.to_string()))?;

        Ok(Fetched {
            status,
            body: Bytes::from(solution.response),
        })
    }
}
