use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use cam4_platforms::extractor::{
    ClientOptions, ExtractorFactory, build_client,
    error::ExtractorError,
    platforms::cam4::{Cam4, FlareSolverr, URL_REGEX},
};
use cam4_platforms::recorder::{Recorder, default_output_name};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tracing::{info, warn};

use crate::{
    cli::OutputFormat,
    config::AppConfig,
    error::{AppError, Result},
    output::{OutputManager, Paint},
};

/// Connection settings after merging the config file and command line.
#[derive(Debug, Default, Clone)]
pub struct SessionOverrides {
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    pub cookies: Option<String>,
    pub cookies_file: Option<PathBuf>,
    pub flaresolverr: Option<String>,
}

/// Accept either a room url or a bare performer name.
pub fn normalize_url(input: &str) -> Result<String> {
    let input = input.trim();
    if input.contains("://") {
        return if ExtractorFactory::is_supported(input) {
            Ok(input.to_string())
        } else {
            Err(AppError::InvalidInput(format!("not a CAM4 room url: {input}")))
        };
    }

    let name = input.trim_matches('/');
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(format!("{}/{}", Cam4::BASE_URL, name.to_lowercase()))
    } else {
        Err(AppError::InvalidInput(format!(
            "not a CAM4 room url or performer name: {input}"
        )))
    }
}

/// Name the performer in user-level errors; other errors pass through.
fn performer_error(url: &str, error: ExtractorError) -> AppError {
    match URL_REGEX.captures(url).and_then(|c| c.get(1)) {
        Some(name) if error.is_expected() => AppError::Performer {
            username: name.as_str().to_lowercase(),
            source: error,
        },
        _ => error.into(),
    }
}

pub struct CommandExecutor {
    config: AppConfig,
    client: Client,
    cookies: Option<String>,
    flaresolverr: Option<String>,
    output: OutputManager,
    show_progress: bool,
}

impl CommandExecutor {
    pub fn new(config: AppConfig, overrides: SessionOverrides, show_progress: bool) -> Result<Self> {
        let options = ClientOptions {
            timeout: Duration::from_secs(overrides.timeout.unwrap_or(config.timeout_secs)),
            proxy: overrides.proxy.or_else(|| config.proxy.clone()),
        };
        let client = build_client(&options)?;

        let cookies = match (overrides.cookies, overrides.cookies_file.or_else(|| config.cookies_file.clone())) {
            (Some(cookies), _) => Some(cookies),
            (None, Some(path)) => Some(std::fs::read_to_string(&path).map_err(|e| {
                AppError::InvalidInput(format!("cannot read cookies file {}: {e}", path.display()))
            })?),
            (None, None) => None,
        };

        let flaresolverr = overrides
            .flaresolverr
            .or_else(|| config.flaresolverr_url.clone());
        let output = OutputManager::new(config.colored);

        Ok(Self {
            config,
            client,
            cookies,
            flaresolverr,
            output,
            show_progress,
        })
    }

    /// Platform options passed to the extractor.
    fn extras(&self) -> Option<serde_json::Value> {
        let mut extras = serde_json::Map::new();
        if let Some(relay) = &self.flaresolverr {
            extras.insert("flaresolverr_url".into(), relay.clone().into());
        }
        if let Some(user_agent) = &self.config.user_agent {
            extras.insert("user_agent".into(), user_agent.clone().into());
        }
        (!extras.is_empty()).then_some(serde_json::Value::Object(extras))
    }

    fn cam4(&self, url: &str) -> Result<Cam4> {
        let url = normalize_url(url)?;
        Ok(Cam4::new(
            url,
            self.client.clone(),
            self.cookies.clone(),
            self.extras(),
        ))
    }

    fn spinner(&self, message: &'static str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        pb.enable_steady_tick(Duration::from_millis(120));
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            pb.set_style(style.tick_strings(&[
                "▹▹▹▹▹", "▸▹▹▹▹", "▹▸▹▹▹", "▹▹▸▹▹", "▹▹▹▸▹", "▹▹▹▹▸", "▪▪▪▪▪",
            ]));
        }
        pb.set_message(message);
        Some(pb)
    }

    async fn warn_if_relay_down(&self, cam4: &Cam4) {
        if let Some(relay) = cam4.relay()
            && !relay.is_available().await
        {
            warn!(
                relay = relay.base_url(),
                default = FlareSolverr::DEFAULT_URL,
                "FlareSolverr is not responding, requests will fall back to direct"
            );
        }
    }

    pub async fn check(&self, url: &str, format: OutputFormat) -> Result<ExitCode> {
        let cam4 = self.cam4(url)?;
        self.warn_if_relay_down(&cam4).await;

        let pb = self.spinner("Checking performer status...");
        let report = cam4.probe().await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        let report = report?;

        println!("{}", self.output.format_report(&report, &format)?);
        Ok(if report.is_streaming() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }

    pub async fn extract(&self, url: &str, format: OutputFormat) -> Result<ExitCode> {
        let url = normalize_url(url)?;
        let factory = ExtractorFactory::new(self.client.clone());
        let extractor = factory.create_extractor(&url, self.cookies.clone(), self.extras())?;

        let pb = self.spinner("Extracting media information...");
        let media_info = extractor.extract().await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        let media_info = media_info.map_err(|e| performer_error(&url, e))?;
        println!("{}", self.output.format_media_info(&media_info, &format)?);
        Ok(ExitCode::SUCCESS)
    }

    pub async fn record(
        &self,
        url: &str,
        output: Option<&Path>,
        ffmpeg_args: Vec<String>,
    ) -> Result<ExitCode> {
        let cam4 = self.cam4(url)?;
        self.warn_if_relay_down(&cam4).await;

        let output = match output {
            Some(path) => path.to_path_buf(),
            None => self.config.output_path(default_output_name(&cam4.username()?)),
        };
        let recorder = Recorder::new(&self.config.ffmpeg_path).extra_args(ffmpeg_args);

        let pb = self.spinner("Locating stream...");
        let recording = cam4.record(&recorder, Some(&output)).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        let mut recording = recording.map_err(|e| performer_error(&cam4.extractor.url, e))?;

        println!(
            "Recording to {}. Press Ctrl+C to stop.",
            self.output
                .colorize(&recording.output().display().to_string(), Paint::Cyan, false)
        );

        let status = tokio::select! {
            status = recording.wait() => status?,
            _ = tokio::signal::ctrl_c() => {
                println!("\nStopping recording...");
                recording.stop().await?
            }
        };

        info!(%status, "ffmpeg exited");
        println!("Recording stopped.");
        Ok(ExitCode::SUCCESS)
    }

    pub async fn thumbnail(&self, url: &str, output: Option<&Path>) -> Result<ExitCode> {
        let cam4 = self.cam4(url)?;
        let output = match output {
            Some(path) => path.to_path_buf(),
            None => self
                .config
                .output_path(PathBuf::from(format!("{}_thumb.jpg", cam4.username()?))),
        };

        let path = cam4.download_thumbnail(Some(&output)).await?;
        println!("Thumbnail saved to {}", path.display());
        Ok(ExitCode::SUCCESS)
    }
}
