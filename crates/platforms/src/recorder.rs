//! Records a live HLS stream by remuxing it with an external `ffmpeg`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use chrono::Local;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::extractor::error::ExtractorError;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

const STOP_GRACE: Duration = Duration::from_secs(5);

/// `{username}_{YYYYmmdd_HHMMSS}.ts`
pub fn default_output_name(username: &str) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("{username}_{timestamp}.ts"))
}

#[derive(Debug, Clone)]
pub struct Recorder {
    ffmpeg_path: PathBuf,
    extra_args: Vec<String>,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Recorder {
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            extra_args: Vec::new(),
        }
    }

    /// Arguments inserted before the output path.
    pub fn extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }

    /// ffmpeg argument vector: copy both tracks, overwrite the output.
    pub fn args(&self, stream_url: &str, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-i", stream_url, "-c:v", "copy", "-c:a", "copy", "-y"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.extend(self.extra_args.iter().map(OsString::from));
        args.push(output.as_os_str().to_owned());
        args
    }

    fn command(&self, stream_url: &str, output: &Path) -> Command {
        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.args(self.args(stream_url, output))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            cmd.as_std_mut().creation_flags(CREATE_NO_WINDOW);
        }
        cmd
    }

    pub fn spawn(&self, stream_url: &str, output: &Path) -> Result<Recording, ExtractorError> {
        info!(output = %output.display(), "Starting recording");
        debug!(stream_url, ffmpeg = %self.ffmpeg_path.display(), "Spawning ffmpeg");

        let child = self.command(stream_url, output).spawn().map_err(|e| {
            ExtractorError::ProcessError(format!(
                "failed to start {}: {e}",
                self.ffmpeg_path.display()
            ))
        })?;

        Ok(Recording {
            child,
            output: output.to_path_buf(),
        })
    }
}

/// A running ffmpeg process.
#[derive(Debug)]
pub struct Recording {
    child: Child,
    output: PathBuf,
}

impl Recording {
    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    pub async fn wait(&mut self) -> Result<ExitStatus, ExtractorError> {
        Ok(self.child.wait().await?)
    }

    /// Ask ffmpeg to finish the file (`q` on stdin), killing it if it does
    /// not exit within the grace period.
    pub async fn stop(&mut self) -> Result<ExitStatus, ExtractorError> {
        if let Some(mut stdin) = self.child.stdin.take()
            && let Err(e) = stdin.write_all(b"q").await
        {
            debug!(error = %e, "ffmpeg stdin already closed");
        }

        match tokio::time::timeout(STOP_GRACE, self.child.wait()).await {
            Ok(status) => Ok(status?),
            Err(_) => {
                warn!("ffmpeg did not exit in time, killing it");
                self.child.kill().await?;
                Ok(self.child.wait().await?)
            }
        }
    }
}
