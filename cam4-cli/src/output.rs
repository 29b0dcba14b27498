use crate::{cli::OutputFormat, error::Result};
use cam4_platforms::extractor::platforms::cam4::PerformerReport;
use cam4_platforms::media::MediaInfo;
#[cfg(feature = "colored-output")]
use colored::Colorize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy)]
pub enum Paint {
    Green,
    Red,
    Yellow,
    Cyan,
    Blue,
}

pub struct OutputManager {
    colored: bool,
}

impl OutputManager {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    pub fn colorize(&self, text: &str, paint: Paint, bold: bool) -> String {
        #[cfg(feature = "colored-output")]
        if self.colored {
            let colored = match paint {
                Paint::Green => text.green(),
                Paint::Red => text.red(),
                Paint::Yellow => text.yellow(),
                Paint::Cyan => text.cyan(),
                Paint::Blue => text.blue(),
            };
            return if bold {
                colored.bold().to_string()
            } else {
                colored.to_string()
            };
        }
        let _ = (paint, bold);
        text.to_string()
    }

    pub fn format_report(&self, report: &PerformerReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Pretty => Ok(self.format_report_pretty(report)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::JsonCompact => Ok(serde_json::to_string(report)?),
        }
    }

    fn format_report_pretty(&self, report: &PerformerReport) -> String {
        let mut output = String::new();
        if report.is_streaming() {
            let _ = writeln!(
                output,
                "{} {} is {}",
                self.colorize("✓", Paint::Green, true),
                self.colorize(&report.username, Paint::Cyan, true),
                self.colorize("STREAMING", Paint::Green, true)
            );
            if let Some(url) = &report.stream_url {
                let _ = writeln!(
                    output,
                    "  {}: {}",
                    self.colorize("Stream URL", Paint::Yellow, false),
                    self.colorize(url, Paint::Blue, false)
                );
            }
        } else {
            let _ = writeln!(
                output,
                "{} {}: {}",
                self.colorize("✗", Paint::Red, true),
                report.username,
                report.error.as_deref().unwrap_or(report.status.as_str())
            );
        }
        if let Some(thumbnail) = &report.thumbnail_url {
            let _ = writeln!(
                output,
                "  {}: {}",
                self.colorize("Thumbnail", Paint::Yellow, false),
                self.colorize(thumbnail, Paint::Blue, false)
            );
        }
        output.trim_end().to_string()
    }

    pub fn format_media_info(&self, media_info: &MediaInfo, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Pretty => Ok(self.format_media_pretty(media_info)),
            OutputFormat::Json => Ok(media_info.to_json_pretty()?),
            OutputFormat::JsonCompact => Ok(serde_json::to_string(&media_info.to_value()?)?),
        }
    }

    fn format_media_pretty(&self, media_info: &MediaInfo) -> String {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "{}",
            self.colorize("Media Information:", Paint::Green, true)
        );
        let field = |label: &str, value: &str, paint: Paint| {
            format!(
                "  {}: {}",
                self.colorize(label, Paint::Yellow, false),
                self.colorize(value, paint, false)
            )
        };
        let _ = writeln!(output, "{}", field("Artist", &media_info.artist, Paint::Cyan));
        let _ = writeln!(output, "{}", field("Title", &media_info.title, Paint::Cyan));
        let _ = writeln!(
            output,
            "{}",
            field("Live", &media_info.is_live.to_string(), Paint::Cyan)
        );
        if let Some(cover_url) = &media_info.cover_url {
            let _ = writeln!(output, "{}", field("Cover URL", cover_url, Paint::Blue));
        }
        if let Some(artist_url) = &media_info.artist_url {
            let _ = writeln!(output, "{}", field("Artist URL", artist_url, Paint::Blue));
        }

        if !media_info.streams.is_empty() {
            let _ = writeln!(output, "\n{}", self.colorize("Streams:", Paint::Green, true));
            for (i, stream) in media_info.streams.iter().enumerate() {
                let _ = writeln!(
                    output,
                    "  [{}] {}",
                    i + 1,
                    self.colorize(&stream.to_string(), Paint::Cyan, false)
                );
                let _ = writeln!(
                    output,
                    "      {}",
                    self.colorize(&stream.url, Paint::Blue, false)
                );
            }
        }
        output.trim_end().to_string()
    }

    pub fn format_error(&self, message: &str, format: Option<OutputFormat>) -> String {
        match format {
            Some(f) if f.is_json() => serde_json::json!({
                "status": "error",
                "message": message,
            })
            .to_string(),
            _ => format!("{} {}", self.colorize("Error:", Paint::Red, true), message),
        }
    }
}
