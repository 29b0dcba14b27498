use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(name = "cam4", author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true, env = "CAM4_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Proxy url (http, https or socks5)
    #[arg(long, global = true, env = "CAM4_PROXY")]
    pub proxy: Option<String>,

    /// Cookies as "name=value; name2=value2"
    #[arg(long, global = true)]
    pub cookies: Option<String>,

    /// Netscape cookies.txt file exported from a browser
    #[arg(long, global = true)]
    pub cookies_file: Option<PathBuf>,

    /// FlareSolverr relay url, e.g. http://localhost:8191
    #[arg(long, global = true)]
    pub flaresolverr: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether a performer is streaming (exit code 0 only when live)
    Check {
        /// Room url or performer name
        url: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        output: OutputFormat,
    },

    /// Show the available streams of a live room
    Extract {
        /// Room url or performer name
        url: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        output: OutputFormat,
    },

    /// Record a live stream with ffmpeg until it ends or Ctrl-C is pressed
    Record {
        /// Room url or performer name
        url: String,

        /// Output file (default: {username}_{timestamp}.ts)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Extra ffmpeg arguments, placed before the output file
        #[arg(last = true)]
        ffmpeg_args: Vec<String>,
    },

    /// Download the performer's thumbnail
    Thumbnail {
        /// Room url or performer name
        url: String,

        /// Output file (default: {username}_thumb.jpg)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or reset the configuration
    Config {
        #[arg(long)]
        show: bool,

        #[arg(long)]
        reset: bool,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    pub fn output_format(&self) -> Option<OutputFormat> {
        match self {
            Commands::Check { output, .. } | Commands::Extract { output, .. } => Some(*output),
            _ => None,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
    JsonCompact,
}

impl OutputFormat {
    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::JsonCompact)
    }
}
