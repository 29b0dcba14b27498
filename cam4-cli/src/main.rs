mod cli;
mod commands;
mod config;
mod error;
mod output;

use crate::{
    cli::{Args, Commands},
    commands::{CommandExecutor, SessionOverrides},
    config::AppConfig,
    error::Result,
    output::OutputManager,
};
use clap::Parser;
use std::process::ExitCode;
use tracing::{Level, debug, error};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let output_format = args.command.output_format();
    let result = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => {
            let colored = config.colored;
            (run(args, config).await, colored)
        }
        Err(e) => (Err(e), true),
    };

    match result {
        (Ok(code), _) => code,
        (Err(e), colored) => {
            let output = OutputManager::new(colored);
            if e.is_expected() && !output_format.is_some_and(|f| f.is_json()) {
                eprintln!("{e}");
            } else {
                error!("Application error: {}", e);
                eprintln!("{}", output.format_error(&e.to_string(), output_format));
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, config: AppConfig) -> Result<ExitCode> {
    debug!(?config, "Loaded configuration");

    let show_progress = !args.quiet
        && args
            .command
            .output_format()
            .is_none_or(|format| !format.is_json());
    let overrides = SessionOverrides {
        timeout: args.timeout,
        proxy: args.proxy,
        cookies: args.cookies,
        cookies_file: args.cookies_file,
        flaresolverr: args.flaresolverr,
    };

    match args.command {
        Commands::Check { url, output } => {
            CommandExecutor::new(config, overrides, show_progress)?
                .check(&url, output)
                .await
        }
        Commands::Extract { url, output } => {
            CommandExecutor::new(config, overrides, show_progress)?
                .extract(&url, output)
                .await
        }
        Commands::Record {
            url,
            output,
            ffmpeg_args,
        } => {
            CommandExecutor::new(config, overrides, show_progress)?
                .record(&url, output.as_deref(), ffmpeg_args)
                .await
        }
        Commands::Thumbnail { url, output } => {
            CommandExecutor::new(config, overrides, show_progress)?
                .thumbnail(&url, output.as_deref())
                .await
        }
        Commands::Config { show, reset } => {
            if reset {
                AppConfig::reset(args.config.as_deref())?;
                println!("✓ Configuration reset to defaults");
            } else if show {
                println!("{}", config.show()?);
            } else {
                println!(
                    "Use --show to display current configuration or --reset to reset to defaults"
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Args::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(verbose),
        )
        .init();
}
