use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use snapdeck_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "snapdeck")]
#[command(author, version, about = "Main thread vs. worker thread, in a full-page terminal deck")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Start at this section (anchor name or section-N)
    #[arg(short = 's', long)]
    pub section: Option<String>,
    /// Keep the canvas on the UI thread and ship pixels to the worker
    #[arg(long)]
    pub fallback: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI
    Run(RunArgs),
    /// Run the heavy task headless and compare main thread vs worker
    Bench {
        /// Seconds of work per run (defaults to worker.seconds)
        #[arg(long)]
        seconds: Option<f64>,
        /// Which runs to perform
        #[arg(long, value_enum, default_value_t = BenchMode::Both)]
        mode: BenchMode,
        /// Save the final canvas as PNG
        #[arg(long)]
        png: Option<PathBuf>,
        /// Ship pixels instead of transferring the canvas
        #[arg(long)]
        fallback: bool,
    },
    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchMode {
    Main,
    Worker,
    Both,
}

fn env_filter(config: &AppConfig) -> EnvFilter {
    EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()))
}

/// The TUI owns the terminal, so its logs go to a file
fn init_file_logging(config: &AppConfig) -> Result<()> {
    let path = config.log_path();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating data directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn init_stderr_logging(config: &AppConfig) {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load()?;

    match cli.command {
        Some(Commands::Run(args)) => {
            init_file_logging(&config)?;
            commands::run::run(config, args).await
        }
        None => {
            init_file_logging(&config)?;
            commands::run::run(config, cli.run).await
        }
        Some(Commands::Bench {
            seconds,
            mode,
            png,
            fallback,
        }) => {
            init_stderr_logging(&config);
            if fallback {
                config.worker.offscreen = false;
            }
            let seconds = seconds.unwrap_or(config.worker.seconds);
            commands::bench::run(Arc::new(config), seconds, mode, png).await
        }
        Some(Commands::Config { init }) => {
            init_stderr_logging(&config);
            commands::config::run(&config, init)
        }
    }
}
