//! blinkpace: Main Entry Point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  rppal GPIO/I2C    LogEventSink   JsonConfigFile   signals   │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ───────────────────     │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  BlinkService (pure logic)                             │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  Strategy: event-loop · threads · pub-sub · async            │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use blinkpace::adapters::config_file::JsonConfigFile;
use blinkpace::adapters::{hardware, signals};
use blinkpace::app::ports::ConfigPort;
use blinkpace::config::SystemConfig;
use blinkpace::logging;
use blinkpace::strategies::{self, Strategy};

#[derive(Parser, Debug)]
#[command(name = "blinkpace", version, about = "Button + potentiometer LED blink-rate controller")]
struct Cli {
    /// Concurrency strategy (overrides the config file).
    #[arg(short, long, value_enum)]
    strategy: Option<Strategy>,

    /// JSON config file. Missing file means defaults.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debug-level logging.
    #[arg(short, long)]
    verbose: bool,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => JsonConfigFile::new(path)
            .load()
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SystemConfig::default(),
    };
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    config.validate().context("invalid configuration")?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    info!("blinkpace v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = signals::shutdown_flag().context("registering signal handlers")?;
    let peripherals = hardware::build(&config).context("initialising hardware")?;

    strategies::run(config.strategy, peripherals, &config, &shutdown)
        .context("running strategy")?;

    info!("blinkpace stopped, all LEDs off");
    Ok(())
}
