//=========================================================================
// aetheric-stage
//
// Runs the showroom demo, windowed by default or headless for a fixed
// number of ticks.
//
//=========================================================================

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use aetheric_stage::prelude::*;
use aetheric_stage::showroom::{self, ProceduralAssets, ShowroomEvent, ShowroomScreen};

/// Aetheric Stage showroom
#[derive(Parser)]
#[command(version, about = "Interactive car showroom running on the Aetheric Stage")]
struct Cli {
    /// TOML config file (engine, window and machine sections).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run without a window for this many ticks, then exit.
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,

    /// Delay the procedural asset load by this many milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 0)]
    asset_delay: u64,
}

fn run(cli: Cli) -> Result<(), EngineError> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let engine = EngineBuilder::<ShowroomScreen, ShowroomEvent>::new()
        .with_config(config)
        .with_assets(ProceduralAssets::new().with_delay(Duration::from_millis(cli.asset_delay)))
        .build()
        .init(showroom::install);

    match cli.headless {
        Some(ticks) => engine.run_headless(ticks),
        None => engine.run(),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
