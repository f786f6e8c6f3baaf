use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gwdance::{GameConfig, WindowOptions};

/// Jump to the rhythm of two merging black holes.
///
/// Runs fullscreen unless any command line argument is given.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML file with game settings.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the random black hole masses.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Animation ticks per second.
    #[arg(short, long)]
    frame_rate: Option<f64>,

    /// Any extra argument also selects windowed mode, including unknown flags.
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    rest: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let windowed = std::env::args_os().len() > 1;
    let cli = Cli::parse();

    let mut config = match GameConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(frame_rate) = cli.frame_rate {
        config.frame_rate = frame_rate;
    }

    let options = WindowOptions {
        fullscreen: !windowed,
    };
    match gwdance::run(config, options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
