//! Bend Replay CLI
//!
//! Usage:
//!   bend-replay [OPTIONS] <SCENARIO>
//!
//! Options:
//!   -c, --config <FILE>  Bend editing configuration (TOML format)
//!   -h, --help           Print help
//!
//! Set `RUST_LOG=debug` to see overlay and normalization decisions.

use std::path::PathBuf;

use clap::Parser;

use connector_bend::{BendConfig, Scenario};

#[derive(Parser)]
#[command(name = "bend-replay")]
#[command(about = "Replay a scripted bend gesture and print the resulting connector")]
struct Cli {
    /// Scenario file (TOML format)
    scenario: PathBuf,

    /// Bend editing configuration (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match BendConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => BendConfig::default(),
    };

    let scenario = match Scenario::from_file(&cli.scenario) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Error reading scenario '{}': {}", cli.scenario.display(), e);
            std::process::exit(1);
        }
    };

    match scenario.replay(&config) {
        Ok(outcome) => print!("{}", outcome),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
