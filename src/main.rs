use std::{error::Error, path::PathBuf};

use clap::Parser;
use tracing::{info, warn};

use tbbands_rust::{
    config::{Config, TaskProcess},
    telemetry::{get_subscriber, init_subscriber},
};

/// Sample tight-binding band structures along high-symmetry k-paths.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Task file (TOML)
    #[arg(default_value = "config.toml")]
    config: PathBuf,
    /// Log level used when RUST_LOG is unset
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_subscriber(get_subscriber(&cli.log_level))?;

    let config = Config::from_file(&cli.config)?;
    info!(title = config.title(), "loaded {}", cli.config.display());
    match config.tasks().bands() {
        Some(task) => {
            let output = task.task_execute()?;
            info!(
                kpoints = output.path.len(),
                bands = output.bands.num_bands(),
                file = %output.bands_file.display(),
                "band-structure task done"
            );
        }
        None => warn!("no tasks configured"),
    }
    Ok(())
}
