//! CLI entry point.
//!
//! Reads the input configuration (default `test.ini`), programs every
//! configured digitizer, and writes the hardware-verified configuration to
//! `output.ini`. Wired to the simulated connector by default, so the full
//! pipeline runs without hardware attached; a CAEN-library-backed connector
//! plugs in through the same `Connector` trait.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};

use cadidaq::hardware::mock::MockConnector;
use cadidaq::{logging, run};

#[derive(Parser)]
#[command(name = "cadidaq")]
#[command(about = "Configure digitizers from an INI file and verify the result", version)]
struct Cli {
    /// Input configuration file
    #[arg(short, long, default_value = "test.ini")]
    file: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init(Level::INFO) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    info!("reading configuration file {}", cli.file.display());

    // simulated 8-channel ungrouped digitizers
    let connector = MockConnector::new(8, 1);

    match run::run_file(&cli.file, &connector, Path::new(run::OUTPUT_FILE)) {
        Ok(()) => {
            info!("program loop terminated, have a nice day :)");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
