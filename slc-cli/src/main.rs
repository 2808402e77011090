//! SLC CLI - Command-line interface
//!
//! Manage speed limit controller settings, publish source readings, and run
//! the resolver against the persistent and live parameter stores.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use slc::logging::{init_logging, LoggingConfig};

use commands::common::{SourceArg, SpeedUnitArg, Stores};
use commands::config::ConfigCommands;
use error::CliError;

/// Speed limit resolution for a driving assistance control loop.
#[derive(Debug, Parser)]
#[command(name = "slc", version, about, long_about = None)]
struct Cli {
    /// Persistent settings directory (default: platform config dir)
    #[arg(long, global = true, value_name = "DIR")]
    params: Option<PathBuf>,

    /// Live readings directory shared with publishers (default: /dev/shm)
    #[arg(long, global = true, value_name = "DIR")]
    live: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs to a file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// View and modify speed limit controller settings
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Publish a speed limit reading for one source
    Publish {
        /// Source the reading comes from
        #[arg(value_enum)]
        source: SourceArg,

        /// Speed limit value (0 clears the reading)
        value: f64,

        /// Unit of the value
        #[arg(long, value_enum, default_value_t = SpeedUnitArg::Ms)]
        unit: SpeedUnitArg,
    },

    /// Resolve the active speed limit once and print it
    Resolve {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the resolver as a control loop until interrupted
    Run {
        /// Control loop frequency
        #[arg(long, default_value_t = 20)]
        hz: u32,

        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", console::style("error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let _guard = init_logging(&LoggingConfig {
        verbose: cli.verbose,
        log_file: cli.log_file.clone(),
    })?;

    let stores = Stores::open(cli.params, cli.live);

    match cli.command {
        Commands::Config(command) => commands::config::run(command, &stores),
        Commands::Publish {
            source,
            value,
            unit,
        } => commands::publish::run(&stores, source, value, unit),
        Commands::Resolve { json } => commands::resolve::run(&stores, json),
        Commands::Run { hz, ticks } => commands::run::run(&stores, hz, ticks),
    }
}
