//! CLI error type.

use slc::logging::LoggingError;
use slc::ParamsError;
use thiserror::Error;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading or writing a parameter store failed.
    #[error(transparent)]
    Params(#[from] ParamsError),

    /// Logging could not be initialized.
    #[error(transparent)]
    Logging(#[from] LoggingError),

    /// Invalid configuration key or value.
    #[error("{0}")]
    Config(String),

    /// Invalid command arguments.
    #[error("{0}")]
    Usage(String),

    /// Output could not be produced.
    #[error("Failed to write output: {0}")]
    Output(String),

    /// The interrupt handler could not be installed.
    #[error("Failed to install Ctrl-C handler: {0}")]
    Signal(String),
}
