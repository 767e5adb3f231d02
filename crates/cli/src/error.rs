//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: color or extraction error (bad hex, unknown mode, empty pixel set)
//! - 11: I/O error (reading input files)
//! - 12: input error (bad flag value, malformed request JSON)
//! - 13: serialization error
//! - 14: worker failure (image decode, background task)

use huekit_core::ColorError;
use huekit_extract::WorkerError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// A color-level error from the core library.
    Color(ColorError),
    /// An I/O error (file or stdin read).
    Io(String),
    /// A user input error (bad flag value, bad request JSON).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
    /// The extraction worker or image decoder failed.
    Worker(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Color(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
            CliError::Worker(_) => 14,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Color(e) => write!(f, "{e}"),
            CliError::Io(msg)
            | CliError::Input(msg)
            | CliError::Serialization(msg)
            | CliError::Worker(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<ColorError> for CliError {
    fn from(e: ColorError) -> Self {
        CliError::Color(e)
    }
}

impl From<WorkerError> for CliError {
    fn from(e: WorkerError) -> Self {
        match e {
            WorkerError::Extract(inner) => CliError::Color(inner),
            other => CliError::Worker(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
