//! Scanner error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when running an OCR backend.
#[derive(Debug, Error)]
pub enum ScannerError {
    /// The backend program could not be started.
    #[error("failed to start scanner '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend ran but reported failure.
    #[error("scanner '{program}' exited with {status}: {stderr}")]
    NonZeroExit {
        program: String,
        status: String,
        stderr: String,
    },

    /// The backend did not finish in time.
    #[error("scanner timed out after {0:?}")]
    Timeout(Duration),

    /// No scanner program is configured.
    #[error("no scanner configured; set [scanner] program in omrsheet.toml or OMRSHEET_SCANNER_COMMAND")]
    NotConfigured,
}
