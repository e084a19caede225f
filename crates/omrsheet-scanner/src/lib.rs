//! omrsheet-scanner: OCR backends and configuration for omrsheet.
//!
//! Recognition is delegated to an external program configured in
//! `omrsheet.toml`; this crate runs it, parses its transcription and loads
//! the configuration file the CLI shares.

pub mod command;
pub mod config;
pub mod error;
pub mod mock;

pub use command::CommandScanner;
pub use config::{create_scanner, load_config, load_config_from, OmrConfig};
pub use error::ScannerError;
pub use mock::MockScanner;
