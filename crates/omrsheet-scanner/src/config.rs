//! Configuration file loading and scanner factory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use omrsheet_core::model::{SheetConfig, SheetFormat};
use omrsheet_core::traits::ResponseScanner;

use crate::command::CommandScanner;
use crate::error::ScannerError;

/// Environment variable that overrides `scanner.program`.
pub const SCANNER_COMMAND_ENV: &str = "OMRSHEET_SCANNER_COMMAND";

/// Default sheet layout used when a command does not override it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetDefaults {
    pub title: String,
    pub num_questions: u32,
    pub options_per_question: u8,
    pub show_name: bool,
    pub show_roll_number: bool,
    pub show_instructions: bool,
    pub format: SheetFormat,
}

impl Default for SheetDefaults {
    fn default() -> Self {
        let sheet = SheetConfig::default();
        Self {
            title: sheet.title,
            num_questions: sheet.num_questions,
            options_per_question: sheet.options_per_question,
            show_name: sheet.show_name,
            show_roll_number: sheet.show_roll_number,
            show_instructions: sheet.show_instructions,
            format: sheet.format,
        }
    }
}

impl SheetDefaults {
    /// Build a sheet configuration with a freshly generated identifier.
    pub fn to_sheet_config(&self) -> SheetConfig {
        SheetConfig {
            title: self.title.clone(),
            num_questions: self.num_questions,
            options_per_question: self.options_per_question,
            show_name: self.show_name,
            show_roll_number: self.show_roll_number,
            show_instructions: self.show_instructions,
            format: self.format,
            ..SheetConfig::default()
        }
    }
}

/// External recognition program settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(default)]
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Top-level omrsheet configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OmrConfig {
    /// Directory for exports and rendered documents.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub sheet: SheetDefaults,
    #[serde(default)]
    pub scanner: Option<ScannerConfig>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./omrsheet-output")
}

impl Default for OmrConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            sheet: SheetDefaults::default(),
            scanner: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(len) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + len];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + len + 1..]);
        from = start + value.len();
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `omrsheet.toml` in the current directory
/// 2. `~/.config/omrsheet/config.toml`
///
/// `OMRSHEET_SCANNER_COMMAND` overrides the scanner program.
pub fn load_config() -> Result<OmrConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<OmrConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("omrsheet.toml");
            if local.exists() {
                Some(local)
            } else {
                global_config_path().filter(|p| p.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            parse_config_file(&path)?
        }
        None => OmrConfig::default(),
    };

    if let Ok(program) = std::env::var(SCANNER_COMMAND_ENV) {
        config
            .scanner
            .get_or_insert_with(|| ScannerConfig {
                program: String::new(),
                args: Vec::new(),
                timeout_secs: default_timeout_secs(),
            })
            .program = program;
    }

    if let Some(scanner) = config.scanner.as_mut() {
        scanner.program = resolve_env_vars(&scanner.program);
        scanner.args = scanner.args.iter().map(|a| resolve_env_vars(a)).collect();
    }

    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<OmrConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<OmrConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn global_config_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|h| {
        PathBuf::from(h)
            .join(".config")
            .join("omrsheet")
            .join("config.toml")
    })
}

/// Create the configured scanner.
pub fn create_scanner(config: &OmrConfig) -> Result<Box<dyn ResponseScanner>, ScannerError> {
    match &config.scanner {
        Some(scanner) if !scanner.program.trim().is_empty() => Ok(Box::new(
            CommandScanner::new(scanner.program.trim())
                .with_args(scanner.args.clone())
                .with_timeout(Duration::from_secs(scanner.timeout_secs)),
        )),
        _ => Err(ScannerError::NotConfigured),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_OMRSHEET_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_OMRSHEET_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_OMRSHEET_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${_OMRSHEET_UNSET_VAR}x"), "x");
        assert_eq!(resolve_env_vars("no refs ${"), "no refs ${");
        std::env::remove_var("_OMRSHEET_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = OmrConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("./omrsheet-output"));
        assert_eq!(config.sheet.num_questions, 50);
        assert_eq!(config.sheet.options_per_question, 4);
        assert!(config.scanner.is_none());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
output_dir = "out"

[sheet]
title = "Physics Midterm"
num_questions = 30
options_per_question = 5
show_instructions = false
format = "grid"

[scanner]
program = "omr-engine"
args = ["--stdin", "--format=csv"]
"#;
        let config: OmrConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.sheet.title, "Physics Midterm");
        assert!(config.sheet.show_name);
        assert!(!config.sheet.show_instructions);
        assert_eq!(config.sheet.format, SheetFormat::Grid);

        let scanner = config.scanner.unwrap();
        assert_eq!(scanner.args.len(), 2);
        assert_eq!(scanner.timeout_secs, 30);
    }

    #[test]
    fn sheet_defaults_build_valid_config() {
        let defaults = SheetDefaults {
            num_questions: 12,
            ..SheetDefaults::default()
        };
        let sheet = defaults.to_sheet_config();
        assert_eq!(sheet.num_questions, 12);
        assert_eq!(sheet.unique_id.len(), 8);
        assert!(sheet.validate().is_ok());
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("/nonexistent/omrsheet.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("omrsheet.toml");
        std::fs::write(&path, "[sheet]\nnum_questions = 7\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.sheet.num_questions, 7);
    }

    #[test]
    fn malformed_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[sheet\n").unwrap();

        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn scanner_requires_program() {
        assert!(matches!(
            create_scanner(&OmrConfig::default()),
            Err(ScannerError::NotConfigured)
        ));

        let config = OmrConfig {
            scanner: Some(ScannerConfig {
                program: "  ".into(),
                args: vec![],
                timeout_secs: 5,
            }),
            ..OmrConfig::default()
        };
        assert!(create_scanner(&config).is_err());

        let config = OmrConfig {
            scanner: Some(ScannerConfig {
                program: "omr-engine".into(),
                args: vec![],
                timeout_secs: 5,
            }),
            ..OmrConfig::default()
        };
        assert_eq!(create_scanner(&config).unwrap().name(), "command");
    }
}
