//! TOML roster loader.
//!
//! A roster is a batch of student submissions, each carrying the raw answer
//! text in any format the answer parser accepts.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Intermediate TOML structure for roster files.
#[derive(Debug, Deserialize)]
struct TomlRoster {
    #[serde(default)]
    students: Vec<TomlStudent>,
}

#[derive(Debug, Deserialize)]
struct TomlStudent {
    name: String,
    roll_number: String,
    answers: String,
    #[serde(default)]
    submitted_at: Option<String>,
}

/// One submission read from a roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
    pub roll_number: String,
    /// Raw answer text, parsed later against the sheet.
    pub answers: String,
    /// Explicit submission time; `None` means "now".
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Parse a roster file.
pub fn parse_roster(path: &Path) -> Result<Vec<RosterEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster file: {}", path.display()))?;

    parse_roster_str(&content, path)
}

/// Parse a roster from a TOML string (useful for testing).
pub fn parse_roster_str(content: &str, source_path: &Path) -> Result<Vec<RosterEntry>> {
    let parsed: TomlRoster = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    parsed
        .students
        .into_iter()
        .map(|s| {
            let submitted_at = s
                .submitted_at
                .map(|raw| {
                    DateTime::parse_from_rfc3339(&raw)
                        .map(|t| t.with_timezone(&Utc))
                        .with_context(|| {
                            format!("invalid submitted_at for {}: {raw}", s.roll_number)
                        })
                })
                .transpose()?;

            Ok(RosterEntry {
                name: s.name,
                roll_number: s.roll_number,
                answers: s.answers,
                submitted_at,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const ROSTER: &str = r#"
[[students]]
name = "Ada Lovelace"
roll_number = "R-001"
answers = "ABCD"
submitted_at = "2026-03-01T09:00:00Z"

[[students]]
name = "Alan Turing"
roll_number = "R-002"
answers = """
1,A
2,C
"""
"#;

    #[test]
    fn parse_valid_roster() {
        let entries = parse_roster_str(ROSTER, &PathBuf::from("roster.toml")).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].roll_number, "R-001");
        assert_eq!(
            entries[0].submitted_at.unwrap().to_rfc3339(),
            "2026-03-01T09:00:00+00:00"
        );
        assert!(entries[1].submitted_at.is_none());
        assert!(entries[1].answers.contains("2,C"));
    }

    #[test]
    fn empty_roster_is_allowed() {
        let entries = parse_roster_str("", &PathBuf::from("empty.toml")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn bad_timestamp_is_an_error() {
        let toml = r#"
[[students]]
name = "X"
roll_number = "R"
answers = "A"
submitted_at = "yesterday"
"#;
        let err = parse_roster_str(toml, &PathBuf::from("bad.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("invalid submitted_at"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let result = parse_roster_str("[[students]\nname=", &PathBuf::from("bad.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.toml");
        std::fs::write(&path, ROSTER).unwrap();
        assert_eq!(parse_roster(&path).unwrap().len(), 2);
    }
}
