//! Subcommand implementations and the helpers they share.

pub mod analyze;
pub mod compare;
pub mod generate_key;
pub mod grade;
pub mod import_key;
pub mod init;
pub mod print;
pub mod scan;
pub mod sheet;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use omrsheet_core::model::SheetFormat;
use omrsheet_core::parser::{load_answer_file, ParseOutcome};
use omrsheet_core::roster::parse_roster;
use omrsheet_core::session::Session;
use omrsheet_scanner::config::{load_config_from, OmrConfig};

/// Sheet options shared by every command that builds a session.
#[derive(Args, Debug, Clone, Default)]
pub struct SheetArgs {
    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Sheet title
    #[arg(long)]
    pub title: Option<String>,

    /// Number of questions
    #[arg(long)]
    pub questions: Option<u32>,

    /// Options per question (2-5)
    #[arg(long)]
    pub options: Option<u8>,

    /// Sheet layout: standard or grid
    #[arg(long)]
    pub layout: Option<SheetFormat>,

    /// Fixed sheet ID instead of a generated one
    #[arg(long)]
    pub sheet_id: Option<String>,
}

/// Load the config file and start a session with CLI overrides applied.
pub fn open_session(args: &SheetArgs) -> Result<(OmrConfig, Session)> {
    let config = load_config_from(args.config.as_deref())?;
    let mut sheet = config.sheet.to_sheet_config();

    if let Some(title) = &args.title {
        sheet.title = title.clone();
    }
    if let Some(questions) = args.questions {
        sheet.num_questions = questions;
    }
    if let Some(options) = args.options {
        sheet.options_per_question = options;
    }
    if let Some(layout) = args.layout {
        sheet.format = layout;
    }
    if let Some(id) = &args.sheet_id {
        sheet.unique_id = id.clone();
    }

    let session = Session::new(sheet).context("invalid sheet configuration")?;
    Ok((config, session))
}

/// Import an answer key file into the session's primary key.
pub fn load_primary_key(session: &mut Session, path: &Path) -> Result<ParseOutcome> {
    let text = load_answer_file(path)?;
    session
        .import_answer_key(&text)
        .with_context(|| format!("failed to import answer key {}", path.display()))
}

/// Import an answer key file into the session's secondary key.
pub fn load_secondary_key(session: &mut Session, path: &Path) -> Result<ParseOutcome> {
    let text = load_answer_file(path)?;
    session
        .import_secondary_key(&text)
        .with_context(|| format!("failed to import answer key {}", path.display()))
}

/// Submit every roster entry; entries that cannot be recorded are skipped.
///
/// Returns the number of skipped entries.
pub fn load_responses(session: &mut Session, path: &Path) -> Result<usize> {
    let entries = parse_roster(path)?;
    let mut skipped = 0;

    for entry in entries {
        if let Err(e) = session.submit_response_text(
            &entry.name,
            &entry.roll_number,
            &entry.answers,
            entry.submitted_at,
        ) {
            tracing::warn!(roll_number = %entry.roll_number, "skipping roster entry: {e}");
            skipped += 1;
        }
    }

    Ok(skipped)
}

/// Print duplicate, invalid and missing diagnostics for an import.
pub fn print_diagnostics(outcome: &ParseOutcome) {
    println!("Accepted answers: {}", outcome.answers.len());
    if !outcome.duplicates.is_empty() {
        println!("  Duplicate questions (later value kept): {}", join(&outcome.duplicates));
    }
    for entry in &outcome.invalid {
        println!("  Invalid: question {} = '{}'", entry.question, entry.value);
    }
    if !outcome.missing.is_empty() {
        println!("  Missing: {} question(s)", outcome.missing.len());
    }
}

fn join(questions: &[u32]) -> String {
    questions
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Write `contents` to `dir/name`, creating the directory.
pub fn write_output(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    let path = dir.join(name);
    std::fs::write(&path, contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
