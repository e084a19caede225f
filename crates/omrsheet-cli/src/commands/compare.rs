//! The `omrsheet compare` command.

use std::path::PathBuf;

use anyhow::Result;

use omrsheet_core::compare::MatchStatus;

use super::{load_primary_key, load_secondary_key, open_session, write_output, SheetArgs};

pub fn execute(
    primary_path: PathBuf,
    secondary_path: PathBuf,
    args: SheetArgs,
    format: String,
    csv: bool,
    fail_on_mismatch: bool,
) -> Result<()> {
    let (config, mut session) = open_session(&args)?;
    load_primary_key(&mut session, &primary_path)?;
    load_secondary_key(&mut session, &secondary_path)?;

    let report = session.compare();

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "Comparison: {} primary, {} secondary, {} mismatches, accuracy {}%",
                report.primary_count,
                report.secondary_count,
                report.mismatches.len(),
                report.accuracy
            );

            if !report.mismatches.is_empty() {
                println!("\nMismatches:");
                for m in &report.mismatches {
                    println!("  Q{}: {} vs {}", m.question, m.primary, m.secondary);
                }
            }

            let incomplete = report
                .rows
                .iter()
                .filter(|r| r.status == MatchStatus::Incomplete)
                .count();
            if incomplete > 0 {
                println!("\n{incomplete} question(s) missing from at least one key");
            }
        }
    }

    if csv {
        let (name, contents) = session.export_comparison();
        let path = write_output(&config.output_dir, &name, &contents)?;
        eprintln!("CSV: {}", path.display());
    }

    if fail_on_mismatch && report.has_mismatches() {
        std::process::exit(1);
    }

    Ok(())
}
