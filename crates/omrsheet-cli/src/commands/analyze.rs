//! The `omrsheet analyze` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use omrsheet_core::report::AnalyticsReport;
use omrsheet_report::analytics::write_analytics_html;

use super::{load_primary_key, load_responses, open_session, SheetArgs};

pub fn execute(
    key: PathBuf,
    responses: PathBuf,
    args: SheetArgs,
    output: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let (config, mut session) = open_session(&args)?;
    load_primary_key(&mut session, &key)?;
    load_responses(&mut session, &responses)?;

    let report = session.analytics_report();
    print_summary(&report);

    let output = output.unwrap_or(config.output_dir);
    std::fs::create_dir_all(&output)?;
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("analytics-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Analytics saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("analytics-{timestamp}.html"));
                write_analytics_html(&report, &path)?;
                eprintln!("HTML dashboard: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

fn print_summary(report: &AnalyticsReport) {
    let a = &report.analytics;
    println!("{}", report.to_markdown());

    let mut table = Table::new();
    table.set_header(vec!["Question", "Correct", "Incorrect", "Success", "Difficulty"]);
    for q in &a.questions {
        table.add_row(vec![
            Cell::new(format!("Q{}", q.question)),
            Cell::new(q.correct),
            Cell::new(q.incorrect),
            Cell::new(format!("{:.1}%", q.success_rate)),
            Cell::new(q.difficulty),
        ]);
    }
    println!("{table}");
}
