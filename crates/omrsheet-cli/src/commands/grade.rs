//! The `omrsheet grade` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use omrsheet_core::session::Session;

use super::{load_primary_key, load_responses, open_session, write_output, SheetArgs};

pub fn execute(key: PathBuf, responses: PathBuf, args: SheetArgs, csv: bool) -> Result<()> {
    let (config, mut session) = open_session(&args)?;
    load_primary_key(&mut session, &key)?;
    let skipped = load_responses(&mut session, &responses)?;

    print_results(&session);

    let summary = session.analytics().summary;
    println!(
        "\n{} graded, average {}%, highest {}%, lowest {}%, pass rate {}%",
        summary.total_students, summary.average, summary.highest, summary.lowest, summary.pass_rate
    );
    if skipped > 0 {
        println!("{skipped} roster entr{} skipped", if skipped == 1 { "y" } else { "ies" });
    }

    if csv {
        let (name, contents) = session.export_results()?;
        let path = write_output(&config.output_dir, &name, &contents)?;
        println!("CSV: {}", path.display());
    }

    Ok(())
}

fn print_results(session: &Session) {
    let mut table = Table::new();
    table.set_header(vec!["Name", "Roll Number", "Score", "Percentage", "Submitted"]);

    let num_questions = session.config().num_questions;
    for r in session.responses() {
        table.add_row(vec![
            Cell::new(&r.name),
            Cell::new(&r.roll_number),
            Cell::new(format!("{}/{num_questions}", r.score)),
            Cell::new(format!("{}%", r.percentage)),
            Cell::new(r.submitted_at.format("%Y-%m-%d %H:%M:%S")),
        ]);
    }

    println!("{table}");
}
