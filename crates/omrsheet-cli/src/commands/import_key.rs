//! The `omrsheet import-key` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;

use omrsheet_report::html::{print_document, render_answer_key, write_html};

use super::{load_primary_key, open_session, print_diagnostics, write_output, SheetArgs};

pub fn execute(input: PathBuf, args: SheetArgs, csv: bool, html: bool) -> Result<()> {
    let (config, mut session) = open_session(&args)?;
    let outcome = load_primary_key(&mut session, &input)?;

    print_diagnostics(&outcome);
    println!(
        "Completion: {}/{} ({}%)",
        session.answer_key().len(),
        session.config().num_questions,
        session.completion()
    );

    if csv {
        let (name, contents) = session.export_answer_key()?;
        let path = write_output(&config.output_dir, &name, &contents)?;
        println!("CSV: {}", path.display());
    }

    if html {
        let sheet = session.config();
        let body = render_answer_key(sheet, session.answer_key(), Local::now().date_naive());
        let path = config
            .output_dir
            .join(format!("answer_key_{}.html", sheet.unique_id));
        write_html(&print_document(&sheet.title, &body), &path)?;
        println!("Printable key: {}", path.display());
    }

    Ok(())
}
