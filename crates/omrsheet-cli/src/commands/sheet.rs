//! The `omrsheet sheet` command.

use std::path::PathBuf;

use anyhow::Result;

use omrsheet_report::html::{print_document, render_sheet, write_html};

use super::{open_session, SheetArgs};

pub fn execute(args: SheetArgs, output: Option<PathBuf>) -> Result<()> {
    let (config, session) = open_session(&args)?;
    let sheet = session.config();

    let path = output.unwrap_or_else(|| {
        config
            .output_dir
            .join(format!("sheet_{}.html", sheet.unique_id))
    });
    write_html(&print_document(&sheet.title, &render_sheet(sheet)), &path)?;

    println!("Sheet ID: {}", sheet.unique_id);
    println!(
        "{} questions, {} options, {} layout",
        sheet.num_questions, sheet.options_per_question, sheet.format
    );
    println!("Written to: {}", path.display());
    Ok(())
}
