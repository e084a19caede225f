//! The `omrsheet print` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;

use omrsheet_core::session::View;
use omrsheet_report::html::write_html;
use omrsheet_report::views::print_view;

use super::{load_primary_key, load_responses, load_secondary_key, open_session, SheetArgs};

pub fn execute(
    view: View,
    key: Option<PathBuf>,
    secondary: Option<PathBuf>,
    responses: Option<PathBuf>,
    args: SheetArgs,
    output: Option<PathBuf>,
) -> Result<()> {
    let (config, mut session) = open_session(&args)?;

    if let Some(path) = &key {
        load_primary_key(&mut session, path)?;
    }
    if let Some(path) = &secondary {
        load_secondary_key(&mut session, path)?;
    }
    if let Some(path) = &responses {
        load_responses(&mut session, path)?;
    }
    session.set_view(view);

    let html = print_view(&session, session.view(), Local::now().date_naive());
    let path = output.unwrap_or_else(|| {
        config
            .output_dir
            .join(format!("{view}_{}.html", session.config().unique_id))
    });
    write_html(&html, &path)?;

    println!("Printable {view}: {}", path.display());
    Ok(())
}
