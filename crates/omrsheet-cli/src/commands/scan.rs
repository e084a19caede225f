//! The `omrsheet scan` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use omrsheet_core::traits::ScanRequest;
use omrsheet_scanner::create_scanner;

use super::{load_primary_key, open_session, print_diagnostics, SheetArgs};

pub async fn execute(
    image: PathBuf,
    name: String,
    roll_number: String,
    key: PathBuf,
    args: SheetArgs,
) -> Result<()> {
    let (config, mut session) = open_session(&args)?;
    load_primary_key(&mut session, &key)?;

    let bytes = std::fs::read(&image)
        .with_context(|| format!("failed to read image {}", image.display()))?;
    let scanner = create_scanner(&config)?;

    eprintln!("Scanning {} with {}...", image.display(), scanner.name());
    let request = ScanRequest {
        image: bytes,
        config: session.config().clone(),
    };
    let scanned = scanner.scan(&request).await?;
    tracing::info!(
        answers = scanned.answers.len(),
        latency_ms = scanned.latency_ms,
        "scan complete"
    );

    print_diagnostics(&scanned.diagnostics);

    let num_questions = session.config().num_questions;
    let response = session
        .submit_response(&name, &roll_number, scanned.answers)
        .context("scan produced no usable response")?;

    println!(
        "{} ({}): {}/{} ({}%)",
        response.name, response.roll_number, response.score, num_questions, response.percentage
    );
    Ok(())
}
