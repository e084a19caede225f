//! The `omrsheet generate-key` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use omrsheet_core::patterns::AnswerPattern;

use super::{open_session, write_output, SheetArgs};

pub fn execute(
    pattern: AnswerPattern,
    seed: Option<u64>,
    args: SheetArgs,
    output: Option<PathBuf>,
) -> Result<()> {
    let (config, mut session) = open_session(&args)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    session.apply_pattern(pattern, &mut rng);

    let (name, contents) = session.export_answer_key()?;
    let path = match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &contents)
                .with_context(|| format!("failed to write {}", path.display()))?;
            path
        }
        None => write_output(&config.output_dir, &name, &contents)?,
    };

    let letters: String = session
        .answer_key()
        .values()
        .map(|l| l.as_char())
        .collect();
    println!("Pattern: {pattern} ({})", pattern.description());
    println!("Key: {letters}");
    println!("Written to: {}", path.display());
    Ok(())
}
