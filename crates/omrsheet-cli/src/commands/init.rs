//! The `omrsheet init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("omrsheet.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("samples")?;
    write_if_missing(Path::new("samples/answer_key.csv"), SAMPLE_KEY)?;
    write_if_missing(Path::new("samples/second_key.txt"), SAMPLE_SECOND_KEY)?;
    write_if_missing(Path::new("samples/roster.toml"), SAMPLE_ROSTER)?;

    println!("\nNext steps:");
    println!("  1. Edit omrsheet.toml to describe your sheet");
    println!("  2. Run: omrsheet sheet");
    println!("  3. Run: omrsheet grade --key samples/answer_key.csv --responses samples/roster.toml");

    Ok(())
}

fn write_if_missing(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, contents)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# omrsheet configuration

output_dir = "./omrsheet-output"

[sheet]
title = "Sample Quiz"
num_questions = 10
options_per_question = 4
show_name = true
show_roll_number = true
show_instructions = true
format = "standard"

# External recognition program for `omrsheet scan`. It receives the image on
# stdin and must print answers in any format `import-key` accepts.
# [scanner]
# program = "${OMR_ENGINE}"
# args = ["--stdin"]
# timeout_secs = 30
"#;

const SAMPLE_KEY: &str = "1,A
2,C
3,B
4,D
5,A
6,B
7,C
8,D
9,A
10,B
";

const SAMPLE_SECOND_KEY: &str = "A C B D A B C A A B\n";

const SAMPLE_ROSTER: &str = r#"# One [[students]] entry per submission. `answers` accepts the same formats
# as an answer key file.

[[students]]
name = "Ada Lovelace"
roll_number = "R-001"
answers = "ACBDABCDAB"
submitted_at = "2026-03-01T09:00:00Z"

[[students]]
name = "Alan Turing"
roll_number = "R-002"
answers = "A C B D A B C A C C"
submitted_at = "2026-03-01T09:05:00Z"

[[students]]
name = "Grace Hopper"
roll_number = "R-003"
answers = """
1,A
2,B
3,B
4,D
5,C
"""
submitted_at = "2026-03-01T09:10:00Z"
"#;
