//! Free-form answer text parser.
//!
//! Turns pasted or uploaded text into a question → option mapping. Four
//! layouts are recognised: delimited `question,answer` records, a single
//! column of answers, a contiguous run of letters, and whitespace-separated
//! tokens. Parsing never fails; problems are reported in the outcome's
//! diagnostic lists next to whatever could be accepted.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{AnswerMap, OptionLetter, SheetConfig};

/// An entry that was read but not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidEntry {
    /// Question the value was aimed at.
    pub question: u32,
    /// The upper-cased raw value.
    pub value: String,
}

/// Result of parsing answer text against a sheet configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOutcome {
    /// Accepted answers.
    pub answers: AnswerMap,
    /// Questions answered more than once; the later value wins.
    pub duplicates: Vec<u32>,
    /// Values outside the option set, or aimed past the last question.
    pub invalid: Vec<InvalidEntry>,
    /// Questions in `1..=num_questions` with no accepted answer.
    pub missing: Vec<u32>,
}

impl ParseOutcome {
    /// Whether at least one answer was accepted.
    pub fn has_answers(&self) -> bool {
        !self.answers.is_empty()
    }

    /// Whether any duplicate or invalid entry was seen.
    pub fn has_warnings(&self) -> bool {
        !self.duplicates.is_empty() || !self.invalid.is_empty()
    }
}

/// Accumulates accepted answers and diagnostics while walking the input.
struct Collector<'a> {
    config: &'a SheetConfig,
    outcome: ParseOutcome,
}

impl<'a> Collector<'a> {
    fn new(config: &'a SheetConfig) -> Self {
        Self {
            config,
            outcome: ParseOutcome::default(),
        }
    }

    fn offer(&mut self, question: u32, candidate: String) {
        let letter = candidate
            .parse::<OptionLetter>()
            .ok()
            .filter(|l| self.config.allows(*l));

        match letter {
            Some(letter) if question <= self.config.num_questions => {
                if self.outcome.answers.insert(question, letter).is_some() {
                    self.outcome.duplicates.push(question);
                }
            }
            _ => self.outcome.invalid.push(InvalidEntry {
                question,
                value: candidate,
            }),
        }
    }

    fn finish(mut self) -> ParseOutcome {
        self.outcome.missing = (1..=self.config.num_questions)
            .filter(|q| !self.outcome.answers.contains_key(q))
            .collect();
        self.outcome
    }
}

/// Parse answer text for the given sheet.
///
/// Blank input yields an empty outcome with no diagnostics at all.
pub fn parse_answer_text(text: &str, config: &SheetConfig) -> ParseOutcome {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ParseOutcome::default();
    }

    let mut collector = Collector::new(config);
    let lines: Vec<&str> = trimmed.split('\n').collect();
    let first_line = lines[0].trim();

    if first_line.contains(',') || first_line.contains('\t') {
        parse_delimited(&lines, &mut collector);
    } else {
        parse_plain(trimmed, &mut collector);
    }

    let outcome = collector.finish();
    tracing::debug!(
        accepted = outcome.answers.len(),
        duplicates = outcome.duplicates.len(),
        invalid = outcome.invalid.len(),
        missing = outcome.missing.len(),
        "parsed answer text"
    );
    outcome
}

fn parse_delimited(lines: &[&str], collector: &mut Collector<'_>) {
    for (index, line) in lines.iter().enumerate() {
        let line_number = index as u32 + 1;
        let parts: Vec<&str> = line.split([',', '\t']).map(str::trim).collect();

        match parts.as_slice() {
            [label, answer, ..] => {
                let question = question_from_label(label).unwrap_or(line_number);
                collector.offer(question, answer.to_uppercase());
            }
            [answer] if !answer.is_empty() => {
                collector.offer(line_number, answer.to_uppercase());
            }
            _ => {}
        }
    }
}

/// Digits of a label like `"Q12"` or `"Question 12"`. Zero counts as absent;
/// numbers too large for `u32` saturate so they stay out of range.
fn question_from_label(label: &str) -> Option<u32> {
    let digits: String = label.chars().filter(char::is_ascii_digit).collect();
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return None;
    }
    Some(significant.parse::<u32>().unwrap_or(u32::MAX))
}

fn parse_plain(text: &str, collector: &mut Collector<'_>) {
    let compact: Vec<char> = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect();

    if compact.len() <= collector.config.num_questions as usize {
        for (index, c) in compact.into_iter().enumerate() {
            collector.offer(index as u32 + 1, c.to_string());
        }
    } else {
        for (index, token) in text.split_whitespace().enumerate() {
            collector.offer(index as u32 + 1, token.to_uppercase());
        }
    }
}

/// Read an answer file (CSV, TSV or plain text) into a string.
pub fn load_answer_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answer file: {}", path.display()))
}

/// Read and parse an answer file in one step.
pub fn parse_answer_file(path: &Path, config: &SheetConfig) -> Result<ParseOutcome> {
    let text = load_answer_file(path)?;
    Ok(parse_answer_text(&text, config))
}
