//! Core data model types for omrsheet.
//!
//! These are the fundamental types the whole workspace uses to describe a
//! sheet, its answer key, and the responses recorded against it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::OmrError;

/// Smallest number of options a question may offer.
pub const MIN_OPTIONS: u8 = 2;
/// Largest number of options a question may offer.
pub const MAX_OPTIONS: u8 = 5;

/// Length of a generated sheet identifier.
pub const SHEET_ID_LEN: usize = 8;

/// A single bubble label on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
    E,
}

/// All option letters in sheet order.
pub const OPTION_LETTERS: [OptionLetter; 5] = [
    OptionLetter::A,
    OptionLetter::B,
    OptionLetter::C,
    OptionLetter::D,
    OptionLetter::E,
];

impl OptionLetter {
    /// Zero-based position of the letter on the sheet.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Letter at a zero-based position, if one exists.
    pub fn from_index(index: usize) -> Option<Self> {
        OPTION_LETTERS.get(index).copied()
    }

    pub fn as_char(self) -> char {
        match self {
            OptionLetter::A => 'A',
            OptionLetter::B => 'B',
            OptionLetter::C => 'C',
            OptionLetter::D => 'D',
            OptionLetter::E => 'E',
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for OptionLetter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A" => Ok(OptionLetter::A),
            "B" => Ok(OptionLetter::B),
            "C" => Ok(OptionLetter::C),
            "D" => Ok(OptionLetter::D),
            "E" => Ok(OptionLetter::E),
            other => Err(format!("unknown option letter: {other}")),
        }
    }
}

/// The first `options_per_question` letters, clamped to the A-E range.
pub fn valid_options(options_per_question: u8) -> &'static [OptionLetter] {
    let n = usize::from(options_per_question).min(OPTION_LETTERS.len());
    &OPTION_LETTERS[..n]
}

/// Question number (1-based) to chosen option.
///
/// Used both for answer keys and for student responses. Keys need not be
/// contiguous or complete.
pub type AnswerMap = BTreeMap<u32, OptionLetter>;

/// Layout variant of a printed sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetFormat {
    #[default]
    Standard,
    Grid,
}

impl fmt::Display for SheetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetFormat::Standard => write!(f, "standard"),
            SheetFormat::Grid => write!(f, "grid"),
        }
    }
}

impl FromStr for SheetFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "list" => Ok(SheetFormat::Standard),
            "grid" => Ok(SheetFormat::Grid),
            other => Err(format!("unknown sheet format: {other}")),
        }
    }
}

/// Everything needed to lay out a sheet and validate answers against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Heading printed at the top of the sheet.
    pub title: String,
    /// Number of questions, numbered from 1.
    pub num_questions: u32,
    /// Number of bubbles per question (2-5).
    pub options_per_question: u8,
    /// Print a name field.
    #[serde(default = "default_true")]
    pub show_name: bool,
    /// Print a roll number field.
    #[serde(default = "default_true")]
    pub show_roll_number: bool,
    /// Print the marking instructions.
    #[serde(default = "default_true")]
    pub show_instructions: bool,
    /// Display label for this sheet; not a security token.
    pub unique_id: String,
    #[serde(default)]
    pub format: SheetFormat,
}

fn default_true() -> bool {
    true
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            title: "Examination OMR Sheet".to_string(),
            num_questions: 50,
            options_per_question: 4,
            show_name: true,
            show_roll_number: true,
            show_instructions: true,
            unique_id: new_sheet_id(),
            format: SheetFormat::Standard,
        }
    }
}

impl SheetConfig {
    /// Check the question and option counts.
    pub fn validate(&self) -> Result<(), OmrError> {
        if self.num_questions == 0 {
            return Err(OmrError::InvalidQuestionCount(self.num_questions));
        }
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&self.options_per_question) {
            return Err(OmrError::InvalidOptionCount(self.options_per_question));
        }
        Ok(())
    }

    /// Letters a student may mark on this sheet.
    pub fn valid_options(&self) -> &'static [OptionLetter] {
        valid_options(self.options_per_question)
    }

    /// Whether `letter` may appear in an answer for this sheet.
    pub fn allows(&self, letter: OptionLetter) -> bool {
        letter.index() < usize::from(self.options_per_question)
    }

    /// Whether `question` exists on this sheet.
    pub fn contains_question(&self, question: u32) -> bool {
        (1..=self.num_questions).contains(&question)
    }
}

/// Generate an 8-character uppercase base-36 sheet identifier.
pub fn generate_sheet_id<R: Rng>(rng: &mut R) -> String {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    (0..SHEET_ID_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Generate a sheet identifier from the thread-local RNG.
pub fn new_sheet_id() -> String {
    generate_sheet_id(&mut rand::thread_rng())
}

/// A scored submission from one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentResponse {
    /// `{roll_number}_{unix millis}` at submission time.
    pub id: String,
    pub name: String,
    pub roll_number: String,
    /// What the student marked.
    pub responses: AnswerMap,
    /// Number of answers matching the key.
    pub score: u32,
    /// `score / num_questions`, rounded to a whole percent.
    pub percentage: u32,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn option_letter_display_and_parse() {
        assert_eq!(OptionLetter::C.to_string(), "C");
        assert_eq!("b".parse::<OptionLetter>().unwrap(), OptionLetter::B);
        assert_eq!("E".parse::<OptionLetter>().unwrap(), OptionLetter::E);
        assert!("F".parse::<OptionLetter>().is_err());
        assert!("AB".parse::<OptionLetter>().is_err());
        assert!("".parse::<OptionLetter>().is_err());
    }

    #[test]
    fn valid_options_truncates() {
        assert_eq!(valid_options(2), &[OptionLetter::A, OptionLetter::B]);
        assert_eq!(valid_options(5).len(), 5);
        assert_eq!(valid_options(9).len(), 5);
    }

    #[test]
    fn sheet_format_display_and_parse() {
        assert_eq!(SheetFormat::Grid.to_string(), "grid");
        assert_eq!("Standard".parse::<SheetFormat>().unwrap(), SheetFormat::Standard);
        assert!("poster".parse::<SheetFormat>().is_err());
    }

    #[test]
    fn config_default_is_valid() {
        let config = SheetConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.num_questions, 50);
        assert_eq!(config.options_per_question, 4);
        assert_eq!(config.unique_id.len(), SHEET_ID_LEN);
    }

    #[test]
    fn config_rejects_bad_counts() {
        let config = SheetConfig {
            num_questions: 0,
            ..SheetConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(OmrError::InvalidQuestionCount(0))
        ));

        let config = SheetConfig {
            options_per_question: 6,
            ..SheetConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(OmrError::InvalidOptionCount(6))
        ));
    }

    #[test]
    fn config_allows_only_leading_letters() {
        let config = SheetConfig {
            options_per_question: 3,
            ..SheetConfig::default()
        };
        assert!(config.allows(OptionLetter::C));
        assert!(!config.allows(OptionLetter::D));
        assert!(config.contains_question(1));
        assert!(!config.contains_question(0));
        assert!(!config.contains_question(51));
    }

    #[test]
    fn sheet_id_is_uppercase_base36() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let id = generate_sheet_id(&mut rng);
            assert_eq!(id.len(), SHEET_ID_LEN);
            assert!(id
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
    }
}
