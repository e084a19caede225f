//! Domain error types.
//!
//! Parse warnings (duplicates, invalid entries, missing questions) are not
//! errors; they travel alongside the partial result in
//! [`ParseOutcome`](crate::parser::ParseOutcome). These variants cover the
//! actions that must be blocked.

use thiserror::Error;

use crate::model::{OptionLetter, MAX_OPTIONS, MIN_OPTIONS};

/// Errors raised by session operations and configuration checks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OmrError {
    /// A sheet must have at least one question.
    #[error("question count must be at least 1, got {0}")]
    InvalidQuestionCount(u32),

    /// Options per question outside the supported range.
    #[error(
        "options per question must be between {min} and {max}, got {0}",
        min = MIN_OPTIONS,
        max = MAX_OPTIONS
    )]
    InvalidOptionCount(u8),

    /// A question number outside `1..=num_questions`.
    #[error("question {question} is outside 1..={num_questions}")]
    QuestionOutOfRange { question: u32, num_questions: u32 },

    /// A letter beyond the sheet's option count.
    #[error("option {letter} is not available with {options_per_question} options per question")]
    OptionNotAllowed {
        letter: OptionLetter,
        options_per_question: u8,
    },

    /// Imported text produced no usable answers.
    #[error("no valid answers found, please check the format")]
    NoValidAnswers,

    /// A required submission field was blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A submission carried no answers at all.
    #[error("no responses to submit")]
    EmptyResponses,

    /// An export or grading step needs a non-empty answer key.
    #[error("answer key is empty")]
    EmptyAnswerKey,
}

impl OmrError {
    /// Returns `true` for errors caused by the sheet configuration itself.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            OmrError::InvalidQuestionCount(_) | OmrError::InvalidOptionCount(_)
        )
    }
}
