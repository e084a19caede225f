//! Answer key fill patterns.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{valid_options, AnswerMap, OptionLetter};

/// Ways to fill a whole answer key at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnswerPattern {
    /// A, B, C, D, A, B, C, D, ... over the available options.
    Sequential,
    /// A, B, A, B, ...
    Alternating,
    /// Independent uniform choice per question.
    Random,
    /// One randomly chosen option for every question.
    AllSame,
}

impl AnswerPattern {
    pub const ALL: [AnswerPattern; 4] = [
        AnswerPattern::Sequential,
        AnswerPattern::Alternating,
        AnswerPattern::Random,
        AnswerPattern::AllSame,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            AnswerPattern::Sequential => "A, B, C, D, A, B, C, D...",
            AnswerPattern::Alternating => "A, B, A, B, A, B...",
            AnswerPattern::Random => "Randomly generated answers",
            AnswerPattern::AllSame => "All answers set to the same option",
        }
    }

    /// Produce a complete key for questions `1..=num_questions`.
    pub fn generate<R: Rng>(
        &self,
        num_questions: u32,
        options_per_question: u8,
        rng: &mut R,
    ) -> AnswerMap {
        let options = valid_options(options_per_question);
        if options.is_empty() {
            return AnswerMap::new();
        }

        let pick = |rng: &mut R| options[rng.gen_range(0..options.len())];
        let fixed = match self {
            AnswerPattern::AllSame => Some(pick(rng)),
            _ => None,
        };

        (1..=num_questions)
            .map(|question| {
                let i = (question - 1) as usize;
                let letter: OptionLetter = match self {
                    AnswerPattern::Sequential => options[i % options.len()],
                    AnswerPattern::Alternating => options[i % options.len().min(2)],
                    AnswerPattern::Random => pick(rng),
                    AnswerPattern::AllSame => fixed.unwrap_or(options[0]),
                };
                (question, letter)
            })
            .collect()
    }
}

impl fmt::Display for AnswerPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerPattern::Sequential => write!(f, "sequential"),
            AnswerPattern::Alternating => write!(f, "alternating"),
            AnswerPattern::Random => write!(f, "random"),
            AnswerPattern::AllSame => write!(f, "all-same"),
        }
    }
}

impl FromStr for AnswerPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(AnswerPattern::Sequential),
            "alternating" => Ok(AnswerPattern::Alternating),
            "random" => Ok(AnswerPattern::Random),
            "all-same" | "same" => Ok(AnswerPattern::AllSame),
            other => Err(format!("unknown answer pattern: {other}")),
        }
    }
}
