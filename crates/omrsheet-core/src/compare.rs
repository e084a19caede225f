//! Answer key comparison.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{AnswerMap, OptionLetter};
use crate::scoring::round_percent;

/// Agreement between two keys on one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Match,
    Mismatch,
    /// At least one side has no answer.
    Incomplete,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Match => write!(f, "match"),
            MatchStatus::Mismatch => write!(f, "mismatch"),
            MatchStatus::Incomplete => write!(f, "incomplete"),
        }
    }
}

/// One row of the comparison table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionComparison {
    pub question: u32,
    pub primary: Option<OptionLetter>,
    pub secondary: Option<OptionLetter>,
    pub status: MatchStatus,
}

/// A question where both keys answer and disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    pub question: u32,
    pub primary: OptionLetter,
    pub secondary: OptionLetter,
}

/// Result of comparing a primary key against a secondary one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// One entry per question `1..=num_questions`.
    pub rows: Vec<QuestionComparison>,
    pub mismatches: Vec<Mismatch>,
    pub primary_count: usize,
    pub secondary_count: usize,
    /// `min(primary_count, secondary_count) - mismatches`.
    pub matches: usize,
    /// `matches / min(primary_count, secondary_count)` in percent.
    pub accuracy: u32,
}

/// Compare two keys question by question.
///
/// Accuracy uses the smaller key as denominator, so swapping the two sides
/// only gives the same accuracy when both keys have the same size. It is 0
/// when the secondary key is empty.
pub fn compare_answer_keys(
    primary: &AnswerMap,
    secondary: &AnswerMap,
    num_questions: u32,
) -> ComparisonReport {
    let mut rows = Vec::with_capacity(num_questions as usize);
    let mut mismatches = Vec::new();

    for question in 1..=num_questions {
        let p = primary.get(&question).copied();
        let s = secondary.get(&question).copied();
        let status = match (p, s) {
            (Some(a), Some(b)) if a == b => MatchStatus::Match,
            (Some(a), Some(b)) => {
                mismatches.push(Mismatch {
                    question,
                    primary: a,
                    secondary: b,
                });
                MatchStatus::Mismatch
            }
            _ => MatchStatus::Incomplete,
        };
        rows.push(QuestionComparison {
            question,
            primary: p,
            secondary: s,
            status,
        });
    }

    let primary_count = primary.len();
    let secondary_count = secondary.len();
    let overlap = primary_count.min(secondary_count);
    let matches = overlap.saturating_sub(mismatches.len());
    let accuracy = if secondary_count > 0 {
        round_percent(matches as u64, overlap as u64)
    } else {
        0
    };

    ComparisonReport {
        rows,
        mismatches,
        primary_count,
        secondary_count,
        matches,
        accuracy,
    }
}

impl ComparisonReport {
    /// Returns true if the keys disagree anywhere both have an answer.
    pub fn has_mismatches(&self) -> bool {
        !self.mismatches.is_empty()
    }

    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} primary answers, {} secondary answers, {} mismatches, {}% accuracy\n\n",
            self.primary_count,
            self.secondary_count,
            self.mismatches.len(),
            self.accuracy
        ));

        if !self.mismatches.is_empty() {
            md.push_str("### Mismatches\n\n");
            md.push_str("| Question | Primary | Secondary |\n");
            md.push_str("|----------|---------|-----------|\n");
            for m in &self.mismatches {
                md.push_str(&format!(
                    "| {} | {} | {} |\n",
                    m.question, m.primary, m.secondary
                ));
            }
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OptionLetter::*;

    #[test]
    fn one_mismatch_of_two() {
        let primary = AnswerMap::from([(1, A), (2, B)]);
        let secondary = AnswerMap::from([(1, A), (2, C)]);
        let report = compare_answer_keys(&primary, &secondary, 2);

        assert_eq!(
            report.mismatches,
            vec![Mismatch {
                question: 2,
                primary: B,
                secondary: C
            }]
        );
        assert_eq!(report.matches, 1);
        assert_eq!(report.accuracy, 50);
        assert_eq!(report.rows[0].status, MatchStatus::Match);
        assert_eq!(report.rows[1].status, MatchStatus::Mismatch);
    }

    #[test]
    fn incomplete_rows() {
        let primary = AnswerMap::from([(1, A), (3, D)]);
        let secondary = AnswerMap::from([(1, A), (2, B)]);
        let report = compare_answer_keys(&primary, &secondary, 4);

        let statuses: Vec<_> = report.rows.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                MatchStatus::Match,
                MatchStatus::Incomplete,
                MatchStatus::Incomplete,
                MatchStatus::Incomplete
            ]
        );
        assert!(!report.has_mismatches());
        // min(2, 2) - 0 mismatches
        assert_eq!(report.accuracy, 100);
    }

    #[test]
    fn empty_secondary_gives_zero_accuracy() {
        let primary = AnswerMap::from([(1, A)]);
        let report = compare_answer_keys(&primary, &AnswerMap::new(), 1);
        assert_eq!(report.accuracy, 0);
        assert_eq!(report.secondary_count, 0);
    }

    #[test]
    fn empty_primary_does_not_divide_by_zero() {
        let secondary = AnswerMap::from([(1, A)]);
        let report = compare_answer_keys(&AnswerMap::new(), &secondary, 1);
        assert_eq!(report.accuracy, 0);
    }

    #[test]
    fn accuracy_is_symmetric_for_equal_sizes() {
        let a = AnswerMap::from([(1, A), (2, B), (3, C)]);
        let b = AnswerMap::from([(1, A), (2, D), (3, C)]);
        assert_eq!(
            compare_answer_keys(&a, &b, 3).accuracy,
            compare_answer_keys(&b, &a, 3).accuracy
        );
    }

    #[test]
    fn accuracy_depends_on_smaller_key() {
        let big = AnswerMap::from([(1, A), (2, B), (3, C), (4, D)]);
        let small = AnswerMap::from([(1, A), (2, C)]);
        // min(4, 2) = 2, one mismatch
        assert_eq!(compare_answer_keys(&big, &small, 4).accuracy, 50);
        assert_eq!(compare_answer_keys(&small, &big, 4).accuracy, 50);

        let empty = AnswerMap::new();
        assert_eq!(compare_answer_keys(&big, &empty, 4).accuracy, 0);
        assert_eq!(compare_answer_keys(&empty, &big, 4).accuracy, 0);
    }

    #[test]
    fn markdown_lists_mismatches() {
        let primary = AnswerMap::from([(1, A), (2, B)]);
        let secondary = AnswerMap::from([(1, A), (2, C)]);
        let md = compare_answer_keys(&primary, &secondary, 2).to_markdown();
        assert!(md.contains("### Mismatches"));
        assert!(md.contains("| 2 | B | C |"));
    }
}
