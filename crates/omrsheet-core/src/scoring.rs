//! Response scoring against an answer key.

use serde::{Deserialize, Serialize};

use crate::model::AnswerMap;

/// Percentage at or above which a response counts as a pass.
pub const PASS_MARK: u32 = 60;

/// Raw score and whole-number percentage for one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Questions where the response matches the key.
    pub score: u32,
    /// `score / num_questions × 100`, rounded half up.
    pub percentage: u32,
}

impl ScoreResult {
    pub fn passed(&self) -> bool {
        self.percentage >= PASS_MARK
    }
}

/// Score a response mapping against an answer key.
///
/// Only questions present in both maps with equal values count. Omitted or
/// key-less questions neither add nor subtract.
pub fn score_responses(responses: &AnswerMap, key: &AnswerMap, num_questions: u32) -> ScoreResult {
    let score = responses
        .iter()
        .filter(|&(question, answer)| key.get(question) == Some(answer))
        .count() as u32;

    ScoreResult {
        score,
        percentage: round_percent(score as u64, num_questions as u64),
    }
}

/// `part / whole × 100` rounded half up, in integer arithmetic. Zero when
/// `whole` is zero.
pub fn round_percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part * 200 + whole) / (whole * 2)) as u32
}

/// Integer mean rounded half up. Zero for an empty slice.
pub fn round_mean(values: &[u32]) -> u32 {
    if values.is_empty() {
        return 0;
    }
    let sum: u64 = values.iter().map(|&v| v as u64).sum();
    let n = values.len() as u64;
    ((sum * 2 + n) / (n * 2)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OptionLetter::*;

    #[test]
    fn two_of_three() {
        let key = AnswerMap::from([(1, A), (2, B), (3, C)]);
        let response = AnswerMap::from([(1, A), (2, C), (3, C)]);
        let result = score_responses(&response, &key, 3);
        assert_eq!(result.score, 2);
        assert_eq!(result.percentage, 67);
        assert!(result.passed());
    }

    #[test]
    fn omissions_are_not_penalised() {
        let key = AnswerMap::from([(1, A), (2, B), (3, C), (4, D)]);
        let response = AnswerMap::from([(1, A)]);
        let result = score_responses(&response, &key, 4);
        assert_eq!(result.score, 1);
        assert_eq!(result.percentage, 25);
        assert!(!result.passed());
    }

    #[test]
    fn answers_without_key_do_not_score() {
        let key = AnswerMap::from([(1, A)]);
        let response = AnswerMap::from([(1, A), (2, B), (3, C)]);
        assert_eq!(score_responses(&response, &key, 3).score, 1);
    }

    #[test]
    fn empty_response_scores_zero() {
        let key = AnswerMap::from([(1, A)]);
        let result = score_responses(&AnswerMap::new(), &key, 10);
        assert_eq!(result, ScoreResult { score: 0, percentage: 0 });
    }

    #[test]
    fn scoring_ignores_insertion_order() {
        let key = AnswerMap::from([(1, A), (2, B), (3, C), (4, D), (5, A)]);
        let forward: AnswerMap = [(1, A), (2, C), (3, C), (4, D), (5, B)].into_iter().collect();
        let backward: AnswerMap = [(5, B), (4, D), (3, C), (2, C), (1, A)].into_iter().collect();
        assert_eq!(
            score_responses(&forward, &key, 5),
            score_responses(&backward, &key, 5)
        );
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_percent(1, 8), 13); // 12.5
        assert_eq!(round_percent(1, 3), 33);
        assert_eq!(round_percent(2, 3), 67);
        assert_eq!(round_percent(5, 5), 100);
        assert_eq!(round_percent(3, 0), 0);
    }

    #[test]
    fn mean_rounds_half_up() {
        assert_eq!(round_mean(&[]), 0);
        assert_eq!(round_mean(&[50, 51]), 51); // 50.5
        assert_eq!(round_mean(&[10, 20, 40]), 23);
    }
}
