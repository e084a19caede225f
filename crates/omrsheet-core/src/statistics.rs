//! Aggregate statistics over a class of scored responses.
//!
//! Everything here is a pure function of the sheet configuration, the answer
//! key and the recorded responses.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{AnswerMap, OptionLetter, SheetConfig, StudentResponse};
use crate::scoring::{round_mean, round_percent, PASS_MARK};

/// How many entries `top_performers` returns.
pub const TOP_PERFORMERS: usize = 5;

/// How many questions `hardest_questions` and `easiest_questions` list.
pub const DIFFICULTY_HIGHLIGHTS: usize = 5;

const SCORE_BANDS: [(u32, u32); 5] = [(0, 20), (21, 40), (41, 60), (61, 80), (81, 100)];

/// Count of responses whose percentage falls in `[min, max]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBand {
    /// Display label, e.g. `"21-40%"`.
    pub range: String,
    pub min: u32,
    pub max: u32,
    pub count: usize,
}

/// Bucket responses into the five fixed percentage bands.
pub fn score_distribution(responses: &[StudentResponse]) -> Vec<ScoreBand> {
    SCORE_BANDS
        .iter()
        .map(|&(min, max)| ScoreBand {
            range: format!("{min}-{max}%"),
            min,
            max,
            count: responses
                .iter()
                .filter(|r| (min..=max).contains(&r.percentage))
                .count(),
        })
        .collect()
}

/// Three-level difficulty derived from a question's success rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Classify a success rate given in percent.
    pub fn from_rate(rate: f64) -> Self {
        if rate < 30.0 {
            Difficulty::Hard
        } else if rate < 70.0 {
            Difficulty::Medium
        } else {
            Difficulty::Easy
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// Per-question breakdown across all responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnalysis {
    pub question: u32,
    /// Responses that answered this question and matched the key.
    pub correct: usize,
    /// Responses that answered this question and did not match (including
    /// when the key has no answer for it).
    pub incorrect: usize,
    /// `correct / (correct + incorrect)` in percent; 0 with no answers.
    pub success_rate: f64,
    pub difficulty: Difficulty,
    /// How often each option was chosen. Every valid option is present.
    pub option_distribution: BTreeMap<OptionLetter, usize>,
}

impl QuestionAnalysis {
    pub fn answered(&self) -> usize {
        self.correct + self.incorrect
    }
}

/// Analyse every question `1..=num_questions`.
pub fn question_analysis(
    config: &SheetConfig,
    key: &AnswerMap,
    responses: &[StudentResponse],
) -> Vec<QuestionAnalysis> {
    (1..=config.num_questions)
        .map(|question| {
            let correct_answer = key.get(&question);
            let mut option_distribution: BTreeMap<OptionLetter, usize> =
                config.valid_options().iter().map(|&l| (l, 0)).collect();
            let mut correct = 0;
            let mut incorrect = 0;

            for answer in responses.iter().filter_map(|r| r.responses.get(&question)) {
                *option_distribution.entry(*answer).or_insert(0) += 1;
                if correct_answer == Some(answer) {
                    correct += 1;
                } else {
                    incorrect += 1;
                }
            }

            let answered = correct + incorrect;
            let (success_rate, difficulty) = if answered == 0 {
                (0.0, Difficulty::Easy)
            } else {
                let rate = correct as f64 / answered as f64 * 100.0;
                (rate, Difficulty::from_rate(rate))
            };

            QuestionAnalysis {
                question,
                correct,
                incorrect,
                success_rate,
                difficulty,
                option_distribution,
            }
        })
        .collect()
}

/// How often each valid option is the correct answer in the key.
pub fn answer_key_distribution(config: &SheetConfig, key: &AnswerMap) -> BTreeMap<OptionLetter, usize> {
    let mut distribution: BTreeMap<OptionLetter, usize> =
        config.valid_options().iter().map(|&l| (l, 0)).collect();
    for answer in key.values() {
        *distribution.entry(*answer).or_insert(0) += 1;
    }
    distribution
}

/// One point of the submission-order trend line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// 1-based position in submission order.
    pub submission: usize,
    pub name: String,
    pub percentage: u32,
}

/// Percentages in ascending submission order.
pub fn performance_trend(responses: &[StudentResponse]) -> Vec<TrendPoint> {
    let mut ordered: Vec<&StudentResponse> = responses.iter().collect();
    ordered.sort_by_key(|r| r.submitted_at);
    ordered
        .into_iter()
        .enumerate()
        .map(|(i, r)| TrendPoint {
            submission: i + 1,
            name: r.name.clone(),
            percentage: r.percentage,
        })
        .collect()
}

/// The best `TOP_PERFORMERS` responses by percentage; ties keep submission
/// order.
pub fn top_performers(responses: &[StudentResponse]) -> Vec<&StudentResponse> {
    let mut ordered: Vec<&StudentResponse> = responses.iter().collect();
    ordered.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    ordered.truncate(TOP_PERFORMERS);
    ordered
}

/// Class-level summary numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub average: u32,
    pub highest: u32,
    pub lowest: u32,
    /// Share of responses at or above the pass mark, in percent.
    pub pass_rate: u32,
    pub total_students: usize,
}

/// Average, extremes and pass rate. All zero with no responses.
pub fn summary_statistics(responses: &[StudentResponse]) -> SummaryStats {
    if responses.is_empty() {
        return SummaryStats::default();
    }

    let scores: Vec<u32> = responses.iter().map(|r| r.percentage).collect();
    let passed = scores.iter().filter(|&&s| s >= PASS_MARK).count();

    SummaryStats {
        average: round_mean(&scores),
        highest: scores.iter().copied().max().unwrap_or(0),
        lowest: scores.iter().copied().min().unwrap_or(0),
        pass_rate: round_percent(passed as u64, scores.len() as u64),
        total_students: scores.len(),
    }
}

/// Letter-grade counts: A ≥ 90, B ≥ 80, C ≥ 70, D ≥ 60, otherwise F.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeDistribution {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub d: usize,
    pub f: usize,
}

pub fn grade_distribution(responses: &[StudentResponse]) -> GradeDistribution {
    let mut grades = GradeDistribution::default();
    for r in responses {
        match r.percentage {
            90.. => grades.a += 1,
            80..=89 => grades.b += 1,
            70..=79 => grades.c += 1,
            60..=69 => grades.d += 1,
            _ => grades.f += 1,
        }
    }
    grades
}

/// Everything the analytics view shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub summary: SummaryStats,
    pub score_distribution: Vec<ScoreBand>,
    pub grades: GradeDistribution,
    pub questions: Vec<QuestionAnalysis>,
    pub answer_key_distribution: BTreeMap<OptionLetter, usize>,
    pub trend: Vec<TrendPoint>,
    /// Best responses, highest percentage first.
    pub top_performers: Vec<TopPerformer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopPerformer {
    pub name: String,
    pub roll_number: String,
    pub score: u32,
    pub percentage: u32,
}

impl Analytics {
    /// Up to five questions labelled Hard, in question order.
    pub fn hardest_questions(&self) -> Vec<&QuestionAnalysis> {
        self.by_difficulty(Difficulty::Hard)
    }

    /// Up to five questions labelled Easy, in question order.
    pub fn easiest_questions(&self) -> Vec<&QuestionAnalysis> {
        self.by_difficulty(Difficulty::Easy)
    }

    fn by_difficulty(&self, difficulty: Difficulty) -> Vec<&QuestionAnalysis> {
        self.questions
            .iter()
            .filter(|q| q.difficulty == difficulty)
            .take(DIFFICULTY_HIGHLIGHTS)
            .collect()
    }
}

/// Compute every statistic for the analytics view.
pub fn compute_analytics(
    config: &SheetConfig,
    key: &AnswerMap,
    responses: &[StudentResponse],
) -> Analytics {
    Analytics {
        summary: summary_statistics(responses),
        score_distribution: score_distribution(responses),
        grades: grade_distribution(responses),
        questions: question_analysis(config, key, responses),
        answer_key_distribution: answer_key_distribution(config, key),
        trend: performance_trend(responses),
        top_performers: top_performers(responses)
            .into_iter()
            .map(|r| TopPerformer {
                name: r.name.clone(),
                roll_number: r.roll_number.clone(),
                score: r.score,
                percentage: r.percentage,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OptionLetter::*;
    use chrono::{TimeZone, Utc};

    fn response(name: &str, percentage: u32, minute: u32, answers: AnswerMap) -> StudentResponse {
        StudentResponse {
            id: format!("{name}_{minute}"),
            name: name.into(),
            roll_number: format!("R{minute}"),
            responses: answers,
            score: 0,
            percentage,
            submitted_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, minute, 0).unwrap(),
        }
    }

    fn config(num_questions: u32, options_per_question: u8) -> SheetConfig {
        SheetConfig {
            num_questions,
            options_per_question,
            ..SheetConfig::default()
        }
    }

    #[test]
    fn empty_class_is_all_zero() {
        let stats = summary_statistics(&[]);
        assert_eq!(
            stats,
            SummaryStats {
                average: 0,
                highest: 0,
                lowest: 0,
                pass_rate: 0,
                total_students: 0,
            }
        );
    }

    #[test]
    fn summary_numbers() {
        let class = vec![
            response("a", 40, 1, AnswerMap::new()),
            response("b", 60, 2, AnswerMap::new()),
            response("c", 95, 3, AnswerMap::new()),
        ];
        let stats = summary_statistics(&class);
        assert_eq!(stats.average, 65);
        assert_eq!(stats.highest, 95);
        assert_eq!(stats.lowest, 40);
        assert_eq!(stats.pass_rate, 67);
        assert_eq!(stats.total_students, 3);
    }

    #[test]
    fn bands_are_inclusive() {
        let class: Vec<_> = [0, 20, 21, 40, 41, 60, 61, 80, 81, 100]
            .iter()
            .enumerate()
            .map(|(i, &p)| response("s", p, i as u32, AnswerMap::new()))
            .collect();
        let bands = score_distribution(&class);
        assert_eq!(bands.len(), 5);
        assert!(bands.iter().all(|b| b.count == 2));
        assert_eq!(bands[0].range, "0-20%");
        assert_eq!(bands[4].range, "81-100%");
    }

    #[test]
    fn question_difficulty_labels() {
        let key = AnswerMap::from([(1, A), (2, B), (3, C)]);
        let class = vec![
            response("a", 0, 1, AnswerMap::from([(1, A), (2, A)])),
            response("b", 0, 2, AnswerMap::from([(1, A), (2, B)])),
            response("c", 0, 3, AnswerMap::from([(1, A), (2, C)])),
            response("d", 0, 4, AnswerMap::from([(1, B), (2, D)])),
        ];
        let analysis = question_analysis(&config(3, 4), &key, &class);

        assert_eq!(analysis[0].correct, 3);
        assert_eq!(analysis[0].incorrect, 1);
        assert_eq!(analysis[0].difficulty, Difficulty::Easy); // 75%

        assert_eq!(analysis[1].correct, 1);
        assert_eq!(analysis[1].difficulty, Difficulty::Hard); // 25%
        assert_eq!(analysis[1].option_distribution[&D], 1);

        // Nobody answered question 3.
        assert_eq!(analysis[2].answered(), 0);
        assert_eq!(analysis[2].success_rate, 0.0);
        assert_eq!(analysis[2].difficulty, Difficulty::Easy);
    }

    #[test]
    fn answers_to_keyless_question_are_incorrect() {
        let key = AnswerMap::from([(1, A)]);
        let class = vec![response("a", 0, 1, AnswerMap::from([(2, B)]))];
        let analysis = question_analysis(&config(2, 4), &key, &class);
        assert_eq!(analysis[1].incorrect, 1);
        assert_eq!(analysis[1].difficulty, Difficulty::Hard);
    }

    #[test]
    fn difficulty_thresholds() {
        assert_eq!(Difficulty::from_rate(29.9), Difficulty::Hard);
        assert_eq!(Difficulty::from_rate(30.0), Difficulty::Medium);
        assert_eq!(Difficulty::from_rate(69.9), Difficulty::Medium);
        assert_eq!(Difficulty::from_rate(70.0), Difficulty::Easy);
    }

    #[test]
    fn key_distribution_lists_every_option() {
        let key = AnswerMap::from([(1, A), (2, A), (3, C)]);
        let dist = answer_key_distribution(&config(3, 5), &key);
        assert_eq!(dist.len(), 5);
        assert_eq!(dist[&A], 2);
        assert_eq!(dist[&B], 0);
        assert_eq!(dist[&C], 1);
    }

    #[test]
    fn trend_follows_submission_time() {
        let class = vec![
            response("late", 90, 30, AnswerMap::new()),
            response("early", 10, 5, AnswerMap::new()),
            response("middle", 50, 15, AnswerMap::new()),
        ];
        let trend = performance_trend(&class);
        let names: Vec<_> = trend.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["early", "middle", "late"]);
        assert_eq!(trend[0].submission, 1);
        assert_eq!(trend[2].percentage, 90);
    }

    #[test]
    fn top_five_in_descending_order() {
        let class: Vec<_> = [55, 90, 70, 90, 10, 85, 30]
            .iter()
            .enumerate()
            .map(|(i, &p)| response(&format!("s{i}"), p, i as u32, AnswerMap::new()))
            .collect();
        let top = top_performers(&class);
        let pcts: Vec<_> = top.iter().map(|r| r.percentage).collect();
        assert_eq!(pcts, vec![90, 90, 85, 70, 55]);
        // Stable: s1 was submitted before s3.
        assert_eq!(top[0].name, "s1");
        assert_eq!(top[1].name, "s3");
    }

    #[test]
    fn grade_buckets() {
        let class: Vec<_> = [95, 90, 85, 72, 60, 59, 0]
            .iter()
            .enumerate()
            .map(|(i, &p)| response("s", p, i as u32, AnswerMap::new()))
            .collect();
        let grades = grade_distribution(&class);
        assert_eq!(
            grades,
            GradeDistribution {
                a: 2,
                b: 1,
                c: 1,
                d: 1,
                f: 2
            }
        );
    }

    #[test]
    fn analytics_bundle() {
        let key = AnswerMap::from([(1, A), (2, B)]);
        let class = vec![
            response("a", 100, 1, AnswerMap::from([(1, A), (2, B)])),
            response("b", 0, 2, AnswerMap::from([(1, C), (2, C)])),
        ];
        let analytics = compute_analytics(&config(2, 4), &key, &class);
        assert_eq!(analytics.summary.total_students, 2);
        assert_eq!(analytics.questions.len(), 2);
        assert_eq!(analytics.top_performers[0].name, "a");
        assert!(analytics.hardest_questions().is_empty());
        assert!(analytics.easiest_questions().is_empty());
    }

    #[test]
    fn difficulty_lists_are_capped() {
        let key: AnswerMap = (1..=7).map(|q| (q, A)).collect();
        let wrong: AnswerMap = (1..=7).map(|q| (q, B)).collect();
        let class = vec![response("a", 0, 1, wrong)];
        let analytics = compute_analytics(&config(7, 4), &key, &class);

        let hardest: Vec<u32> = analytics
            .hardest_questions()
            .iter()
            .map(|q| q.question)
            .collect();
        assert_eq!(hardest.len(), DIFFICULTY_HIGHLIGHTS);
        assert_eq!(hardest, vec![1, 2, 3, 4, 5]);
    }
}
