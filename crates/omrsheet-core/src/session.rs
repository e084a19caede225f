//! In-memory grading session.
//!
//! A [`Session`] owns the sheet configuration, the primary and secondary
//! answer keys and the list of recorded responses. Every mutating call
//! either succeeds completely or returns an error and leaves the session as
//! it was.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::compare::{compare_answer_keys, ComparisonReport};
use crate::error::OmrError;
use crate::export;
use crate::model::{new_sheet_id, AnswerMap, OptionLetter, SheetConfig, SheetFormat, StudentResponse};
use crate::parser::{parse_answer_text, ParseOutcome};
use crate::patterns::AnswerPattern;
use crate::report::AnalyticsReport;
use crate::scoring::{round_percent, score_responses};
use crate::statistics::{compute_analytics, Analytics};

/// The screens a session can be rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    Sheet,
    AnswerKey,
    Comparison,
    Results,
    Analytics,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Sheet,
        View::AnswerKey,
        View::Comparison,
        View::Results,
        View::Analytics,
    ];
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Sheet => write!(f, "sheet"),
            View::AnswerKey => write!(f, "answer-key"),
            View::Comparison => write!(f, "comparison"),
            View::Results => write!(f, "results"),
            View::Analytics => write!(f, "analytics"),
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sheet" | "generator" => Ok(View::Sheet),
            "answer-key" | "key" => Ok(View::AnswerKey),
            "comparison" | "compare" => Ok(View::Comparison),
            "results" | "responses" => Ok(View::Results),
            "analytics" => Ok(View::Analytics),
            other => Err(format!("unknown view: {other}")),
        }
    }
}

/// Configuration, keys and responses for one grading session.
#[derive(Debug, Clone)]
pub struct Session {
    config: SheetConfig,
    answer_key: AnswerMap,
    secondary_key: AnswerMap,
    responses: Vec<StudentResponse>,
    view: View,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            config: SheetConfig::default(),
            answer_key: AnswerMap::new(),
            secondary_key: AnswerMap::new(),
            responses: Vec::new(),
            view: View::default(),
        }
    }
}

impl Session {
    /// Start a session for an already-built configuration.
    pub fn new(config: SheetConfig) -> Result<Self, OmrError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn answer_key(&self) -> &AnswerMap {
        &self.answer_key
    }

    pub fn secondary_key(&self) -> &AnswerMap {
        &self.secondary_key
    }

    pub fn responses(&self) -> &[StudentResponse] {
        &self.responses
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        tracing::debug!(from = %self.view, to = %view, "switching view");
        self.view = view;
    }

    // --- configuration -------------------------------------------------

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.config.title = title.into();
    }

    pub fn set_format(&mut self, format: SheetFormat) {
        self.config.format = format;
    }

    pub fn set_display_toggles(&mut self, name: bool, roll_number: bool, instructions: bool) {
        self.config.show_name = name;
        self.config.show_roll_number = roll_number;
        self.config.show_instructions = instructions;
    }

    /// Assign a fresh sheet identifier.
    pub fn regenerate_id(&mut self) {
        self.config.unique_id = new_sheet_id();
    }

    /// Change the question count, dropping key entries past the new end.
    pub fn set_num_questions(&mut self, num_questions: u32) -> Result<(), OmrError> {
        let candidate = SheetConfig {
            num_questions,
            ..self.config.clone()
        };
        candidate.validate()?;
        self.config = candidate;
        self.prune_keys();
        Ok(())
    }

    /// Change the option count, dropping key entries that use removed letters.
    pub fn set_options_per_question(&mut self, options_per_question: u8) -> Result<(), OmrError> {
        let candidate = SheetConfig {
            options_per_question,
            ..self.config.clone()
        };
        candidate.validate()?;
        self.config = candidate;
        self.prune_keys();
        Ok(())
    }

    fn prune_keys(&mut self) {
        let config = &self.config;
        let keep = |question: &u32, letter: &mut OptionLetter| {
            config.contains_question(*question) && config.allows(*letter)
        };

        let before = self.answer_key.len() + self.secondary_key.len();
        self.answer_key.retain(keep);
        self.secondary_key.retain(keep);
        let removed = before - self.answer_key.len() - self.secondary_key.len();

        if removed > 0 {
            tracing::warn!(removed, "pruned answer key entries outside the sheet");
        }
    }

    // --- primary answer key -------------------------------------------

    /// Set a single answer in the primary key.
    pub fn set_answer(&mut self, question: u32, letter: OptionLetter) -> Result<(), OmrError> {
        self.check_answer(question, letter)?;
        self.answer_key.insert(question, letter);
        Ok(())
    }

    /// Remove one answer from the primary key, returning it.
    pub fn clear_answer(&mut self, question: u32) -> Option<OptionLetter> {
        self.answer_key.remove(&question)
    }

    pub fn clear_answers(&mut self) {
        self.answer_key.clear();
    }

    /// Replace the primary key with a generated pattern.
    pub fn apply_pattern<R: Rng>(&mut self, pattern: AnswerPattern, rng: &mut R) {
        self.answer_key = pattern.generate(
            self.config.num_questions,
            self.config.options_per_question,
            rng,
        );
        tracing::debug!(%pattern, answers = self.answer_key.len(), "applied answer pattern");
    }

    /// Parse text against the current sheet without touching any state.
    pub fn preview_import(&self, text: &str) -> ParseOutcome {
        parse_answer_text(text, &self.config)
    }

    /// Merge imported answers into the primary key.
    ///
    /// Questions present in the import overwrite existing entries; others are
    /// kept. Fails without changes when nothing was accepted.
    pub fn import_answer_key(&mut self, text: &str) -> Result<ParseOutcome, OmrError> {
        let outcome = self.preview_import(text);
        if !outcome.has_answers() {
            return Err(OmrError::NoValidAnswers);
        }
        self.answer_key
            .extend(outcome.answers.iter().map(|(&q, &l)| (q, l)));
        tracing::debug!(
            imported = outcome.answers.len(),
            total = self.answer_key.len(),
            "imported answer key"
        );
        Ok(outcome)
    }

    /// Answered questions as a whole percentage of the sheet.
    pub fn completion(&self) -> u32 {
        round_percent(
            self.answer_key.len() as u64,
            u64::from(self.config.num_questions),
        )
    }

    fn check_answer(&self, question: u32, letter: OptionLetter) -> Result<(), OmrError> {
        if !self.config.contains_question(question) {
            return Err(OmrError::QuestionOutOfRange {
                question,
                num_questions: self.config.num_questions,
            });
        }
        if !self.config.allows(letter) {
            return Err(OmrError::OptionNotAllowed {
                letter,
                options_per_question: self.config.options_per_question,
            });
        }
        Ok(())
    }

    // --- secondary key and comparison -----------------------------------

    /// Replace the secondary key with imported answers.
    pub fn import_secondary_key(&mut self, text: &str) -> Result<ParseOutcome, OmrError> {
        let outcome = self.preview_import(text);
        if !outcome.has_answers() {
            return Err(OmrError::NoValidAnswers);
        }
        self.secondary_key = outcome.answers.clone();
        Ok(outcome)
    }

    pub fn copy_primary_to_secondary(&mut self) {
        self.secondary_key = self.answer_key.clone();
    }

    pub fn clear_secondary(&mut self) {
        self.secondary_key.clear();
    }

    pub fn compare(&self) -> ComparisonReport {
        compare_answer_keys(
            &self.answer_key,
            &self.secondary_key,
            self.config.num_questions,
        )
    }

    // --- responses ------------------------------------------------------

    /// Score and record a submission stamped with the current time.
    pub fn submit_response(
        &mut self,
        name: &str,
        roll_number: &str,
        responses: AnswerMap,
    ) -> Result<&StudentResponse, OmrError> {
        self.submit_response_at(name, roll_number, responses, Utc::now())
    }

    /// Score and record a submission with an explicit timestamp.
    pub fn submit_response_at(
        &mut self,
        name: &str,
        roll_number: &str,
        responses: AnswerMap,
        submitted_at: DateTime<Utc>,
    ) -> Result<&StudentResponse, OmrError> {
        let name = name.trim();
        let roll_number = roll_number.trim();
        if name.is_empty() {
            return Err(OmrError::MissingField("name"));
        }
        if roll_number.is_empty() {
            return Err(OmrError::MissingField("roll number"));
        }
        if responses.is_empty() {
            return Err(OmrError::EmptyResponses);
        }
        for (&question, &letter) in &responses {
            self.check_answer(question, letter)?;
        }

        let scored = score_responses(&responses, &self.answer_key, self.config.num_questions);
        let response = StudentResponse {
            id: format!("{roll_number}_{}", submitted_at.timestamp_millis()),
            name: name.to_string(),
            roll_number: roll_number.to_string(),
            responses,
            score: scored.score,
            percentage: scored.percentage,
            submitted_at,
        };
        tracing::debug!(
            id = %response.id,
            score = response.score,
            percentage = response.percentage,
            "recorded response"
        );

        self.responses.push(response);
        let index = self.responses.len() - 1;
        Ok(&self.responses[index])
    }

    /// Parse response text and submit it.
    pub fn submit_response_text(
        &mut self,
        name: &str,
        roll_number: &str,
        text: &str,
        submitted_at: Option<DateTime<Utc>>,
    ) -> Result<&StudentResponse, OmrError> {
        let outcome = self.preview_import(text);
        if !outcome.has_answers() {
            return Err(OmrError::NoValidAnswers);
        }
        let at = submitted_at.unwrap_or_else(Utc::now);
        self.submit_response_at(name, roll_number, outcome.answers, at)
    }

    // --- derived views --------------------------------------------------

    pub fn analytics(&self) -> Analytics {
        compute_analytics(&self.config, &self.answer_key, &self.responses)
    }

    pub fn analytics_report(&self) -> AnalyticsReport {
        AnalyticsReport::build(&self.config, &self.answer_key, &self.responses)
    }

    // --- exports --------------------------------------------------------

    /// `(file name, contents)` of the primary key export.
    pub fn export_answer_key(&self) -> Result<(String, String), OmrError> {
        if self.answer_key.is_empty() {
            return Err(OmrError::EmptyAnswerKey);
        }
        Ok((
            export::answer_key_file_name(&self.config.title),
            export::answer_key_csv(&self.answer_key),
        ))
    }

    pub fn export_comparison(&self) -> (String, String) {
        (
            export::comparison_file_name(&self.config.unique_id),
            export::comparison_csv(&self.compare()),
        )
    }

    pub fn export_results(&self) -> Result<(String, String), OmrError> {
        if self.responses.is_empty() {
            return Err(OmrError::EmptyResponses);
        }
        Ok((
            export::results_file_name(&self.config.unique_id),
            export::results_csv(&self.responses),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OptionLetter::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(num_questions: u32, options_per_question: u8) -> Session {
        Session::new(SheetConfig {
            title: "Unit Quiz".into(),
            num_questions,
            options_per_question,
            unique_id: "AB12CD34".into(),
            ..SheetConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = SheetConfig {
            options_per_question: 1,
            ..SheetConfig::default()
        };
        assert_eq!(
            Session::new(config).unwrap_err(),
            OmrError::InvalidOptionCount(1)
        );
    }

    #[test]
    fn set_answer_validates() {
        let mut s = session(5, 3);
        s.set_answer(2, C).unwrap();
        assert_eq!(
            s.set_answer(6, A),
            Err(OmrError::QuestionOutOfRange {
                question: 6,
                num_questions: 5
            })
        );
        assert_eq!(
            s.set_answer(1, D),
            Err(OmrError::OptionNotAllowed {
                letter: D,
                options_per_question: 3
            })
        );
        assert_eq!(s.answer_key(), &AnswerMap::from([(2, C)]));
    }

    #[test]
    fn shrinking_options_prunes_key_but_not_responses() {
        let mut s = session(4, 5);
        s.import_answer_key("AEDB").unwrap();
        s.copy_primary_to_secondary();
        s.submit_response("Ada", "R1", AnswerMap::from([(2, E)]))
            .unwrap();

        s.set_options_per_question(3).unwrap();

        assert_eq!(s.answer_key(), &AnswerMap::from([(1, A), (4, B)]));
        assert_eq!(s.secondary_key(), s.answer_key());
        assert_eq!(s.responses()[0].responses[&2], E);
    }

    #[test]
    fn shrinking_questions_prunes_key() {
        let mut s = session(5, 4);
        s.import_answer_key("ABCDA").unwrap();
        s.set_num_questions(3).unwrap();
        assert_eq!(s.answer_key().len(), 3);
        assert_eq!(s.completion(), 100);
    }

    #[test]
    fn invalid_config_change_leaves_state() {
        let mut s = session(5, 4);
        s.import_answer_key("ABCDA").unwrap();
        assert_eq!(s.set_num_questions(0), Err(OmrError::InvalidQuestionCount(0)));
        assert_eq!(s.config().num_questions, 5);
        assert_eq!(s.answer_key().len(), 5);
    }

    #[test]
    fn import_merges_into_existing_key() {
        let mut s = session(4, 4);
        s.set_answer(4, D).unwrap();
        let outcome = s.import_answer_key("1,A\n2,B").unwrap();
        assert_eq!(outcome.missing, vec![3, 4]);
        assert_eq!(s.answer_key(), &AnswerMap::from([(1, A), (2, B), (4, D)]));
        assert_eq!(s.completion(), 75);
    }

    #[test]
    fn import_with_nothing_valid_is_atomic() {
        let mut s = session(3, 4);
        s.set_answer(1, B).unwrap();
        assert_eq!(s.import_answer_key("XYZ"), Err(OmrError::NoValidAnswers));
        assert_eq!(s.import_answer_key(""), Err(OmrError::NoValidAnswers));
        assert_eq!(s.answer_key(), &AnswerMap::from([(1, B)]));
    }

    #[test]
    fn preview_does_not_mutate() {
        let s = session(3, 4);
        let outcome = s.preview_import("ABC");
        assert_eq!(outcome.answers.len(), 3);
        assert!(s.answer_key().is_empty());
    }

    #[test]
    fn apply_pattern_fills_key() {
        let mut s = session(6, 4);
        s.apply_pattern(AnswerPattern::Sequential, &mut StdRng::seed_from_u64(3));
        let letters: String = s.answer_key().values().map(|l| l.as_char()).collect();
        assert_eq!(letters, "ABCDAB");
        s.clear_answers();
        assert_eq!(s.completion(), 0);
    }

    #[test]
    fn secondary_key_replaces_and_compares() {
        let mut s = session(3, 4);
        s.import_answer_key("1,A\n2,B\n3,C").unwrap();
        s.import_secondary_key("1,A\n2,C").unwrap();
        s.import_secondary_key("1,A\n2,C\n3,C").unwrap();

        let report = s.compare();
        assert_eq!(report.mismatches.len(), 1);
        assert_eq!(report.accuracy, 67);

        s.clear_secondary();
        assert_eq!(s.compare().accuracy, 0);
    }

    #[test]
    fn submit_scores_against_key() {
        let mut s = session(3, 4);
        s.import_answer_key("ABC").unwrap();
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        let recorded = s
            .submit_response_at("  Ada ", " R7 ", AnswerMap::from([(1, A), (2, B), (3, D)]), at)
            .unwrap();

        assert_eq!(recorded.name, "Ada");
        assert_eq!(recorded.score, 2);
        assert_eq!(recorded.percentage, 67);
        assert_eq!(recorded.id, format!("R7_{}", at.timestamp_millis()));
    }

    #[test]
    fn submit_requires_fields() {
        let mut s = session(3, 4);
        let answers = AnswerMap::from([(1, A)]);
        assert_eq!(
            s.submit_response(" ", "R1", answers.clone()).unwrap_err(),
            OmrError::MissingField("name")
        );
        assert_eq!(
            s.submit_response("Ada", "", answers).unwrap_err(),
            OmrError::MissingField("roll number")
        );
        assert_eq!(
            s.submit_response("Ada", "R1", AnswerMap::new()).unwrap_err(),
            OmrError::EmptyResponses
        );
        assert!(s.responses().is_empty());
    }

    #[test]
    fn submit_rejects_answers_outside_the_sheet() {
        let mut s = session(3, 2);
        s.import_answer_key("AB").unwrap();

        assert_eq!(
            s.submit_response("Ann", "R1", AnswerMap::from([(1, E)]))
                .unwrap_err(),
            OmrError::OptionNotAllowed {
                letter: E,
                options_per_question: 2
            }
        );
        assert_eq!(
            s.submit_response("Ann", "R1", AnswerMap::from([(1, A), (99, B)]))
                .unwrap_err(),
            OmrError::QuestionOutOfRange {
                question: 99,
                num_questions: 3
            }
        );
        assert!(s.responses().is_empty());

        let letters: Vec<_> = s.analytics().questions[0]
            .option_distribution
            .keys()
            .copied()
            .collect();
        assert_eq!(letters, vec![A, B]);
    }

    #[test]
    fn submit_text_parses_first() {
        let mut s = session(4, 4);
        s.import_answer_key("ABCD").unwrap();
        let recorded = s.submit_response_text("Ada", "R1", "A B C C", None).unwrap();
        assert_eq!(recorded.score, 3);
        assert_eq!(
            s.submit_response_text("Ada", "R1", "???", None).unwrap_err(),
            OmrError::NoValidAnswers
        );
    }

    #[test]
    fn exports_need_content() {
        let mut s = session(2, 4);
        assert_eq!(s.export_answer_key(), Err(OmrError::EmptyAnswerKey));
        assert_eq!(s.export_results(), Err(OmrError::EmptyResponses));

        s.import_answer_key("AB").unwrap();
        let (name, csv) = s.export_answer_key().unwrap();
        assert_eq!(name, "Unit_Quiz_answers.csv");
        assert_eq!(csv, "Question,Answer\n1,A\n2,B\n");

        let (name, _) = s.export_comparison();
        assert_eq!(name, "answer_key_comparison_AB12CD34.csv");
    }

    #[test]
    fn view_names() {
        for view in View::ALL {
            assert_eq!(view.to_string().parse::<View>().unwrap(), view);
        }
        assert_eq!("key".parse::<View>().unwrap(), View::AnswerKey);
        assert!("dashboard".parse::<View>().is_err());
    }
}
