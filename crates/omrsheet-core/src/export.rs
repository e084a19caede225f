//! CSV exports.
//!
//! Values are comma-joined with one record per line. Nothing is quoted or
//! escaped, so embedded commas in names pass through unchanged.

use crate::compare::{ComparisonReport, MatchStatus};
use crate::model::{AnswerMap, StudentResponse};

/// Header of the answer key export.
pub const ANSWER_KEY_HEADER: &str = "Question,Answer";
/// Header of the comparison export.
pub const COMPARISON_HEADER: &str = "Question,Primary Answer,Secondary Answer,Match";
/// Header of the results export.
pub const RESULTS_HEADER: &str = "Name,Roll Number,Score,Percentage,Timestamp";

/// `Question,Answer` rows in question order.
pub fn answer_key_csv(key: &AnswerMap) -> String {
    let mut csv = format!("{ANSWER_KEY_HEADER}\n");
    for (question, answer) in key {
        csv.push_str(&format!("{question},{answer}\n"));
    }
    csv
}

/// One row per question; `-` stands in for an absent answer.
pub fn comparison_csv(report: &ComparisonReport) -> String {
    let mut csv = format!("{COMPARISON_HEADER}\n");
    for row in &report.rows {
        let primary = row.primary.map_or_else(|| "-".to_string(), |l| l.to_string());
        let secondary = row
            .secondary
            .map_or_else(|| "-".to_string(), |l| l.to_string());
        let matched = if row.status == MatchStatus::Match {
            "Yes"
        } else {
            "No"
        };
        csv.push_str(&format!(
            "{},{primary},{secondary},{matched}\n",
            row.question
        ));
    }
    csv
}

/// One row per recorded response, in submission order.
pub fn results_csv(responses: &[StudentResponse]) -> String {
    let mut csv = format!("{RESULTS_HEADER}\n");
    for r in responses {
        csv.push_str(&format!(
            "{},{},{},{}%,{}\n",
            r.name,
            r.roll_number,
            r.score,
            r.percentage,
            r.submitted_at.format("%Y-%m-%d %H:%M:%S")
        ));
    }
    csv
}

/// `"Unit 3 Quiz"` → `"Unit_3_Quiz_answers.csv"`.
pub fn answer_key_file_name(title: &str) -> String {
    let stem = title.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{stem}_answers.csv")
}

pub fn comparison_file_name(sheet_id: &str) -> String {
    format!("answer_key_comparison_{sheet_id}.csv")
}

pub fn results_file_name(sheet_id: &str) -> String {
    format!("student_results_{sheet_id}.csv")
}
