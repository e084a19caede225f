//! Analytics report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{AnswerMap, SheetConfig, SheetFormat, StudentResponse};
use crate::statistics::{compute_analytics, Analytics};

/// A complete analytics snapshot for one grading run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Sheet the responses were graded against.
    pub sheet: SheetSummary,
    /// Number of questions that have an answer in the key.
    pub answer_key_size: usize,
    pub analytics: Analytics,
}

/// Summary of a sheet (without its display toggles).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSummary {
    pub id: String,
    pub title: String,
    pub num_questions: u32,
    pub options_per_question: u8,
    pub format: SheetFormat,
}

impl From<&SheetConfig> for SheetSummary {
    fn from(config: &SheetConfig) -> Self {
        Self {
            id: config.unique_id.clone(),
            title: config.title.clone(),
            num_questions: config.num_questions,
            options_per_question: config.options_per_question,
            format: config.format,
        }
    }
}

impl AnalyticsReport {
    /// Compute analytics and wrap them in a fresh report.
    pub fn build(config: &SheetConfig, key: &AnswerMap, responses: &[StudentResponse]) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            sheet: SheetSummary::from(config),
            answer_key_size: key.len(),
            analytics: compute_analytics(config, key, responses),
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AnalyticsReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the headline numbers as markdown.
    pub fn to_markdown(&self) -> String {
        let s = &self.analytics.summary;
        let mut md = format!("## {} ({})\n\n", self.sheet.title, self.sheet.id);

        md.push_str(&format!(
            "**Summary:** {} students, average {}%, highest {}%, lowest {}%, pass rate {}%\n\n",
            s.total_students, s.average, s.highest, s.lowest, s.pass_rate
        ));

        md.push_str("| Range | Students |\n|-------|----------|\n");
        for band in &self.analytics.score_distribution {
            md.push_str(&format!("| {} | {} |\n", band.range, band.count));
        }
        md.push('\n');

        let hardest = self.analytics.hardest_questions();
        if !hardest.is_empty() {
            md.push_str("### Hardest questions\n\n");
            for q in hardest {
                md.push_str(&format!("- Q{}: {:.0}% correct\n", q.question, q.success_rate));
            }
            md.push('\n');
        }

        md
    }
}
