//! Printable rendering of any session view.

use chrono::NaiveDate;

use omrsheet_core::compare::{ComparisonReport, MatchStatus};
use omrsheet_core::model::{OptionLetter, SheetConfig};
use omrsheet_core::session::{Session, View};

use crate::analytics::render_analytics;
use crate::html::{html_escape, print_document, render_answer_key, render_sheet};

/// Body fragment for one view of the session.
pub fn render_view(session: &Session, view: View, date: NaiveDate) -> String {
    let config = session.config();
    match view {
        View::Sheet => render_sheet(config),
        View::AnswerKey => render_answer_key(config, session.answer_key(), date),
        View::Comparison => render_comparison(config, &session.compare()),
        View::Results => render_results(session),
        View::Analytics => render_analytics(&session.analytics_report()),
    }
}

/// Full printable document for one view of the session.
pub fn print_view(session: &Session, view: View, date: NaiveDate) -> String {
    let title = format!("{} - {view}", session.config().title);
    print_document(&title, &render_view(session, view, date))
}

fn render_comparison(config: &SheetConfig, report: &ComparisonReport) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"sheet comparison\">\n");
    html.push_str(&format!(
        "<header class=\"sheet-header\"><h1>{} - Answer Key Comparison</h1><p>Sheet ID: {}</p></header>\n",
        html_escape(&config.title),
        html_escape(&config.unique_id)
    ));
    html.push_str(&format!(
        "<p class=\"meta\">Primary: {} | Secondary: {} | Mismatches: {} | Accuracy: {}%</p>\n",
        report.primary_count,
        report.secondary_count,
        report.mismatches.len(),
        report.accuracy
    ));

    html.push_str("<table class=\"data\">\n<thead><tr><th>Question</th><th>Primary</th><th>Secondary</th><th>Status</th></tr></thead>\n<tbody>\n");
    for row in &report.rows {
        let class = match row.status {
            MatchStatus::Match => "match",
            MatchStatus::Mismatch => "mismatch",
            MatchStatus::Incomplete => "incomplete",
        };
        html.push_str(&format!(
            "<tr class=\"{class}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            row.question,
            letter_or_dash(row.primary),
            letter_or_dash(row.secondary),
            row.status
        ));
    }
    html.push_str("</tbody></table>\n</div>\n");
    html
}

fn letter_or_dash(letter: Option<OptionLetter>) -> String {
    letter.map_or_else(|| "-".to_string(), |l| l.to_string())
}

fn render_results(session: &Session) -> String {
    let config = session.config();
    let mut html = String::new();
    html.push_str("<div class=\"sheet results\">\n");
    html.push_str(&format!(
        "<header class=\"sheet-header\"><h1>{} - Student Results</h1><p>Sheet ID: {}</p></header>\n",
        html_escape(&config.title),
        html_escape(&config.unique_id)
    ));

    if session.responses().is_empty() {
        html.push_str("<p class=\"empty\">No student responses recorded yet.</p>\n</div>\n");
        return html;
    }

    html.push_str("<table class=\"data\">\n<thead><tr><th>Name</th><th>Roll Number</th><th>Score</th><th>Percentage</th><th>Submitted</th></tr></thead>\n<tbody>\n");
    for r in session.responses() {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}/{}</td><td>{}%</td><td>{}</td></tr>\n",
            html_escape(&r.name),
            html_escape(&r.roll_number),
            r.score,
            config.num_questions,
            r.percentage,
            r.submitted_at.format("%Y-%m-%d %H:%M:%S")
        ));
    }
    html.push_str("</tbody></table>\n</div>\n");
    html
}
