//! Analytics dashboard renderer.
//!
//! Produces a self-contained HTML page with inline SVG charts.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use omrsheet_core::model::OptionLetter;
use omrsheet_core::report::AnalyticsReport;
use omrsheet_core::statistics::{Analytics, Difficulty, QuestionAnalysis, TrendPoint};

use crate::html::{document, html_escape, write_html};

/// Generate a standalone analytics page.
pub fn generate_analytics_html(report: &AnalyticsReport) -> String {
    let title = format!("{} analytics", report.sheet.title);
    document(&title, &render_analytics(report), false)
}

/// Write an analytics page to a file.
pub fn write_analytics_html(report: &AnalyticsReport, path: &Path) -> Result<()> {
    write_html(&generate_analytics_html(report), path)
}

/// Analytics body fragment.
pub fn render_analytics(report: &AnalyticsReport) -> String {
    let a = &report.analytics;
    let mut html = String::new();

    html.push_str("<header>\n");
    html.push_str(&format!(
        "<h1>{} - Analytics</h1>\n",
        html_escape(&report.sheet.title)
    ));
    html.push_str(&format!(
        "<p class=\"meta\">Sheet ID: <strong>{}</strong> | {} questions | {} answered in key | {}</p>\n",
        html_escape(&report.sheet.id),
        report.sheet.num_questions,
        report.answer_key_size,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    if a.summary.total_students == 0 {
        html.push_str("<p class=\"empty\">No student responses recorded yet.</p>\n");
        return html;
    }

    push_summary(&mut html, a);

    html.push_str("<section>\n<h2>Score Distribution</h2>\n");
    let bands: Vec<(String, usize)> = a
        .score_distribution
        .iter()
        .map(|b| (b.range.clone(), b.count))
        .collect();
    html.push_str(&bar_chart(&bands, "#3b82f6"));
    html.push_str("</section>\n");

    html.push_str("<section>\n<h2>Grades</h2>\n<table class=\"data\">\n");
    html.push_str("<thead><tr><th>A (90+)</th><th>B (80-89)</th><th>C (70-79)</th><th>D (60-69)</th><th>F</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr></tbody>\n",
        a.grades.a, a.grades.b, a.grades.c, a.grades.d, a.grades.f
    ));
    html.push_str("</table>\n</section>\n");

    html.push_str("<section>\n<h2>Performance Trend</h2>\n");
    html.push_str(&trend_chart(&a.trend));
    html.push_str("</section>\n");

    push_top_performers(&mut html, a);
    push_question_lists(&mut html, a);

    html.push_str("<section>\n<h2>Answer Key Distribution</h2>\n");
    html.push_str(&bar_chart(&letter_counts(&a.answer_key_distribution), "#8b5cf6"));
    html.push_str("</section>\n");

    push_question_table(&mut html, &a.questions);

    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html
}

fn push_summary(html: &mut String, a: &Analytics) {
    let s = &a.summary;
    html.push_str("<section class=\"cards\">\n");
    for (label, value) in [
        ("Students", s.total_students.to_string()),
        ("Average", format!("{}%", s.average)),
        ("Highest / Lowest", format!("{}% / {}%", s.highest, s.lowest)),
        ("Pass Rate", format!("{}%", s.pass_rate)),
    ] {
        html.push_str(&format!(
            "<div class=\"card\"><div class=\"label\">{label}</div><div class=\"value\">{value}</div></div>\n"
        ));
    }
    html.push_str("</section>\n");
}

fn push_top_performers(html: &mut String, a: &Analytics) {
    html.push_str("<section>\n<h2>Top Performers</h2>\n<table class=\"data\">\n");
    html.push_str("<thead><tr><th>#</th><th>Name</th><th>Roll Number</th><th>Score</th><th>Percentage</th></tr></thead>\n<tbody>\n");
    for (rank, p) in a.top_performers.iter().enumerate() {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}%</td></tr>\n",
            rank + 1,
            html_escape(&p.name),
            html_escape(&p.roll_number),
            p.score,
            p.percentage
        ));
    }
    html.push_str("</tbody></table>\n</section>\n");
}

fn push_question_lists(html: &mut String, a: &Analytics) {
    let list = |title: &str, questions: Vec<&QuestionAnalysis>| {
        let mut out = format!("<div><h3>{title}</h3>\n<ul>\n");
        if questions.is_empty() {
            out.push_str("<li>None</li>\n");
        }
        for q in questions {
            out.push_str(&format!(
                "<li>Q{}: {:.0}% correct</li>\n",
                q.question, q.success_rate
            ));
        }
        out.push_str("</ul></div>\n");
        out
    };

    html.push_str("<section class=\"question-lists\">\n");
    html.push_str(&list("Hardest Questions", a.hardest_questions()));
    html.push_str(&list("Easiest Questions", a.easiest_questions()));
    html.push_str("</section>\n");
}

fn push_question_table(html: &mut String, questions: &[QuestionAnalysis]) {
    html.push_str("<section>\n<h2>Question Analysis</h2>\n<table class=\"data\">\n");
    html.push_str("<thead><tr><th>Question</th><th>Correct</th><th>Incorrect</th><th>Success</th><th>Difficulty</th><th>Options</th></tr></thead>\n<tbody>\n");
    for q in questions {
        let class = match q.difficulty {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        let options = q
            .option_distribution
            .iter()
            .map(|(letter, count)| format!("{letter}: {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        html.push_str(&format!(
            "<tr><td>Q{}</td><td>{}</td><td>{}</td><td>{:.1}%</td><td class=\"{class}\">{}</td><td>{options}</td></tr>\n",
            q.question, q.correct, q.incorrect, q.success_rate, q.difficulty
        ));
    }
    html.push_str("</tbody></table>\n</section>\n");
}

fn letter_counts(distribution: &BTreeMap<OptionLetter, usize>) -> Vec<(String, usize)> {
    distribution
        .iter()
        .map(|(letter, count)| (letter.to_string(), *count))
        .collect()
}

/// Horizontal bar chart, bars scaled to the largest count.
fn bar_chart(bars: &[(String, usize)], color: &str) -> String {
    let bar_height = 24;
    let max_width = 400;
    let padding = 8;
    let label_width = 90;

    let max = bars.iter().map(|(_, n)| *n).max().unwrap_or(0).max(1);
    let total_height = bars.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (label, count)) in bars.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = count * max_width / max;

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"13\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(label)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{label_width}\" y=\"{y}\" width=\"{width}\" height=\"{bar_height}\" fill=\"{color}\" rx=\"4\"/>\n"
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{count}</text>\n",
            label_width + width + 8,
            y + bar_height / 2
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Line of percentages in submission order.
fn trend_chart(points: &[TrendPoint]) -> String {
    let width = 600usize;
    let height = 200usize;
    let pad = 30usize;

    let step = if points.len() > 1 {
        (width - 2 * pad) / (points.len() - 1)
    } else {
        0
    };
    let coords: Vec<(usize, usize)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = pad + i * step;
            let y = height - pad - (p.percentage.min(100) as usize) * (height - 2 * pad) / 100;
            (x, y)
        })
        .collect();

    let mut svg = format!(
        "<svg width=\"{width}\" height=\"{height}\" xmlns=\"http://www.w3.org/2000/svg\">\n"
    );
    svg.push_str(&format!(
        "  <line x1=\"{pad}\" y1=\"{0}\" x2=\"{1}\" y2=\"{0}\" stroke=\"#9ca3af\"/>\n",
        height - pad,
        width - pad
    ));
    let polyline = coords
        .iter()
        .map(|(x, y)| format!("{x},{y}"))
        .collect::<Vec<_>>()
        .join(" ");
    svg.push_str(&format!(
        "  <polyline points=\"{polyline}\" fill=\"none\" stroke=\"#10b981\" stroke-width=\"2\"/>\n"
    ));
    for ((x, y), p) in coords.iter().zip(points) {
        svg.push_str(&format!(
            "  <circle cx=\"{x}\" cy=\"{y}\" r=\"4\" fill=\"#10b981\"><title>#{} {}: {}%</title></circle>\n",
            p.submission,
            html_escape(&p.name),
            p.percentage
        ));
    }
    svg.push_str("</svg>\n");
    svg
}
