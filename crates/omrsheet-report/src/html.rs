//! Printable sheet renderer.
//!
//! Every function here is a pure function of its arguments and returns HTML
//! text. Fragments are wrapped into a self-contained document (all CSS
//! inlined) by [`print_document`].

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use omrsheet_core::model::{AnswerMap, SheetConfig, SheetFormat};

/// Questions per block in the grid layout.
pub const GRID_BLOCK: u32 = 10;

/// Timing marks on each side of the grid footer.
const TIMING_MARKS: usize = 10;

const INSTRUCTIONS: [&str; 5] = [
    "Use blue or black ball point pen only.",
    "Completely darken the bubble corresponding to your answer.",
    "Marking multiple bubbles for a question will invalidate the answer.",
    "Ensure your markings are dark and completely fill the bubble.",
    "Do not make any stray marks on the sheet.",
];

/// Escape a string for safe HTML insertion.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Render the sheet in the layout its configuration asks for.
pub fn render_sheet(config: &SheetConfig) -> String {
    match config.format {
        SheetFormat::Standard => render_standard_sheet(config),
        SheetFormat::Grid => render_grid_sheet(config),
    }
}

/// One numbered row of lettered bubbles per question.
pub fn render_standard_sheet(config: &SheetConfig) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"sheet standard\">\n");
    push_header(&mut html, config, None);
    push_student_fields(&mut html, config);
    push_instructions(&mut html, config);

    html.push_str("<section class=\"answers\">\n<h2>Answer Sheet</h2>\n");
    html.push_str("<div class=\"question-list\">\n");
    for question in 1..=config.num_questions {
        html.push_str(&format!(
            "<div class=\"question\"><span class=\"qnum\">{question}.</span>"
        ));
        for letter in config.valid_options() {
            html.push_str(&format!("<span class=\"bubble\">{letter}</span>"));
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n</section>\n</div>\n");
    html
}

/// Column-aligned grid with a machine-readable payload and timing marks.
pub fn render_grid_sheet(config: &SheetConfig) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"sheet grid\">\n");
    push_header(&mut html, config, Some(&grid_payload(config)));
    push_student_fields(&mut html, config);
    push_instructions(&mut html, config);

    html.push_str("<section class=\"answers\">\n<h2>Answer Grid</h2>\n");
    html.push_str("<table class=\"answer-grid\">\n<thead><tr><th>Q#</th>");
    for letter in config.valid_options() {
        html.push_str(&format!("<th>{letter}</th>"));
    }
    html.push_str("</tr></thead>\n");

    let blocks = config.num_questions.div_ceil(GRID_BLOCK);
    for block in 0..blocks {
        html.push_str("<tbody class=\"block\">\n");
        let first = block * GRID_BLOCK + 1;
        let last = (first + GRID_BLOCK - 1).min(config.num_questions);
        for question in first..=last {
            html.push_str(&format!("<tr><td class=\"qnum\">{question}</td>"));
            for _ in config.valid_options() {
                html.push_str("<td><span class=\"bubble empty\"></span></td>");
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n");
    }
    html.push_str("</table>\n</section>\n");

    let marks = "<span class=\"mark\"></span>".repeat(TIMING_MARKS);
    html.push_str(&format!(
        "<footer class=\"timing\"><span class=\"marks\">{marks}</span><span>Scan ID: {}</span><span class=\"marks\">{marks}</span></footer>\n",
        html_escape(&config.unique_id)
    ));
    html.push_str("</div>\n");
    html
}

/// JSON identifying a grid sheet to a scanner.
pub fn grid_payload(config: &SheetConfig) -> String {
    serde_json::json!({
        "id": config.unique_id,
        "title": config.title,
        "questions": config.num_questions,
        "options": config.options_per_question,
        "format": "grid",
    })
    .to_string()
}

/// The key as a printable table, with the generation date in the footer.
pub fn render_answer_key(config: &SheetConfig, key: &AnswerMap, generated: NaiveDate) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"sheet answer-key\">\n");
    html.push_str(&format!(
        "<header class=\"sheet-header\"><h1>{} - Answer Key</h1><p>Sheet ID: {}</p></header>\n",
        html_escape(&config.title),
        html_escape(&config.unique_id)
    ));

    html.push_str("<div class=\"key-grid\">\n");
    for question in 1..=config.num_questions {
        let answer = key
            .get(&question)
            .map_or_else(|| "-".to_string(), |l| l.to_string());
        let class = if key.contains_key(&question) {
            "key-cell"
        } else {
            "key-cell unanswered"
        };
        html.push_str(&format!(
            "<div class=\"{class}\"><span class=\"qnum\">{question}.</span><span class=\"answer\">{answer}</span></div>\n"
        ));
    }
    html.push_str("</div>\n");

    let answered = (1..=config.num_questions)
        .filter(|q| key.contains_key(q))
        .count();
    html.push_str(&format!(
        "<footer class=\"key-footer\"><span><strong>Total Questions:</strong> {}</span><span><strong>Answered:</strong> {answered}</span><span><strong>Generated:</strong> {}</span></footer>\n",
        config.num_questions,
        generated.format("%Y-%m-%d")
    ));
    html.push_str("</div>\n");
    html
}

/// Wrap a fragment in a printable document that opens the print dialog.
pub fn print_document(title: &str, body: &str) -> String {
    document(title, body, true)
}

pub(crate) fn document(title: &str, body: &str, print_on_load: bool) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");
    html.push_str(body);
    if print_on_load {
        html.push_str("<script>\nwindow.addEventListener('load', () => window.print());\n</script>\n");
    }
    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML document to a file.
pub fn write_html(html: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML to {}", path.display()))?;
    Ok(())
}

fn push_header(html: &mut String, config: &SheetConfig, payload: Option<&str>) {
    let format_note = match config.format {
        SheetFormat::Standard => "",
        SheetFormat::Grid => " | Grid Format",
    };
    html.push_str(&format!(
        "<header class=\"sheet-header\"><div><h1>{}</h1><p>Sheet ID: {}{format_note}</p></div>",
        html_escape(&config.title),
        html_escape(&config.unique_id)
    ));
    if let Some(payload) = payload {
        html.push_str(&format!(
            "<div class=\"payload\" data-omr=\"{}\"><code>{}</code></div>",
            html_escape(payload),
            html_escape(&config.unique_id)
        ));
    }
    html.push_str("</header>\n");
}

fn push_student_fields(html: &mut String, config: &SheetConfig) {
    if !config.show_name && !config.show_roll_number {
        return;
    }
    html.push_str("<section class=\"fields\">\n");
    if config.show_name {
        html.push_str("<div class=\"field\"><span>Name:</span><span class=\"line\"></span></div>\n");
    }
    if config.show_roll_number {
        html.push_str(
            "<div class=\"field\"><span>Roll No:</span><span class=\"line\"></span></div>\n",
        );
    }
    html.push_str("</section>\n");
}

fn push_instructions(html: &mut String, config: &SheetConfig) {
    if !config.show_instructions {
        return;
    }
    html.push_str("<section class=\"instructions\">\n<h2>Instructions:</h2>\n<ul>\n");
    for line in INSTRUCTIONS {
        html.push_str(&format!("<li>{line}</li>\n"));
    }
    html.push_str("</ul>\n</section>\n");
}

const CSS: &str = r#"
body { font-family: Arial, sans-serif; margin: 0; padding: 20px; color: #000; background: #fff; }
@media print {
  body { margin: 0; padding: 0; }
  .no-print { display: none; }
  .sheet { page-break-after: always; }
}
.sheet { border: 2px solid #000; padding: 24px; margin-bottom: 24px; }
.sheet-header { display: flex; justify-content: space-between; align-items: flex-start; border-bottom: 2px solid #000; padding-bottom: 12px; }
.sheet-header h1 { font-size: 1.5rem; margin: 0; }
.sheet-header p { font-size: 0.85rem; margin: 4px 0 0; }
.payload code { font-size: 0.7rem; border: 1px solid #000; padding: 4px; }
.fields { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; padding: 12px 0; border-bottom: 1px solid #000; }
.field { display: flex; align-items: center; }
.field span:first-child { font-weight: bold; min-width: 80px; }
.field .line { flex: 1; border-bottom: 1px solid #000; height: 1.2em; }
.instructions { padding: 12px 0; border-bottom: 1px solid #000; font-size: 0.85rem; }
.instructions ul { list-style-type: disc; padding-left: 20px; }
.answers h2 { text-align: center; }
.question-list { display: grid; grid-template-columns: repeat(3, 1fr); gap: 4px 32px; }
.question { display: flex; align-items: center; }
.qnum { font-weight: 500; width: 28px; text-align: right; margin-right: 8px; }
.bubble { display: inline-flex; width: 22px; height: 22px; border: 1px solid #000; border-radius: 50%; align-items: center; justify-content: center; font-size: 0.75rem; margin-right: 10px; }
.bubble.empty { border-width: 2px; }
.answer-grid { border-collapse: collapse; margin: 0 auto; }
.answer-grid th, .answer-grid td { text-align: center; padding: 2px 6px; }
.answer-grid tbody.block::after { content: ""; display: block; height: 16px; }
.timing { display: flex; justify-content: space-between; align-items: center; border-top: 2px solid #000; padding-top: 8px; font-size: 0.75rem; }
.mark { display: inline-block; width: 8px; height: 8px; border-radius: 50%; background: #000; margin-right: 4px; }
.key-grid { display: grid; grid-template-columns: repeat(5, 1fr); gap: 6px; padding: 12px 0; }
.key-cell { display: flex; border: 1px solid #ccc; padding: 4px 8px; }
.key-cell .answer { font-weight: bold; }
.key-cell.unanswered .answer { color: #999; }
.key-footer { display: flex; justify-content: space-between; border-top: 1px solid #000; padding-top: 8px; font-size: 0.85rem; }
table.data { border-collapse: collapse; width: 100%; margin: 1rem 0; }
table.data th, table.data td { border: 1px solid #e5e7eb; padding: 0.4rem 0.8rem; text-align: left; }
table.data th { background: #f3f4f6; }
.match { background: #dcfce7; }
.mismatch { background: #fde2e2; }
.incomplete { background: #f9fafb; color: #6b7280; }
.cards { display: grid; grid-template-columns: repeat(4, 1fr); gap: 12px; }
.card { border: 1px solid #e5e7eb; border-radius: 8px; padding: 12px; }
.card .value { font-size: 1.6rem; font-weight: bold; }
.easy { color: #15803d; }
.medium { color: #a16207; }
.hard { color: #b91c1c; }
pre { overflow-x: auto; padding: 1rem; background: #f3f4f6; border-radius: 8px; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;
