//! omrsheet-report: HTML rendering for omrsheet.
//!
//! Sheets, answer keys, comparison and result tables, and the analytics
//! dashboard, all as self-contained HTML with inline CSS and SVG.

pub mod analytics;
pub mod html;
pub mod views;

pub use analytics::{generate_analytics_html, write_analytics_html};
pub use html::{print_document, render_answer_key, render_sheet, write_html};
pub use views::{print_view, render_view};
