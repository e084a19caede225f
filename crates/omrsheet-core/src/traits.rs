//! Trait definition for OCR backends.
//!
//! Recognition itself lives outside this workspace. A scanner takes the bytes
//! of a photographed or scanned sheet and returns the marks it found; the
//! `omrsheet-scanner` crate provides implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{AnswerMap, SheetConfig};
use crate::parser::ParseOutcome;

/// Trait for backends that read marked bubbles off a sheet image.
#[async_trait]
pub trait ResponseScanner: Send + Sync {
    /// Human-readable backend name (e.g. "command").
    fn name(&self) -> &str;

    /// Read the marks on one sheet image.
    async fn scan(&self, request: &ScanRequest) -> anyhow::Result<ScanResponse>;
}

/// A single sheet image to recognise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Raw image bytes (PNG, JPEG, PDF page, ...).
    pub image: Vec<u8>,
    /// Sheet the image was printed from.
    pub config: SheetConfig,
}

/// What a scanner found on a sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    /// Marks accepted for this sheet's option range.
    pub answers: AnswerMap,
    /// Full parse diagnostics for the backend's transcription.
    pub diagnostics: ParseOutcome,
    /// Backend's textual transcription, when it produces one.
    #[serde(default)]
    pub transcription: Option<String>,
    /// Wall-clock time spent in the backend.
    pub latency_ms: u64,
}
