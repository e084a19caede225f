//! Mock scanner for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use omrsheet_core::parser::parse_answer_text;
use omrsheet_core::traits::{ResponseScanner, ScanRequest, ScanResponse};

/// A scanner that returns canned transcriptions instead of reading images.
///
/// Transcriptions are looked up by the exact image bytes; unknown images get
/// the default transcription.
pub struct MockScanner {
    /// Image bytes → transcription.
    transcriptions: HashMap<Vec<u8>, String>,
    default_transcription: String,
    call_count: AtomicU32,
    last_request: Mutex<Option<ScanRequest>>,
}

impl MockScanner {
    pub fn new(transcriptions: HashMap<Vec<u8>, String>) -> Self {
        Self {
            transcriptions,
            default_transcription: String::new(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same transcription.
    pub fn with_transcription(text: &str) -> Self {
        Self {
            transcriptions: HashMap::new(),
            default_transcription: text.to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<ScanRequest> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or(None)
    }
}

#[async_trait]
impl ResponseScanner for MockScanner {
    fn name(&self) -> &str {
        "mock"
    }

    async fn scan(&self, request: &ScanRequest) -> anyhow::Result<ScanResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        let transcription = self
            .transcriptions
            .get(&request.image)
            .cloned()
            .unwrap_or_else(|| self.default_transcription.clone());
        let diagnostics = parse_answer_text(&transcription, &request.config);

        Ok(ScanResponse {
            answers: diagnostics.answers.clone(),
            diagnostics,
            transcription: Some(transcription),
            latency_ms: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omrsheet_core::model::SheetConfig;

    fn request(image: &[u8]) -> ScanRequest {
        ScanRequest {
            image: image.to_vec(),
            config: SheetConfig {
                num_questions: 5,
                ..SheetConfig::default()
            },
        }
    }

    #[tokio::test]
    async fn fixed_transcription() {
        let scanner = MockScanner::with_transcription("ABCDA");
        let response = scanner.scan(&request(b"img")).await.unwrap();
        assert_eq!(response.answers.len(), 5);
        assert_eq!(scanner.call_count(), 1);
        assert_eq!(scanner.last_request().unwrap().image, b"img".to_vec());
    }

    #[tokio::test]
    async fn lookup_by_image() {
        let mut transcriptions = HashMap::new();
        transcriptions.insert(b"sheet-1".to_vec(), "AAAAA".to_string());
        transcriptions.insert(b"sheet-2".to_vec(), "1,B".to_string());
        let scanner = MockScanner::new(transcriptions);

        let first = scanner.scan(&request(b"sheet-1")).await.unwrap();
        assert_eq!(first.answers.len(), 5);

        let second = scanner.scan(&request(b"sheet-2")).await.unwrap();
        assert_eq!(second.answers.len(), 1);
        assert_eq!(second.diagnostics.missing, vec![2, 3, 4, 5]);

        let unknown = scanner.scan(&request(b"blank")).await.unwrap();
        assert!(unknown.answers.is_empty());
        assert_eq!(scanner.call_count(), 3);
    }
}
