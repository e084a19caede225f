//! Scanner backed by an external recognition program.
//!
//! The sheet image is written to the program's stdin. Whatever it prints on
//! stdout is treated as answer text and parsed against the sheet.

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use omrsheet_core::parser::parse_answer_text;
use omrsheet_core::traits::{ResponseScanner, ScanRequest, ScanResponse};

use crate::error::ScannerError;

/// Runs a recognition command once per sheet.
#[derive(Debug, Clone)]
pub struct CommandScanner {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandScanner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the program and return its stdout.
    async fn transcribe(&self, image: &[u8]) -> Result<String, ScannerError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ScannerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let image = image.to_vec();
            tokio::spawn(async move {
                // Programs that ignore stdin may close it early.
                if let Err(e) = stdin.write_all(&image).await {
                    tracing::debug!("scanner stdin closed early: {e}");
                }
            });
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ScannerError::Timeout(self.timeout))?
            .map_err(|source| ScannerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ScannerError::NonZeroExit {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl ResponseScanner for CommandScanner {
    fn name(&self) -> &str {
        "command"
    }

    async fn scan(&self, request: &ScanRequest) -> anyhow::Result<ScanResponse> {
        let start = Instant::now();
        tracing::debug!(
            program = %self.program,
            bytes = request.image.len(),
            "running scanner"
        );

        let transcription = self.transcribe(&request.image).await?;
        let diagnostics = parse_answer_text(&transcription, &request.config);
        let latency_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            answers = diagnostics.answers.len(),
            latency_ms,
            "scanner finished"
        );

        Ok(ScanResponse {
            answers: diagnostics.answers.clone(),
            diagnostics,
            transcription: Some(transcription),
            latency_ms,
        })
    }
}
