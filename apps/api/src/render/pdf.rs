//! HTML to PDF rasterization.
//!
//! `ChromiumEngine` runs one headless browser process per request. The process is spawned
//! with `kill_on_drop`, so a timeout, an error or a dropped request future all tear it down.
//! The scratch directory (markup, output and browser profile) is removed when the
//! `TempDir` guard drops.

use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to launch '{bin}': {source}")]
    Launch { bin: String, source: io::Error },

    #[error("rendering timed out after {0:?}")]
    Timeout(Duration),

    #[error("browser exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("browser output is not a PDF: {0}")]
    InvalidOutput(String),
}

#[async_trait]
pub trait PdfEngine: Send + Sync {
    /// Rasterizes a complete HTML document. Page size and margins come from its `@page` rule.
    async fn html_to_pdf(&self, html: &str) -> Result<Bytes, PdfError>;
}

pub struct ChromiumEngine {
    bin: String,
    timeout: Duration,
}

impl ChromiumEngine {
    pub fn new(bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            bin: bin.into(),
            timeout,
        }
    }

    fn command(&self, dir: &Path) -> Command {
        let input = dir.join("resume.html");
        let output = dir.join("resume.pdf");

        let mut cmd = Command::new(&self.bin);
        cmd.arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--no-first-run")
            .arg("--disable-extensions")
            .arg("--no-pdf-header-footer")
            .arg("--print-to-pdf-no-header")
            .arg(format!("--user-data-dir={}", dir.join("profile").display()))
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(format!("file://{}", input.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl PdfEngine for ChromiumEngine {
    async fn html_to_pdf(&self, html: &str) -> Result<Bytes, PdfError> {
        let dir = tempfile::tempdir()?;
        tokio::fs::write(dir.path().join("resume.html"), html).await?;

        let child = self.command(dir.path()).spawn().map_err(|source| PdfError::Launch {
            bin: self.bin.clone(),
            source,
        })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                warn!("{} did not finish within {:?}", self.bin, self.timeout);
                PdfError::Timeout(self.timeout)
            })??;

        if !output.status.success() {
            return Err(PdfError::Exit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let pdf = match tokio::fs::read(dir.path().join("resume.pdf")).await {
            Ok(pdf) => pdf,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PdfError::InvalidOutput("no file was written".to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        if !pdf.starts_with(b"%PDF") {
            return Err(PdfError::InvalidOutput(format!("{} bytes without a PDF header", pdf.len())));
        }

        debug!("Rendered {} byte PDF", pdf.len());
        Ok(Bytes::from(pdf))
    }
}
