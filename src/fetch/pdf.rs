//! PDF text extraction through poppler-utils
//!
//! Bytes are written to a scratch file, `pdfinfo` reports the page count and
//! `pdftotext` is run once per page. Both tools run as async child processes.

use crate::fetch::PdfTextExtractor;
use crate::ExtractionError;
use async_trait::async_trait;
use std::future::Future;
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::process::Command;

/// Extractor backed by the `pdfinfo` and `pdftotext` binaries
#[derive(Debug, Clone, Default)]
pub struct PopplerExtractor;

impl PopplerExtractor {
    pub fn new() -> Self {
        Self
    }

    async fn page_count(&self, file_path: &Path) -> Result<u32, ExtractionError> {
        let output = Command::new("pdfinfo").arg(file_path).output().await;
        let stdout = handle_cmd_output(output, "pdfinfo (install poppler-utils)", "pdfinfo failed")?;
        Ok(parse_page_count(&stdout).unwrap_or(1))
    }

    async fn page_text(&self, file_path: &Path, page: u32) -> Result<String, ExtractionError> {
        let page_str = page.to_string();
        let output = Command::new("pdftotext")
            .args(["-layout", "-enc", "UTF-8", "-f", &page_str, "-l", &page_str])
            .arg(file_path)
            .arg("-")
            .output()
            .await;

        handle_cmd_output(
            output,
            "pdftotext (install poppler-utils)",
            &format!("pdftotext failed on page {}", page),
        )
    }
}

#[async_trait]
impl PdfTextExtractor for PopplerExtractor {
    async fn extract(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        if bytes.is_empty() {
            return Err(ExtractionError::Corrupt("empty document".to_string()));
        }

        let scratch = NamedTempFile::new()?;
        tokio::fs::write(scratch.path(), bytes).await?;

        let pages = self.page_count(scratch.path()).await?;
        tracing::debug!("Extracting text from {} PDF pages", pages);

        collect_page_texts(pages, |page| self.page_text(scratch.path(), page)).await
    }
}

/// Reads pages `1..=pages` in order
///
/// A page that cannot be read contributes an empty string. Only a password
/// or a missing tool fails the whole document.
async fn collect_page_texts<F, Fut>(pages: u32, mut read_page: F) -> Result<Vec<String>, ExtractionError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<String, ExtractionError>>,
{
    let mut texts = Vec::with_capacity(pages as usize);
    for page in 1..=pages {
        match read_page(page).await {
            Ok(text) => texts.push(text),
            Err(e @ (ExtractionError::PasswordProtected | ExtractionError::ToolUnavailable(_))) => {
                return Err(e)
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable PDF page {}: {}", page, e);
                texts.push(String::new());
            }
        }
    }
    Ok(texts)
}

/// Reads the `Pages:` line of `pdfinfo` output
fn parse_page_count(pdfinfo_output: &str) -> Option<u32> {
    pdfinfo_output
        .lines()
        .find(|line| line.starts_with("Pages:"))
        .and_then(|line| line.split(':').nth(1))
        .and_then(|count| count.trim().parse::<u32>().ok())
}

/// Maps a finished child process onto extracted text or an extraction error
fn handle_cmd_output(
    result: std::io::Result<std::process::Output>,
    tool_name: &str,
    error_prefix: &str,
) -> Result<String, ExtractionError> {
    match result {
        Ok(output) if output.status.success() => {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.to_lowercase().contains("incorrect password") {
                Err(ExtractionError::PasswordProtected)
            } else {
                Err(ExtractionError::Corrupt(format!(
                    "{}: {}",
                    error_prefix,
                    stderr.trim()
                )))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ExtractionError::ToolUnavailable(tool_name.to_string()))
        }
        Err(e) => Err(ExtractionError::Io(e)),
    }
}
