//! Harvest file writer
//!
//! Each harvested page becomes one `.txt` file named after its URL path.
//! Web pages land in the output folder, PDFs and other documents in its
//! `documents/` subfolder.

use crate::fetch::PageResult;
use crate::PersistError;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use url::Url;

/// Subfolder for PDF and office document records
pub const DOCUMENTS_DIR: &str = "documents";

/// Separator line between record sections
pub const SEPARATOR_WIDTH: usize = 60;

/// Patterns listed in the `DETECTED PATTERNS:` section
pub const LISTED_PATTERNS: usize = 10;

const UNSAFE_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*', '%'];

/// Writes harvest records under an output folder
#[derive(Debug, Clone)]
pub struct Persister {
    output_dir: PathBuf,
    documents_dir: PathBuf,
}

impl Persister {
    /// Creates the output folder and its `documents/` subfolder
    ///
    /// # Errors
    ///
    /// Returns `PersistError::WriteFailure` if either folder cannot be created.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let output_dir = output_dir.into();
        let documents_dir = output_dir.join(DOCUMENTS_DIR);

        std::fs::create_dir_all(&documents_dir).map_err(|source| PersistError::WriteFailure {
            path: documents_dir.clone(),
            source,
        })?;

        Ok(Self {
            output_dir,
            documents_dir,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    /// Where the record for `page` is written
    pub fn path_for(&self, page: &PageResult) -> PathBuf {
        let dir = if page.kind().is_document() {
            &self.documents_dir
        } else {
            &self.output_dir
        };
        dir.join(safe_filename(page.url()))
    }

    /// Writes a financial record for `page`
    ///
    /// # Arguments
    ///
    /// * `page` - The fetched page
    /// * `patterns` - Every matched pattern; the count covers all of them,
    ///   the listing shows the first ten
    ///
    /// # Returns
    ///
    /// The written path, or `None` if the write failed. Failures are logged.
    pub fn save_financial(&self, page: &PageResult, patterns: &[String]) -> Option<PathBuf> {
        let body = format_financial_record(page, patterns, &timestamp());
        let path = self.path_for(page);

        match write_record(&path, &body) {
            Ok(()) => {
                tracing::info!(
                    "Saved financial content: {} ({} financial indicators)",
                    display_name(&path),
                    patterns.len()
                );
                Some(path)
            }
            Err(e) => {
                tracing::error!("{}", e);
                None
            }
        }
    }

    /// Writes a plain record for `page`, financial or not
    pub fn save_page(&self, page: &PageResult) -> Option<PathBuf> {
        let body = format_page_record(page, &timestamp());
        let path = self.path_for(page);

        match write_record(&path, &body) {
            Ok(()) => {
                tracing::info!("Saved content: {}", display_name(&path));
                Some(path)
            }
            Err(e) => {
                tracing::error!("{}", e);
                None
            }
        }
    }
}

fn write_record(path: &Path, body: &str) -> Result<(), PersistError> {
    std::fs::write(path, body).map_err(|source| PersistError::WriteFailure {
        path: path.to_path_buf(),
        source,
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// Renders the financial record format
///
/// ```text
/// URL: <url>
/// TITLE: <title>
/// TYPE: WEBPAGE | PDF | DOCUMENT
/// SCRAPED: <YYYY-mm-dd HH:MM:SS>
/// FINANCIAL PATTERNS FOUND: <n>
/// ------------------------------------------------------------
/// DETECTED PATTERNS:
/// <first ten patterns, comma-joined>
///
/// ------------------------------------------------------------
/// CONTENT:
///
/// <content>
/// ```
pub fn format_financial_record(page: &PageResult, patterns: &[String], scraped: &str) -> String {
    let listed = &patterns[..patterns.len().min(LISTED_PATTERNS)];
    format!(
        "URL: {}\nTITLE: {}\nTYPE: {}\nSCRAPED: {}\nFINANCIAL PATTERNS FOUND: {}\n{sep}\nDETECTED PATTERNS:\n{}\n\n{sep}\nCONTENT:\n\n{}\n",
        page.url(),
        page.title(),
        page.kind().label(),
        scraped,
        patterns.len(),
        listed.join(", "),
        page.content(),
        sep = separator(),
    )
}

/// Renders the plain record format: header, separator, blank line, content
pub fn format_page_record(page: &PageResult, scraped: &str) -> String {
    format!(
        "URL: {}\nTITLE: {}\nTYPE: {}\nSCRAPED: {}\n{}\n\n{}\n",
        page.url(),
        page.title(),
        page.kind().label(),
        scraped,
        separator(),
        page.content(),
    )
}

/// Derives a stable `.txt` filename from a URL
///
/// The URL path has its slashes turned into underscores. A bare domain
/// uses the host (and port) instead. Unsafe characters become underscores,
/// runs of underscores collapse, and edges are trimmed. If nothing usable
/// is left, a hash-derived `page_<n>` name is used.
///
/// # Examples
///
/// ```
/// use finharvest::output::safe_filename;
///
/// assert_eq!(safe_filename("https://x.gov/tax/rates/2024"), "tax_rates_2024.txt");
/// assert_eq!(safe_filename("https://x.gov/"), "x_gov.txt");
/// ```
pub fn safe_filename(url: &str) -> String {
    let stem = match Url::parse(url) {
        Ok(parsed) => {
            let path = parsed.path().trim_matches('/').replace('/', "_");
            if path.is_empty() || path == "_" {
                netloc(&parsed).replace('.', "_")
            } else {
                path
            }
        }
        Err(_) => String::new(),
    };

    let cleaned = clean_stem(&stem);
    if cleaned.is_empty() {
        format!("page_{}.txt", url_hash(url) % 10_000)
    } else {
        format!("{}.txt", cleaned)
    }
}

fn netloc(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

fn clean_stem(stem: &str) -> String {
    let replaced: String = stem
        .chars()
        .map(|c| if UNSAFE_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect();

    let mut collapsed = String::with_capacity(replaced.len());
    for c in replaced.chars() {
        if c == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(c);
    }

    collapsed.trim_matches('_').to_string()
}

fn url_hash(url: &str) -> u64 {
    let digest = Sha256::digest(url.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::PdfExtraction;
    use tempfile::TempDir;

    fn web_page(url: &str) -> PageResult {
        PageResult::WebPage {
            url: url.to_string(),
            title: "Tax Rates".to_string(),
            content: "The tax rate 7 applies.".to_string(),
            links: vec![],
        }
    }

    fn pdf_page(url: &str) -> PageResult {
        PageResult::Pdf {
            url: url.to_string(),
            title: "PDF Document - fees.pdf".to_string(),
            content: "\n--- PAGE 1 ---\nfee of $10\n".to_string(),
            file_size: 100,
            extraction: PdfExtraction::Text { pages: 1 },
        }
    }

    #[test]
    fn test_filename_from_path() {
        assert_eq!(safe_filename("https://x.gov/tax/rates/2024"), "tax_rates_2024.txt");
    }

    #[test]
    fn test_filename_from_domain() {
        assert_eq!(safe_filename("https://x.gov/"), "x_gov.txt");
        assert_eq!(safe_filename("https://x.gov"), "x_gov.txt");
    }

    #[test]
    fn test_filename_with_port() {
        assert_eq!(safe_filename("http://127.0.0.1:8080/"), "127_0_0_1_8080.txt");
    }

    #[test]
    fn test_filename_unsafe_chars() {
        assert_eq!(
            safe_filename("https://x.gov/fees%20and%20rates/list"),
            "fees_20and_20rates_list.txt"
        );
        assert_eq!(safe_filename("https://x.gov//tax///forms/"), "tax_forms.txt");
    }

    #[test]
    fn test_filename_keeps_extension_in_stem() {
        assert_eq!(safe_filename("https://x.gov/docs/fees.pdf"), "docs_fees.pdf.txt");
    }

    #[test]
    fn test_filename_hash_fallback() {
        let name = safe_filename("not a url");
        assert!(name.starts_with("page_"));
        assert!(name.ends_with(".txt"));
        assert_eq!(name, safe_filename("not a url"));
    }

    #[test]
    fn test_financial_record_format() {
        let patterns: Vec<String> = (1..=12).map(|i| format!("{}%", i)).collect();
        let record = format_financial_record(
            &web_page("https://x.gov/tax"),
            &patterns,
            "2024-01-15 10:30:00",
        );

        let sep = "-".repeat(60);
        let expected = format!(
            "URL: https://x.gov/tax\nTITLE: Tax Rates\nTYPE: WEBPAGE\nSCRAPED: 2024-01-15 10:30:00\nFINANCIAL PATTERNS FOUND: 12\n{sep}\nDETECTED PATTERNS:\n1%, 2%, 3%, 4%, 5%, 6%, 7%, 8%, 9%, 10%\n\n{sep}\nCONTENT:\n\nThe tax rate 7 applies.\n"
        );
        assert_eq!(record, expected);
    }

    #[test]
    fn test_page_record_format() {
        let record = format_page_record(&pdf_page("https://x.gov/fees.pdf"), "2024-01-15 10:30:00");
        assert!(record.starts_with(
            "URL: https://x.gov/fees.pdf\nTITLE: PDF Document - fees.pdf\nTYPE: PDF\nSCRAPED: 2024-01-15 10:30:00\n"
        ));
        assert!(record.contains(&format!("{}\n\n\n--- PAGE 1 ---", "-".repeat(60))));
    }

    #[test]
    fn test_save_financial_web_page_in_output_dir() {
        let dir = TempDir::new().unwrap();
        let persister = Persister::new(dir.path()).unwrap();

        let path = persister
            .save_financial(&web_page("https://x.gov/tax/rates"), &["tax rate 7".to_string()])
            .unwrap();

        assert_eq!(path, dir.path().join("tax_rates.txt"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("FINANCIAL PATTERNS FOUND: 1\n"));
    }

    #[test]
    fn test_save_document_in_documents_dir() {
        let dir = TempDir::new().unwrap();
        let persister = Persister::new(dir.path()).unwrap();

        let path = persister
            .save_financial(&pdf_page("https://x.gov/fees.pdf"), &["fee of $10".to_string()])
            .unwrap();

        assert_eq!(path, dir.path().join("documents").join("fees.pdf.txt"));
        assert!(path.exists());
    }

    #[test]
    fn test_save_page_writes_plain_record() {
        let dir = TempDir::new().unwrap();
        let persister = Persister::new(dir.path()).unwrap();

        let path = persister.save_page(&web_page("https://x.gov/parks")).unwrap();
        let written = std::fs::read_to_string(path).unwrap();

        assert!(written.starts_with("URL: https://x.gov/parks\n"));
        assert!(!written.contains("DETECTED PATTERNS"));
    }

    #[test]
    fn test_write_failure_returns_none() {
        let dir = TempDir::new().unwrap();
        let persister = Persister::new(dir.path()).unwrap();
        std::fs::remove_dir_all(persister.documents_dir()).unwrap();

        let path = persister.save_financial(&pdf_page("https://x.gov/fees.pdf"), &["$10".to_string()]);
        assert!(path.is_none());
    }

    #[test]
    fn test_new_creates_documents_dir() {
        let dir = TempDir::new().unwrap();
        let persister = Persister::new(dir.path().join("harvest")).unwrap();
        assert!(persister.documents_dir().is_dir());
        assert!(persister.output_dir().is_dir());
    }
}
