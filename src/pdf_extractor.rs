/*!
 * Per-page text extraction from uploaded PDF files.
 *
 * Only the embedded text layer is read. Pages without one (typically scanned
 * images) come back as `PageContent::Empty` so the caller can warn about them
 * instead of failing the whole file.
 */

use log::{debug, warn};
use lopdf::Document;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ExtractionError;

static HORIZONTAL_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("valid regex"));
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Text content of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    /// Normalized text long enough to be worth translating
    Text(String),
    /// No usable text layer
    Empty,
}

impl PageContent {
    pub fn text(&self) -> Option<&str> {
        match self {
            PageContent::Text(text) => Some(text),
            PageContent::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PageContent::Empty)
    }
}

/// One page of an uploaded PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 0-based position in the document
    pub index: usize,
    pub content: PageContent,
}

impl Page {
    pub fn new(index: usize, content: PageContent) -> Self {
        Self { index, content }
    }

    /// 1-based number used in labels and messages
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// All pages of one successfully parsed upload
#[derive(Debug, Clone)]
pub struct ExtractedFile {
    pub file_name: String,
    pub pages: Vec<Page>,
}

impl ExtractedFile {
    pub fn new(file_name: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            file_name: file_name.into(),
            pages,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pages that will not be sent for translation
    pub fn empty_pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().filter(|p| p.content.is_empty())
    }
}

/// Collapse the whitespace noise PDF text layers tend to carry
pub fn normalize_whitespace(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = HORIZONTAL_SPACE.replace_all(&text, " ");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Extracts the text layer of PDFs page by page
#[derive(Debug, Clone)]
pub struct PdfTextExtractor {
    min_text_chars: usize,
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PdfTextExtractor {
    /// Create an extractor; pages with fewer than `min_text_chars` characters count as empty
    pub fn new(min_text_chars: usize) -> Self {
        Self {
            min_text_chars: min_text_chars.max(1),
        }
    }

    /// Extract every page of a PDF held in memory, in page order
    pub fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<Page>, ExtractionError> {
        let doc = Document::load_mem(pdf_bytes)
            .map_err(|e| ExtractionError::Malformed(e.to_string()))?;

        // BTreeMap keyed by 1-based page number, so iteration is in page order
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        if page_numbers.is_empty() {
            return Err(ExtractionError::NoPages);
        }

        let pages = page_numbers
            .iter()
            .enumerate()
            .map(|(index, &page_number)| {
                let raw = match doc.extract_text(&[page_number]) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Could not decode text on page {}: {}", page_number, e);
                        String::new()
                    }
                };
                Page::new(index, self.classify(&raw))
            })
            .collect::<Vec<_>>();

        debug!(
            "Extracted {} pages ({} without text)",
            pages.len(),
            pages.iter().filter(|p| p.content.is_empty()).count()
        );

        Ok(pages)
    }

    /// Extract an upload into an `ExtractedFile`
    pub fn extract_file(&self, file_name: &str, pdf_bytes: &[u8]) -> Result<ExtractedFile, ExtractionError> {
        Ok(ExtractedFile::new(file_name, self.extract_pages(pdf_bytes)?))
    }

    fn classify(&self, raw: &str) -> PageContent {
        let text = normalize_whitespace(raw);
        if text.chars().count() < self.min_text_chars {
            PageContent::Empty
        } else {
            PageContent::Text(text)
        }
    }
}
