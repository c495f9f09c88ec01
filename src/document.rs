/*!
 * Output document model and Word (.docx) rendering.
 *
 * The model keeps one section per uploaded file and one block per page, in
 * upload and page order. Rendering turns it into headings and plain
 * paragraphs; no other formatting is applied.
 */

use std::io::Cursor;

use docx_rs::{BreakType, Docx, Paragraph, Run, RunFonts, Style, StyleType};
use log::debug;

use crate::app_config::DocumentConfig;
use crate::errors::AppError;

/// MIME type of the generated file
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Shown in place of pages without a text layer
pub const NO_TEXT_PLACEHOLDER: &str = "[No selectable text detected on this page.]";

/// Follows `NO_TEXT_PLACEHOLDER`
pub const NO_TEXT_HINT: &str =
    "If this PDF page is a scanned image, you'll need Hebrew OCR added to the app.";

const HEADING_1: &str = "Heading1";
const HEADING_2: &str = "Heading2";

/// Result of translating one page that had text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedPage {
    /// 0-based index of the source page
    pub page_index: usize,
    pub text: String,
}

/// What a page contributes to the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBody {
    Translated(String),
    /// The page had no extractable text and was not translated
    NoText,
    /// Translation failed; carries the reason shown to the reader
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBlock {
    pub page_index: usize,
    pub body: PageBody,
}

impl PageBlock {
    pub fn new(page_index: usize, body: PageBody) -> Self {
        Self { page_index, body }
    }

    /// Heading shown above the page ("Page 1" for index 0)
    pub fn label(&self) -> String {
        format!("Page {}", self.page_index + 1)
    }

    /// Body paragraphs in reading order, blanks removed
    pub fn paragraphs(&self) -> Vec<String> {
        match &self.body {
            PageBody::Translated(text) => text
                .split("\n\n")
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
            PageBody::NoText => vec![NO_TEXT_PLACEHOLDER.to_string(), NO_TEXT_HINT.to_string()],
            PageBody::Failed(reason) => vec![format!("[Translation failed for this page: {}]", reason)],
        }
    }
}

impl From<TranslatedPage> for PageBlock {
    fn from(page: TranslatedPage) -> Self {
        PageBlock::new(page.page_index, PageBody::Translated(page.text))
    }
}

/// All pages of one uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSection {
    pub file_name: String,
    pub pages: Vec<PageBlock>,
}

impl DocumentSection {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            pages: Vec::new(),
        }
    }

    pub fn push_page(&mut self, block: PageBlock) {
        self.pages.push(block);
    }
}

/// The document assembled during one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputDocument {
    pub sections: Vec<DocumentSection>,
}

impl OutputDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_section(&mut self, section: DocumentSection) {
        self.sections.push(section);
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.sections.iter().map(|s| s.pages.len()).sum()
    }
}

/// Renders an `OutputDocument` as a Word file
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    font_name: String,
    font_size_pt: usize,
}

impl DocumentAssembler {
    pub fn new(config: &DocumentConfig) -> Self {
        Self {
            font_name: config.font_name.clone(),
            font_size_pt: config.font_size_pt,
        }
    }

    /// Build the in-memory docx tree
    pub fn to_docx(&self, document: &OutputDocument) -> Docx {
        let fonts = RunFonts::new()
            .ascii(&self.font_name)
            .hi_ansi(&self.font_name)
            .cs(&self.font_name);

        // docx sizes are in half-points
        let mut docx = Docx::new()
            .default_fonts(fonts)
            .default_size(self.font_size_pt * 2)
            .add_style(
                Style::new(HEADING_1, StyleType::Paragraph)
                    .name("Heading 1")
                    .size(32)
                    .bold(),
            )
            .add_style(
                Style::new(HEADING_2, StyleType::Paragraph)
                    .name("Heading 2")
                    .size(26)
                    .bold(),
            );

        for section in &document.sections {
            docx = docx.add_paragraph(heading(&section.file_name, HEADING_1));

            for page in &section.pages {
                docx = docx.add_paragraph(heading(&page.label(), HEADING_2));
                for text in page.paragraphs() {
                    docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)));
                }
            }

            docx = docx.add_paragraph(
                Paragraph::new().add_run(Run::new().add_break(BreakType::Page)),
            );
        }

        docx
    }

    /// Serialize the document to .docx bytes
    pub fn render(&self, document: &OutputDocument) -> Result<Vec<u8>, AppError> {
        let mut buffer = Cursor::new(Vec::new());
        self.to_docx(document)
            .build()
            .pack(&mut buffer)
            .map_err(|e| AppError::Document(e.to_string()))?;

        let bytes = buffer.into_inner();
        debug!(
            "Rendered {} sections / {} pages into {} bytes",
            document.sections.len(),
            document.page_count(),
            bytes.len()
        );
        Ok(bytes)
    }
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::new(&DocumentConfig::default())
    }
}

fn heading(text: &str, style: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(text))
        .style(style)
}

/// Make sure a user-supplied name ends up as a safe `.docx` file name
pub fn sanitize_output_name(name: &str, fallback: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').trim().to_string();

    if cleaned.is_empty() {
        return fallback.to_string();
    }
    if cleaned.to_lowercase().ends_with(".docx") {
        cleaned
    } else {
        format!("{}.docx", cleaned)
    }
}
