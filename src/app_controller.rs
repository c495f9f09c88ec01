use anyhow::Result;
use bytes::Bytes;
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::document::{
    sanitize_output_name, DocumentAssembler, DocumentSection, OutputDocument, PageBlock, PageBody,
    TranslatedPage,
};
use crate::errors::{AppError, TranslationError};
use crate::file_utils::FileManager;
use crate::pdf_extractor::{ExtractedFile, PageContent, PdfTextExtractor};
use crate::translation::{TranslationOptions, Translator};

// @module: Application controller for the upload → translate → Word pipeline

/// One uploaded PDF
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content: Bytes,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

/// Everything the user submitted for one run
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub files: Vec<UploadedFile>,
    pub options: TranslationOptions,
    /// Desired download name; the configured default is used when absent
    pub output_name: Option<String>,
}

/// Severity of a status message shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl StatusLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLevel::Success => "success",
            StatusLevel::Info => "info",
            StatusLevel::Warning => "warning",
            StatusLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub message: String,
}

/// Human-readable account of a run, in the order things happened
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub messages: Vec<StatusMessage>,
    pub files_processed: usize,
    pub files_failed: usize,
    pub pages_translated: usize,
    pub pages_without_text: usize,
    pub pages_failed: usize,
}

impl RunReport {
    fn push(&mut self, level: StatusLevel, message: String) {
        match level {
            StatusLevel::Error => error!("{}", message),
            StatusLevel::Warning => warn!("{}", message),
            StatusLevel::Info | StatusLevel::Success => info!("{}", message),
        }
        self.messages.push(StatusMessage { level, message });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(StatusLevel::Success, message.into());
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(StatusLevel::Info, message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(StatusLevel::Warning, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(StatusLevel::Error, message.into());
    }

    /// Messages of one level
    pub fn with_level(&self, level: StatusLevel) -> impl Iterator<Item = &StatusMessage> {
        self.messages.iter().filter(move |m| m.level == level)
    }

    pub fn has_errors(&self) -> bool {
        self.with_level(StatusLevel::Error).next().is_some()
    }
}

/// The finished Word document of a run
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub document: OutputDocument,
}

/// What a run produced
#[derive(Debug)]
pub struct RunOutcome {
    pub report: RunReport,
    /// Present unless the run ended early
    pub document: Option<PreparedDocument>,
    /// The reason the run ended early, if it did
    pub fatal: Option<AppError>,
}

impl RunOutcome {
    fn aborted(report: RunReport, fatal: AppError) -> Self {
        Self {
            report,
            document: None,
            fatal: Some(fatal),
        }
    }

    pub fn is_success(&self) -> bool {
        self.document.is_some()
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Page translator, shared with the web state
    translator: Arc<dyn Translator>,
    extractor: PdfTextExtractor,
    assembler: DocumentAssembler,
}

impl Controller {
    // @method: Create a new controller with the given configuration and translator
    pub fn with_translator(config: Config, translator: Arc<dyn Translator>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            extractor: PdfTextExtractor::new(config.extraction.min_text_chars),
            assembler: DocumentAssembler::new(&config.document),
            translator,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Default options for runs that do not choose their own
    pub fn default_options(&self) -> TranslationOptions {
        TranslationOptions::from_config(&self.config)
    }

    /// Read local PDF files and run them as one batch
    pub async fn run_paths<F>(&self, paths: &[PathBuf], options: TranslationOptions, output_name: Option<String>, progress: F) -> Result<RunOutcome>
    where
        F: FnMut(usize, usize) + Send,
    {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let name = path
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            files.push(UploadedFile::new(name, FileManager::read_bytes(path)?));
        }

        let request = RunRequest {
            files,
            options,
            output_name,
        };
        Ok(self.run(request, progress).await)
    }

    /// Run the whole pipeline for one batch of uploads.
    ///
    /// Files and pages are handled strictly in order, one page at a time.
    /// `progress` receives `(pages_done, pages_total)` after each page.
    pub async fn run<F>(&self, request: RunRequest, progress: F) -> RunOutcome
    where
        F: FnMut(usize, usize) + Send,
    {
        let start_time = Instant::now();
        let mut report = RunReport::default();

        if request.files.is_empty() {
            report.warning("Upload at least one PDF.");
            return RunOutcome::aborted(report, AppError::NoInput("no files uploaded".to_string()));
        }

        // Credential problems stop the run before any page is touched
        match self.translator.verify().await {
            Ok(()) => {}
            Err(e) if e.is_fatal() => {
                report.error(format!("Cannot start translation: {}", e));
                return RunOutcome::aborted(report, e.into());
            }
            Err(e) => {
                report.warning(format!(
                    "Could not check the API key before starting ({}). Translating anyway.",
                    e
                ));
            }
        }
        report.info(format!("Translating with {}.", self.translator.describe()));

        let extracted = self.extract_all(&request.files, &mut report);
        if extracted.is_empty() {
            report.error("None of the uploaded files could be read as a PDF.");
            return RunOutcome::aborted(report, AppError::NoInput("no readable PDF".to_string()));
        }

        let document = match self.translate_files(&extracted, &request.options, &mut report, progress).await {
            Ok(document) => document,
            Err(e) => return RunOutcome::aborted(report, e.into()),
        };

        let bytes = match self.assembler.render(&document) {
            Ok(bytes) => bytes,
            Err(e) => {
                report.error(format!("Could not build the Word document: {}", e));
                return RunOutcome::aborted(report, e);
            }
        };

        let file_name = sanitize_output_name(
            request.output_name.as_deref().unwrap_or(""),
            &self.config.document.output_file_name,
        );

        report.success(format!(
            "Done. {} page(s) translated from {} file(s) in {}.",
            report.pages_translated,
            report.files_processed,
            Self::format_duration(start_time.elapsed())
        ));

        RunOutcome {
            report,
            document: Some(PreparedDocument {
                file_name,
                bytes,
                document,
            }),
            fatal: None,
        }
    }

    /// Translate already extracted files into the output document.
    ///
    /// Pages without text are carried through untranslated. A failed page
    /// gets a placeholder and the run continues; credential failures end it.
    pub async fn translate_files<F>(
        &self,
        files: &[ExtractedFile],
        options: &TranslationOptions,
        report: &mut RunReport,
        mut progress: F,
    ) -> Result<OutputDocument, TranslationError>
    where
        F: FnMut(usize, usize) + Send,
    {
        let total_pages: usize = files.iter().map(ExtractedFile::page_count).sum();
        let mut done = 0;
        progress(done, total_pages);

        let mut document = OutputDocument::new();
        for file in files {
            let mut section = DocumentSection::new(&file.file_name);

            for page in &file.pages {
                let block = match &page.content {
                    PageContent::Empty => {
                        report.pages_without_text += 1;
                        PageBlock::new(page.index, PageBody::NoText)
                    }
                    PageContent::Text(text) => match self.translator.translate(text, options).await {
                        Ok(translated) => {
                            report.pages_translated += 1;
                            TranslatedPage { page_index: page.index, text: translated }.into()
                        }
                        Err(e) if e.is_fatal() => {
                            report.error(format!(
                                "Translation stopped at {}, page {}: {}",
                                file.file_name,
                                page.number(),
                                e
                            ));
                            return Err(e);
                        }
                        Err(e) => {
                            report.pages_failed += 1;
                            report.error(format!(
                                "{}, page {}: translation failed ({}). A placeholder was inserted.",
                                file.file_name,
                                page.number(),
                                e
                            ));
                            PageBlock::new(page.index, PageBody::Failed(e.to_string()))
                        }
                    },
                };
                section.push_page(block);

                done += 1;
                progress(done, total_pages);
            }

            report.files_processed += 1;
            document.push_section(section);
        }

        Ok(document)
    }

    /// Extract every upload, reporting unreadable files and text-less pages
    fn extract_all(&self, files: &[UploadedFile], report: &mut RunReport) -> Vec<ExtractedFile> {
        let mut extracted = Vec::with_capacity(files.len());

        for upload in files {
            match self.extractor.extract_file(&upload.file_name, &upload.content) {
                Ok(file) => {
                    for page in file.empty_pages() {
                        report.warning(format!(
                            "{}, page {}: no selectable text detected. The page is not translated (scanned pages need OCR).",
                            file.file_name,
                            page.number()
                        ));
                    }
                    info!("{}: {} page(s) extracted", file.file_name, file.page_count());
                    extracted.push(file);
                }
                Err(e) => {
                    report.files_failed += 1;
                    report.error(format!("{}: skipped, {}", upload.file_name, e));
                }
            }
        }

        extracted
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
