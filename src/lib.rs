/*!
 * # hebdoc - Hebrew PDF to English Word
 *
 * A Rust library and web app that turns Hebrew PDFs into one translated
 * Word document.
 *
 * ## Features
 *
 * - Extract the text layer of every PDF page, in order
 * - Detect pages without selectable text (scans) and skip them with a warning
 * - Translate each page through the OpenAI Responses API with a selectable style
 * - Combine all files into one .docx with a heading per file and per page
 * - Single-page web UI with single-use downloads, plus a terminal mode
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `pdf_extractor`: Per-page text extraction and empty-page detection
 * - `translation`: Page translation:
 *   - `translation::core`: The `Translator` seam and the OpenAI-backed service
 *   - `translation::prompts`: Prompt building
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::openai`: OpenAI Responses API client
 *   - `providers::mock`: Scriptable provider for tests
 * - `document`: Output document model and .docx rendering
 * - `app_controller`: Orchestrates one run and collects its status messages
 * - `web`: axum server with the upload page and downloads
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod pdf_extractor;
pub mod providers;
pub mod translation;
pub mod web;

// Re-export main types for easier usage
pub use app_config::{Config, TranslationStyle};
pub use app_controller::{Controller, RunOutcome, RunReport, RunRequest, UploadedFile};
pub use document::{DocumentAssembler, OutputDocument};
pub use pdf_extractor::{ExtractedFile, PdfTextExtractor};
pub use translation::{TranslationOptions, TranslationService, Translator};
pub use language_utils::{language_codes_match, normalize_to_part2t, get_language_name};
pub use errors::{AppError, CredentialError, ExtractionError, ProviderError, TranslationError};
