/*!
 * End-to-end pipeline tests: uploads in, status messages and a Word document out.
 *
 * A mock translator stands in for the remote service so call counts and the
 * exact texts sent can be checked.
 */

use anyhow::Result;
use std::sync::Arc;
use parking_lot::Mutex;

use hebdoc::app_config::{Config, TranslationStyle};
use hebdoc::app_controller::{Controller, RunReport, RunRequest, StatusLevel, UploadedFile};
use hebdoc::document::PageBody;
use hebdoc::errors::{AppError, CredentialError, TranslationError};
use hebdoc::pdf_extractor::{ExtractedFile, Page, PageContent};
use hebdoc::providers::mock::MockProvider;
use hebdoc::translation::TranslationOptions;
use crate::common;

fn controller(provider: &MockProvider) -> Controller {
    Controller::with_translator(Config::default(), Arc::new(provider.clone())).unwrap()
}

fn upload(name: &str, pages: &[Option<&str>]) -> UploadedFile {
    UploadedFile::new(name, common::build_pdf(pages))
}

fn request(files: Vec<UploadedFile>) -> RunRequest {
    RunRequest {
        files,
        ..Default::default()
    }
}

fn translated_texts(body: &[hebdoc::document::PageBlock]) -> Vec<String> {
    body.iter()
        .map(|block| match &block.body {
            PageBody::Translated(text) => text.clone(),
            PageBody::NoText => "<no text>".to_string(),
            PageBody::Failed(_) => "<failed>".to_string(),
        })
        .collect()
}

#[tokio::test]
async fn test_run_withTwoFiles_shouldPreserveFileAndPageOrder() {
    let provider = MockProvider::working();
    let files = vec![
        upload("first.pdf", &[Some("Alpha page of the first file"), Some("Bravo page of the first file")]),
        upload("second.pdf", &[Some("Charlie page of the second file")]),
    ];

    let outcome = controller(&provider).run(request(files), |_, _| {}).await;

    assert!(outcome.is_success(), "messages: {:?}", outcome.report.messages);
    let prepared = outcome.document.unwrap();
    let sections = &prepared.document.sections;
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].file_name, "first.pdf");
    assert_eq!(sections[1].file_name, "second.pdf");

    let first = translated_texts(&sections[0].pages);
    assert!(first[0].contains("Alpha"));
    assert!(first[1].contains("Bravo"));
    assert!(translated_texts(&sections[1].pages)[0].contains("Charlie"));

    let received = provider.received_texts();
    assert_eq!(received.len(), 3);
    assert!(received[0].contains("Alpha") && received[1].contains("Bravo") && received[2].contains("Charlie"));

    assert_eq!(prepared.file_name, "translation.docx");
    assert!(prepared.bytes.starts_with(b"PK"));
    assert_eq!(outcome.report.with_level(StatusLevel::Success).count(), 1);
}

#[tokio::test]
async fn test_run_withPageWithoutText_shouldWarnAndNeverTranslateIt() {
    let provider = MockProvider::working();
    let files = vec![upload(
        "scan.pdf",
        &[Some("Readable text on the first page"), None, Some("Readable text on the third page")],
    )];

    let outcome = controller(&provider).run(request(files), |_, _| {}).await;

    assert!(outcome.is_success());
    assert_eq!(provider.request_count(), 2);
    assert!(provider.received_texts().iter().all(|t| !t.is_empty()));

    let warnings: Vec<_> = outcome.report.with_level(StatusLevel::Warning).collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("scan.pdf, page 2"));
    assert_eq!(outcome.report.pages_without_text, 1);

    let prepared = outcome.document.unwrap();
    let pages = &prepared.document.sections[0].pages;
    assert_eq!(pages.len(), 3);
    assert_eq!(pages[1].body, PageBody::NoText);
    assert_eq!(pages[1].page_index, 1);
}

#[tokio::test]
async fn test_run_withValidAndMalformedFile_shouldProcessValidAndReportOther() {
    let provider = MockProvider::working();
    let files = vec![
        UploadedFile::new("broken.pdf", b"%PDF-1.4 this is not really a pdf".to_vec()),
        upload("good.pdf", &[Some("A perfectly fine page of text")]),
    ];

    let outcome = controller(&provider).run(request(files), |_, _| {}).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.report.files_failed, 1);
    assert_eq!(outcome.report.files_processed, 1);

    let errors: Vec<_> = outcome.report.with_level(StatusLevel::Error).collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("broken.pdf"));

    let sections = outcome.document.unwrap().document.sections;
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].file_name, "good.pdf");
}

#[tokio::test]
async fn test_run_withOnlyMalformedFiles_shouldFailWithoutDocument() {
    let provider = MockProvider::working();
    let files = vec![UploadedFile::new("junk.pdf", b"junk".to_vec())];

    let outcome = controller(&provider).run(request(files), |_, _| {}).await;

    assert!(!outcome.is_success());
    assert!(matches!(outcome.fatal, Some(AppError::NoInput(_))));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_run_withMissingCredential_shouldMakeZeroCallsAndOneFatalMessage() {
    let provider = MockProvider::missing_credential();
    let files = vec![upload("a.pdf", &[Some("Text that would be translated")])];
    let progress_calls = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&progress_calls);

    let outcome = controller(&provider)
        .run(request(files), move |_, _| *counter.lock() += 1)
        .await;

    assert_eq!(provider.verify_count(), 1);
    assert_eq!(provider.request_count(), 0);
    assert_eq!(*progress_calls.lock(), 0);
    assert!(outcome.document.is_none());
    assert!(matches!(
        outcome.fatal,
        Some(AppError::Translation(TranslationError::Credential(CredentialError::Missing(_))))
    ));
    assert_eq!(outcome.report.messages.len(), 1);
    assert_eq!(outcome.report.messages[0].level, StatusLevel::Error);
    assert!(outcome.report.messages[0].message.contains("OPENAI_API_KEY"));
}

#[tokio::test]
async fn test_run_withNoFiles_shouldAskForUpload() {
    let provider = MockProvider::working();

    let outcome = controller(&provider).run(request(Vec::new()), |_, _| {}).await;

    assert!(matches!(outcome.fatal, Some(AppError::NoInput(_))));
    assert_eq!(outcome.report.messages[0].message, "Upload at least one PDF.");
    assert_eq!(provider.verify_count(), 0);
}

#[tokio::test]
async fn test_run_withFailingPage_shouldInsertPlaceholderAndContinue() {
    let provider = MockProvider::fail_on_call(2);
    let files = vec![upload(
        "book.pdf",
        &[Some("Page one with some text"), Some("Page two with some text"), Some("Page three with text")],
    )];

    let outcome = controller(&provider).run(request(files), |_, _| {}).await;

    assert!(outcome.is_success());
    assert_eq!(provider.request_count(), 3);
    assert_eq!(outcome.report.pages_failed, 1);
    assert_eq!(outcome.report.pages_translated, 2);

    let errors: Vec<_> = outcome.report.with_level(StatusLevel::Error).collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("book.pdf, page 2"));

    let prepared = outcome.document.unwrap();
    let pages = &prepared.document.sections[0].pages;
    assert!(matches!(pages[1].body, PageBody::Failed(_)));
    assert!(matches!(pages[2].body, PageBody::Translated(_)));
}

#[tokio::test]
async fn test_run_withRejectedKey_shouldAbortBeforeTranslating() {
    let provider = MockProvider::unauthorized();
    let files = vec![upload("a.pdf", &[Some("Text that would be translated")])];

    let outcome = controller(&provider).run(request(files), |_, _| {}).await;

    assert!(outcome.document.is_none());
    assert_eq!(provider.request_count(), 0);
    assert!(outcome.fatal.is_some());
}

#[tokio::test]
async fn test_run_shouldReportProgressPerPage() {
    let provider = MockProvider::working();
    let files = vec![
        upload("a.pdf", &[Some("Some text on page one"), None]),
        upload("b.pdf", &[Some("Some text on page one")]),
    ];
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    controller(&provider)
        .run(request(files), move |done, total| sink.lock().push((done, total)))
        .await;

    assert_eq!(*seen.lock(), vec![(0, 3), (1, 3), (2, 3), (3, 3)]);
}

#[tokio::test]
async fn test_run_withOutputName_shouldSanitizeIt() {
    let provider = MockProvider::working();
    let mut run = request(vec![upload("a.pdf", &[Some("Enough text for one page")])]);
    run.output_name = Some("weekly/shiur".to_string());
    run.options = TranslationOptions::new(TranslationStyle::Academic, "Keep names");

    let outcome = controller(&provider).run(run, |_, _| {}).await;

    assert_eq!(outcome.document.unwrap().file_name, "weekly_shiur.docx");
}

/// Two Hebrew pages translated by a stub that answers with fixed strings
#[tokio::test]
async fn test_translateFiles_hebrewRoundTrip_shouldKeepPageOrder() -> Result<()> {
    let provider = MockProvider::scripted(["hello", "world"]);
    let file = ExtractedFile::new(
        "greeting.pdf",
        vec![
            Page::new(0, PageContent::Text("שלום".to_string())),
            Page::new(1, PageContent::Text("עולם".to_string())),
        ],
    );
    let mut report = RunReport::default();

    let document = controller(&provider)
        .translate_files(&[file], &TranslationOptions::default(), &mut report, |_, _| {})
        .await?;

    assert_eq!(provider.received_texts(), vec!["שלום", "עולם"]);
    assert_eq!(document.sections.len(), 1);
    assert_eq!(translated_texts(&document.sections[0].pages), vec!["hello", "world"]);
    assert_eq!(document.sections[0].pages[0].label(), "Page 1");
    assert_eq!(document.sections[0].pages[1].label(), "Page 2");
    Ok(())
}

#[tokio::test]
async fn test_runPaths_shouldReadFilesFromDisk() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_pdf(temp_dir.path(), "disk.pdf", &[Some("Text stored on disk here")])?;
    let provider = MockProvider::working();

    let outcome = controller(&provider)
        .run_paths(&[path], TranslationOptions::default(), None, |_, _| {})
        .await?;

    assert_eq!(outcome.document.unwrap().document.sections[0].file_name, "disk.pdf");
    Ok(())
}

#[tokio::test]
async fn test_translateFiles_withKeyRejectedMidRun_shouldStopAtThatPage() {
    // translate_files skips the up-front check, so the first page call hits the rejection
    let provider = MockProvider::unauthorized();
    let file = ExtractedFile::new(
        "long.pdf",
        vec![
            Page::new(0, PageContent::Text("first page text".to_string())),
            Page::new(1, PageContent::Text("second page text".to_string())),
        ],
    );
    let mut report = RunReport::default();

    let result = controller(&provider)
        .translate_files(&[file], &TranslationOptions::default(), &mut report, |_, _| {})
        .await;

    let err = result.unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(provider.request_count(), 1);
    assert_eq!(report.pages_translated, 0);
    assert!(report.messages[0].message.contains("long.pdf, page 1"));
}

#[tokio::test]
async fn test_run_withUnreachableCheck_shouldWarnAndStillTranslate() {
    let provider = MockProvider::unverifiable();
    let files = vec![upload("a.pdf", &[Some("Text that will be translated")])];

    let outcome = controller(&provider).run(request(files), |_, _| {}).await;

    assert!(outcome.is_success());
    assert!(outcome.fatal.is_none());
    assert_eq!(provider.request_count(), 1);
    let warnings: Vec<_> = outcome.report.with_level(StatusLevel::Warning).collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("Could not check the API key"));
    assert!(!outcome.report.has_errors());
}

#[tokio::test]
async fn test_run_withOneWordPages_shouldTranslateBothInOrder() {
    let provider = MockProvider::scripted(["hello", "world"]);
    let files = vec![upload("short.pdf", &[Some("Shalom"), Some("Olam")])];

    let outcome = controller(&provider).run(request(files), |_, _| {}).await;

    assert!(outcome.is_success(), "messages: {:?}", outcome.report.messages);
    assert_eq!(provider.received_texts(), vec!["Shalom", "Olam"]);
    assert_eq!(outcome.report.with_level(StatusLevel::Warning).count(), 0);
    assert_eq!(outcome.report.pages_without_text, 0);

    let prepared = outcome.document.unwrap();
    let pages = &prepared.document.sections[0].pages;
    assert_eq!(translated_texts(pages), vec!["hello", "world"]);
    assert_eq!(pages[0].page_index, 0);
    assert_eq!(pages[1].page_index, 1);
}
