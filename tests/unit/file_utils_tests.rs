/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use hebdoc::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "exists.tmp", b"test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

#[test]
fn test_hasExtension_shouldIgnoreCase() {
    assert!(FileManager::has_extension("scan.PDF", "pdf"));
    assert!(FileManager::has_extension("dir/a.pdf", "pdf"));
    assert!(!FileManager::has_extension("notes.txt", "pdf"));
    assert!(!FileManager::has_extension("pdf", "pdf"));
}

#[test]
fn test_findFiles_shouldRecurseAndSortByPath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("b");
    FileManager::ensure_dir(&nested)?;

    common::create_test_file(temp_dir.path(), "c.pdf", b"%PDF")?;
    common::create_test_file(temp_dir.path(), "a.pdf", b"%PDF")?;
    common::create_test_file(&nested, "inner.pdf", b"%PDF")?;
    common::create_test_file(temp_dir.path(), "skip.txt", b"text")?;

    let found = FileManager::find_files(temp_dir.path(), "pdf")?;
    let names: Vec<String> = found
        .iter()
        .map(|p| p.strip_prefix(temp_dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(names, vec!["a.pdf", "b/inner.pdf", "c.pdf"]);
    Ok(())
}

#[test]
fn test_collectPdfs_shouldKeepArgumentOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let second = common::create_test_file(temp_dir.path(), "z.pdf", b"%PDF")?;
    let folder = temp_dir.path().join("folder");
    FileManager::ensure_dir(&folder)?;
    let inside = common::create_test_file(&folder, "a.pdf", b"%PDF")?;

    let collected = FileManager::collect_pdfs(&[second.clone(), folder])?;
    assert_eq!(collected, vec![second, inside]);
    Ok(())
}

#[test]
fn test_collectPdfs_withMissingPath_shouldFail() {
    let result = FileManager::collect_pdfs(&["/definitely/not/here.pdf".into()]);
    assert!(result.is_err());
}

#[test]
fn test_writeBytes_shouldCreateParentAndRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out").join("translation.docx");

    FileManager::write_bytes(&path, b"PK\x03\x04")?;
    assert_eq!(FileManager::read_bytes(&path)?, b"PK\x03\x04");
    Ok(())
}
