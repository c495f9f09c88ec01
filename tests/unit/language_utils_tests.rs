/*!
 * Tests for ISO language code utilities
 */

use hebdoc::language_utils::{get_language_name, language_codes_match, normalize_to_part2t};

#[test]
fn test_normalizeToPart2t_withTwoLetterCode_shouldConvert() {
    assert_eq!(normalize_to_part2t("he").unwrap(), "heb");
    assert_eq!(normalize_to_part2t(" EN ").unwrap(), "eng");
}

#[test]
fn test_normalizeToPart2t_withBibliographicCode_shouldMapToTerminology() {
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
}

#[test]
fn test_normalizeToPart2t_withInvalidCode_shouldFail() {
    assert!(normalize_to_part2t("").is_err());
    assert!(normalize_to_part2t("xx").is_err());
    assert!(normalize_to_part2t("hebrew").is_err());
}

#[test]
fn test_languageCodesMatch_shouldCompareAcrossFormats() {
    assert!(language_codes_match("he", "heb"));
    assert!(language_codes_match("fr", "fre"));
    assert!(!language_codes_match("he", "en"));
    assert!(!language_codes_match("he", "nonsense"));
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("he").unwrap(), "Hebrew");
    assert_eq!(get_language_name("eng").unwrap(), "English");
}
