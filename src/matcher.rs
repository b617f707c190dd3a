//! Locate national codes inside free text
//!
//! Codes appear either bare (`0499370899`) or in the dashed form printed on
//! ID cards (`049-937089-9`). Every shape match is validated before it is
//! reported. A match glued to another dash-separated token, as in
//! `0499370899-5`, is not a national code and is skipped.

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;

use crate::validators;

static CODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[0-9]{3}-?[0-9]{6}-?[0-9]\b").expect("national code pattern is valid")
});

/// A national-code shaped span of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    pub text: String,
    pub valid: bool,
}

impl RawMatch {
    /// Start and end as character offsets into `source`, the text that
    /// was scanned
    pub fn char_span(&self, source: &str) -> (usize, usize) {
        let start = source[..self.start].chars().count();
        (start, start + self.text.chars().count())
    }
}

/// Every shape match in `text`, valid or not, in order of appearance
pub fn find_all(text: &str) -> Vec<RawMatch> {
    CODE_PATTERN
        .find_iter(text)
        .filter(|m| !text[..m.start()].ends_with('-') && !text[m.end()..].starts_with('-'))
        .map(|m| {
            let digits: String = m.as_str().chars().filter(|&c| c != '-').collect();
            RawMatch {
                start: m.start(),
                end: m.end(),
                text: m.as_str().to_string(),
                valid: validators::validate(digits.as_str()),
            }
        })
        .collect()
}

/// Only the matches that pass validation
pub fn find_valid(text: &str) -> Vec<RawMatch> {
    find_all(text).into_iter().filter(|m| m.valid).collect()
}

/// Run [`find_valid`] over many texts in parallel
pub fn scan_batch<S: AsRef<str> + Sync>(texts: &[S]) -> Vec<Vec<RawMatch>> {
    log::debug!("scanning batch of {} texts for national codes", texts.len());
    texts.par_iter().map(|t| find_valid(t.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_bare_code() {
        let matches = find_all("national code: 0499370899.");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "0499370899");
        assert_eq!(matches[0].start, 15);
        assert_eq!(matches[0].end, 25);
        assert!(matches[0].valid);
    }

    #[test]
    fn test_find_dashed_code() {
        let matches = find_valid("ID 049-937089-9 on file");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "049-937089-9");
    }

    #[test]
    fn test_invalid_codes_flagged() {
        let matches = find_all("0499370899 1234567890 1111111111");
        let validity: Vec<bool> = matches.iter().map(|m| m.valid).collect();
        assert_eq!(validity, vec![true, false, false]);
        assert_eq!(find_valid("0499370899 1234567890 1111111111").len(), 1);
    }

    #[test]
    fn test_no_match_inside_longer_numbers() {
        assert!(find_all("004993708990").is_empty()); // 12 digits
        assert!(find_all("x0499370899").is_empty()); // No word boundary
        assert!(find_all("049937089").is_empty()); // Too short
    }

    #[test]
    fn test_byte_offsets_after_multibyte_text() {
        let text = "کد ملی 0499370899";
        let matches = find_valid(text);
        assert_eq!(matches.len(), 1);
        assert_eq!(&text[matches[0].start..matches[0].end], "0499370899");
    }

    #[test]
    fn test_skip_codes_inside_dashed_tokens() {
        assert!(find_all("0499370899-5").is_empty());
        assert!(find_all("5-0499370899").is_empty());
        assert!(find_all("049-937089-9-1").is_empty());

        let matches = find_valid("0499370899 - 1234567891");
        let texts: Vec<&str> = matches.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["0499370899", "1234567891"]);
    }

    #[test]
    fn test_char_span_counts_characters() {
        let text = "کد ملی 0499370899";
        let matches = find_valid(text);
        assert_eq!(matches[0].start, 12);
        assert_eq!(matches[0].char_span(text), (7, 17));

        let ascii = "id 049-937089-9";
        let matches = find_valid(ascii);
        assert_eq!(matches[0].char_span(ascii), (3, 15));
    }

    #[test]
    fn test_scan_batch() {
        let texts = ["a 1234567891 b", "nothing here", "0100000010 and 1000000001"];
        let results = scan_batch(&texts);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].len(), 1);
        assert!(results[1].is_empty());
        assert_eq!(results[2].len(), 2);
    }
}
