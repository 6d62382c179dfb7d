//! Keyword normalization for inflection-tolerant matching.
//!
//! Words are reduced to a crude stem by fixed suffix truncation, counted in
//! characters so multi-byte scripts truncate on glyph boundaries. A stem is
//! then used as a prefix/substring key: "Курсовий" stems to "Курсов", which
//! also matches "Курсового" or "курсова" once case is accounted for.
//!
//! # How it works
//! 1. Split the raw keyword string on commas; each non-blank segment is a
//!    phrase.
//! 2. Split each phrase on space, tab and newline; stem every word.
//! 3. Keep phrase grouping for contiguous matching, or flatten to a
//!    deduplicated stem list for independent per-word search.
//! 4. Optionally expand a stem into its case renderings.
//!
//! # Example
//! ```
//! use docmark_stem::{Keywords, case_variants, stem};
//!
//! assert_eq!(stem("Мова"), "Мов");
//!
//! let kw = Keywords::parse("Курсовий проєкт, мова").unwrap();
//! assert_eq!(kw.phrases().len(), 2);
//! assert_eq!(kw.flat_stems(), vec!["Курсов", "проє", "мов"]);
//!
//! let variants = case_variants("мов");
//! assert!(variants.contains(&"МОВ".to_string()));
//! ```

use thiserror::Error;

/// Characters separating words inside one phrase.
const WORD_SEPARATORS: [char; 3] = [' ', '\t', '\n'];

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum KeywordError {
    #[error("keywords cannot be empty")]
    Empty,
}

/// Reduce a word to its stem.
///
/// More than four characters loses two, exactly four loses one, shorter words
/// are kept whole.
pub fn stem(word: &str) -> &str {
    let len = word.chars().count();
    let drop = match len {
        n if n > 4 => 2,
        4 => 1,
        _ => 0,
    };
    if drop == 0 {
        return word;
    }
    match word.char_indices().nth(len - drop) {
        Some((cut, _)) => &word[..cut],
        None => word,
    }
}

/// Stems of one comma-separated keyword segment, in input order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StemmedPhrase {
    stems: Vec<String>,
}

impl StemmedPhrase {
    fn from_segment(segment: &str) -> Option<Self> {
        let stems: Vec<String> = segment
            .split(WORD_SEPARATORS)
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(|w| stem(w).to_string())
            .collect();
        if stems.is_empty() {
            None
        } else {
            Some(Self { stems })
        }
    }

    pub fn stems(&self) -> &[String] {
        &self.stems
    }
}

/// Validated, stemmed keyword input for one highlighting call.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Keywords {
    phrases: Vec<StemmedPhrase>,
}

impl Keywords {
    /// Parse a raw comma-separated keyword string.
    ///
    /// Fails with [`KeywordError::Empty`] when no segment survives trimming.
    pub fn parse(raw: &str) -> Result<Self, KeywordError> {
        let phrases: Vec<StemmedPhrase> = raw
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .filter_map(StemmedPhrase::from_segment)
            .collect();
        if phrases.is_empty() {
            return Err(KeywordError::Empty);
        }
        Ok(Self { phrases })
    }

    pub fn phrases(&self) -> &[StemmedPhrase] {
        &self.phrases
    }

    /// All stems across phrases, first occurrence wins.
    pub fn flat_stems(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for stem in self.phrases.iter().flat_map(|p| p.stems.iter()) {
            if !out.contains(&stem.as_str()) {
                out.push(stem);
            }
        }
        out
    }
}

/// Case renderings of a stem: as given, lower, upper and title case.
///
/// Duplicates are removed while keeping that order, so the result always
/// starts with the stem itself and holds one to four entries.
pub fn case_variants(stem: &str) -> Vec<String> {
    let lower = stem.to_lowercase();
    let candidates = [
        stem.to_string(),
        lower.clone(),
        stem.to_uppercase(),
        title_case(&lower),
    ];
    let mut out: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}

/// Upper-case the first character of every whitespace-delimited word and
/// lower-case the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            at_word_start = false;
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_by_character_count() {
        assert_eq!(stem("test"), "tes");
        assert_eq!(stem("foo"), "foo");
        assert_eq!(stem("Курсовий"), "Курсов");
        assert_eq!(stem("Мова"), "Мов");
        assert_eq!(stem("words"), "wor");
        assert_eq!(stem("a"), "a");
    }

    #[test]
    fn title_cases_each_word() {
        assert_eq!(title_case("курсов"), "Курсов");
        assert_eq!(title_case("hello wORLD"), "Hello World");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn variants_deduplicate_in_order() {
        assert_eq!(case_variants("Курсов"), vec!["Курсов", "курсов", "КУРСОВ"]);
        assert_eq!(case_variants("abc"), vec!["abc", "ABC", "Abc"]);
        assert_eq!(case_variants("42"), vec!["42"]);
    }

    #[test]
    fn phrase_splits_on_space_tab_newline() {
        let phrase = StemmedPhrase::from_segment("курсова\tробота\nнова").unwrap();
        assert_eq!(phrase.stems(), ["курсо", "робо", "нов"]);
        assert!(StemmedPhrase::from_segment("   ").is_none());
    }
}
