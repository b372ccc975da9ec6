//! The marker patterns recognized in exam documents.
//!
//! Four patterns are fixed; the header pattern is built from the
//! document's recurring header phrase (typically the subject name).
//! All matching is case-insensitive and confined to one text line.

use regex::Regex;

use crate::layout::LabelPattern;

/// Header phrase used when none is configured.
pub const DEFAULT_HEADER_PHRASE: &str = "Specialist";

/// The compiled marker patterns for one document scan.
#[derive(Debug, Clone)]
pub struct PatternSet {
    /// "Question N", excluding continuation banners
    pub question: LabelPattern,
    /// "Question N ... continued"
    pub question_continued: LabelPattern,
    /// "See next page"
    pub next_page: LabelPattern,
    /// "End of ...", excluding booklet/solution phrasings
    pub end_of_section: LabelPattern,
    /// The recurring page header phrase
    pub header: LabelPattern,
}

impl PatternSet {
    /// Build the pattern set with the given header phrase.
    ///
    /// The fixed patterns are compiled literals, so construction cannot
    /// fail; the header phrase is escaped before compilation.
    pub fn new(header_phrase: &str) -> Self {
        let continued = Regex::new(r"(?i)question (\d+).*con").unwrap();

        Self {
            question: LabelPattern::new(Regex::new(r"(?i)question (\d+)").unwrap())
                .with_exclusion(Regex::new(r"(?i)question \d+.*con").unwrap()),
            question_continued: LabelPattern::new(continued),
            next_page: LabelPattern::new(Regex::new(r"(?i)see (next) page").unwrap()),
            end_of_section: LabelPattern::new(Regex::new(r"(?i)end (of)").unwrap())
                .with_exclusion(Regex::new(r"(?i)end of (this booklet|sol)").unwrap()),
            header: LabelPattern::new(
                Regex::new(&format!(r"(?i)({})", regex::escape(header_phrase))).unwrap(),
            ),
        }
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_PHRASE)
    }
}
