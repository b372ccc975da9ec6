//! Label match types produced by marker extraction.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One recognized marker occurrence in the document.
///
/// Coordinates are in page space with the origin at the lower-left corner
/// and y increasing upward, so `y1` (top edge) is numerically greater than
/// or equal to `y2` (bottom edge). A match is immutable once extracted;
/// later stages derive adjusted values instead of mutating stored matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMatch {
    /// Left edge
    pub x1: f32,
    /// Right edge
    pub x2: f32,
    /// Top edge
    pub y1: f32,
    /// Bottom edge
    pub y2: f32,
    /// Zero-based page index
    pub page: usize,
    /// Captured value: question number digits, or the marker word
    pub value: String,
}

impl LabelMatch {
    /// Create a new label match.
    pub fn new(
        x1: f32,
        x2: f32,
        y1: f32,
        y2: f32,
        page: usize,
        value: impl Into<String>,
    ) -> Self {
        Self {
            x1,
            x2,
            y1,
            y2,
            page,
            value: value.into(),
        }
    }

    /// Parse the captured value as a question number.
    pub fn question_number(&self) -> Result<u32> {
        self.value
            .trim()
            .parse()
            .map_err(|_| Error::MalformedLabel {
                value: self.value.clone(),
                page: self.page,
            })
    }
}

/// Marker categories recognized in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelCategory {
    /// "Question N" on a line that does not also read "continued"
    Question,
    /// "Question N ... continued" banner at the top of a carry-over page
    QuestionContinued,
    /// "See next page" footer
    NextPage,
    /// "End of ..." section terminator
    EndOfSection,
    /// The document's recurring page header phrase
    Header,
}

impl LabelCategory {
    /// All categories, in the order they are extracted.
    pub const ALL: [LabelCategory; 5] = [
        LabelCategory::Question,
        LabelCategory::QuestionContinued,
        LabelCategory::NextPage,
        LabelCategory::EndOfSection,
        LabelCategory::Header,
    ];

    /// Category name as used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelCategory::Question => "question",
            LabelCategory::QuestionContinued => "question_continued",
            LabelCategory::NextPage => "next_page",
            LabelCategory::EndOfSection => "end_of_section",
            LabelCategory::Header => "header",
        }
    }
}

/// Matches grouped by category.
///
/// Each list is in page-then-visual order as produced by the text finder
/// and is never reordered afterwards; the reducer relies on `question`
/// being monotonically non-decreasing in `page`.
#[derive(Debug, Clone, Default)]
pub struct LabelStore {
    /// Question markers
    pub question: Vec<LabelMatch>,
    /// Continuation banners
    pub question_continued: Vec<LabelMatch>,
    /// Page-footer markers
    pub next_page: Vec<LabelMatch>,
    /// Section terminators
    pub end_of_section: Vec<LabelMatch>,
    /// Recurring header matches
    pub header: Vec<LabelMatch>,
}

impl LabelStore {
    /// Matches for one category.
    pub fn get(&self, category: LabelCategory) -> &[LabelMatch] {
        match category {
            LabelCategory::Question => &self.question,
            LabelCategory::QuestionContinued => &self.question_continued,
            LabelCategory::NextPage => &self.next_page,
            LabelCategory::EndOfSection => &self.end_of_section,
            LabelCategory::Header => &self.header,
        }
    }

    /// Total number of matches across all categories.
    pub fn len(&self) -> usize {
        LabelCategory::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    /// Check whether no matches were found at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_number_parses_digits() {
        let m = LabelMatch::new(72.0, 150.0, 710.0, 698.0, 0, "12");
        assert_eq!(m.question_number().unwrap(), 12);
    }

    #[test]
    fn test_question_number_rejects_non_integer() {
        let m = LabelMatch::new(72.0, 150.0, 710.0, 698.0, 4, "twelve");
        let err = m.question_number().unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedLabel { page: 4, .. }
        ));
    }

    #[test]
    fn test_store_category_access() {
        let mut store = LabelStore::default();
        assert!(store.is_empty());

        store
            .question
            .push(LabelMatch::new(0.0, 0.0, 0.0, 0.0, 0, "1"));
        store
            .header
            .push(LabelMatch::new(0.0, 0.0, 0.0, 0.0, 0, "Specialist"));

        assert_eq!(store.get(LabelCategory::Question).len(), 1);
        assert_eq!(store.get(LabelCategory::Header).len(), 1);
        assert_eq!(store.len(), 2);
    }
}
