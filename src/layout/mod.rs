//! Text location and search over a document's layout.
//!
//! This module is the extraction collaborator of the segmentation engine:
//! given an opened document and a marker pattern, it produces the ordered
//! list of matches (bounding box + page index + captured value) for that
//! pattern. Matching is confined to single text lines; markers never span
//! lines.

mod extract;
mod node;

pub use node::{BBox, LayoutNode, LayoutPage};

use std::path::Path;

use lopdf::Document as LopdfDocument;
use regex::Regex;

use crate::error::{Error, Result};
use crate::model::LabelMatch;

/// A marker pattern: a capturing regex plus an optional same-line
/// exclusion, applied to one text line at a time.
///
/// The exclusion stands in for a negative lookahead: a line matching it is
/// rejected even when the capture regex matches.
#[derive(Debug, Clone)]
pub struct LabelPattern {
    capture: Regex,
    exclude: Option<Regex>,
}

impl LabelPattern {
    /// Create a pattern from a capture regex.
    pub fn new(capture: Regex) -> Self {
        Self {
            capture,
            exclude: None,
        }
    }

    /// Reject lines that also match `exclude`.
    pub fn with_exclusion(mut self, exclude: Regex) -> Self {
        self.exclude = Some(exclude);
        self
    }

    /// Match one line of text, returning the captured value.
    ///
    /// The value is the first capture group if the regex has one,
    /// otherwise the whole match.
    pub fn match_line(&self, text: &str) -> Option<String> {
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(text) {
                return None;
            }
        }
        let caps = self.capture.captures(text)?;
        let value = match caps.get(1) {
            Some(group) => group.as_str(),
            None => &caps[0],
        };
        Some(value.to_string())
    }
}

/// Ordered text search over an opened document.
///
/// Implementations must return matches in page-then-visual order (pages in
/// increasing index; within a page, the layout tree's natural traversal
/// order) and must not match across line boundaries.
pub trait TextFinder {
    /// Run a marker pattern over every text line of the document.
    fn find_matches(&self, pattern: &LabelPattern) -> Result<Vec<LabelMatch>>;

    /// Total number of pages in the document.
    fn page_count(&self) -> usize;
}

/// Text finder backed by a parsed PDF document.
///
/// The document is fully scanned on construction and released before any
/// searching happens, so find calls never touch the underlying file.
pub struct PdfTextFinder {
    pages: Vec<LayoutPage>,
}

impl PdfTextFinder {
    /// Open and scan a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path).map_err(Error::from)?;
        Self::from_document(&doc)
    }

    /// Scan a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data).map_err(Error::from)?;
        Self::from_document(&doc)
    }

    /// Scan an already-loaded lopdf document.
    pub fn from_document(doc: &LopdfDocument) -> Result<Self> {
        let pages = extract::extract_pages(doc)?;
        log::debug!("scanned {} pages", pages.len());
        Ok(Self { pages })
    }

    /// The scanned layout pages.
    pub fn pages(&self) -> &[LayoutPage] {
        &self.pages
    }
}

impl TextFinder for PdfTextFinder {
    fn find_matches(&self, pattern: &LabelPattern) -> Result<Vec<LabelMatch>> {
        let mut matches = Vec::new();
        for page in &self.pages {
            for (text, bbox) in page.text_lines() {
                if let Some(value) = pattern.match_line(text) {
                    matches.push(LabelMatch::new(
                        bbox.x1, bbox.x2, bbox.y1, bbox.y2, page.index, value,
                    ));
                }
            }
        }
        Ok(matches)
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_capture_group() {
        let pattern = LabelPattern::new(Regex::new(r"(?i)question (\d+)").unwrap());
        assert_eq!(pattern.match_line("Question 12"), Some("12".to_string()));
        assert_eq!(pattern.match_line("QUESTION 3 (7 marks)"), Some("3".to_string()));
        assert_eq!(pattern.match_line("Answer 12"), None);
    }

    #[test]
    fn test_pattern_whole_match_without_group() {
        let pattern = LabelPattern::new(Regex::new(r"(?i)end of").unwrap());
        assert_eq!(
            pattern.match_line("END OF SECTION A"),
            Some("END OF".to_string())
        );
    }

    #[test]
    fn test_pattern_exclusion_rejects_line() {
        let pattern = LabelPattern::new(Regex::new(r"(?i)question (\d+)").unwrap())
            .with_exclusion(Regex::new(r"(?i)question \d+.*con").unwrap());
        assert_eq!(pattern.match_line("Question 4"), Some("4".to_string()));
        assert_eq!(pattern.match_line("Question 4 continued"), None);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let result = PdfTextFinder::from_bytes(b"not a pdf at all");
        assert!(result.is_err());
    }
}
