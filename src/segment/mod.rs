//! The question segmentation engine.
//!
//! Wires marker extraction, viewport geometry, and the segmentation fold
//! together: given a text finder over an opened document, produce the
//! mapping from question number to the ordered page slices covering that
//! question's content.

pub mod classifier;
pub mod geometry;
pub mod patterns;
pub mod reducer;

pub use geometry::{PageGeometry, PAGE_TOP_MARGIN};
pub use patterns::{PatternSet, DEFAULT_HEADER_PHRASE};
pub use reducer::Reducer;

use crate::error::Result;
use crate::layout::TextFinder;
use crate::model::Segmentation;

/// Options for segmentation.
#[derive(Debug, Clone)]
pub struct SegmentOptions {
    /// The document's recurring header phrase, used only to estimate
    /// header placement on the page.
    pub header_phrase: String,
}

impl SegmentOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recurring header phrase.
    pub fn with_header_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.header_phrase = phrase.into();
        self
    }
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            header_phrase: DEFAULT_HEADER_PHRASE.to_string(),
        }
    }
}

/// Segment a document into per-question page ranges.
///
/// Each run is independent and stateless: the same document always yields
/// the same segmentation.
pub fn segment<F: TextFinder>(finder: &F) -> Result<Segmentation> {
    segment_with_options(finder, &SegmentOptions::default())
}

/// Segment a document with custom options.
pub fn segment_with_options<F: TextFinder>(
    finder: &F,
    options: &SegmentOptions,
) -> Result<Segmentation> {
    let patterns = PatternSet::new(&options.header_phrase);
    let labels = classifier::extract_labels(finder, &patterns)?;
    let geometry = PageGeometry::from_labels(&labels)?;
    let segmentation = Reducer::new(&labels, &geometry, finder.page_count()).run()?;

    log::debug!(
        "segmented {} questions across {} pages",
        segmentation.question_count(),
        finder.page_count()
    );
    Ok(segmentation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = SegmentOptions::new().with_header_phrase("Further Mathematics");
        assert_eq!(options.header_phrase, "Further Mathematics");
    }

    #[test]
    fn test_default_header_phrase() {
        assert_eq!(SegmentOptions::default().header_phrase, "Specialist");
    }
}
