//! Marker extraction facade.
//!
//! Runs each marker pattern against the document once and groups the
//! results into a [`LabelStore`]. Performs no recovery: if the finder
//! fails, the whole scan fails.

use crate::error::Result;
use crate::layout::TextFinder;
use crate::model::{LabelCategory, LabelStore};
use crate::segment::patterns::PatternSet;

/// Extract every marker category from the document.
pub fn extract_labels<F: TextFinder>(finder: &F, patterns: &PatternSet) -> Result<LabelStore> {
    let store = LabelStore {
        question: finder.find_matches(&patterns.question)?,
        question_continued: finder.find_matches(&patterns.question_continued)?,
        next_page: finder.find_matches(&patterns.next_page)?,
        end_of_section: finder.find_matches(&patterns.end_of_section)?,
        header: finder.find_matches(&patterns.header)?,
    };

    for category in LabelCategory::ALL {
        log::debug!(
            "{}: {} matches",
            category.as_str(),
            store.get(category).len()
        );
    }

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::layout::LabelPattern;
    use crate::model::LabelMatch;

    /// Finder that fails every call, standing in for an unreadable document.
    struct BrokenFinder;

    impl TextFinder for BrokenFinder {
        fn find_matches(&self, _pattern: &LabelPattern) -> Result<Vec<LabelMatch>> {
            Err(Error::DocumentRead("corrupt xref table".to_string()))
        }

        fn page_count(&self) -> usize {
            0
        }
    }

    #[test]
    fn test_finder_failure_propagates() {
        let result = extract_labels(&BrokenFinder, &PatternSet::default());
        assert!(matches!(result, Err(Error::DocumentRead(_))));
    }
}
