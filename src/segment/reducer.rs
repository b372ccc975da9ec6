//! The segmentation fold.
//!
//! Walks the question marker sequence left to right, pairing each marker
//! with its successor, and emits the page slices covering each question's
//! content. The fold builds a fresh accumulator per run and never mutates
//! the label store; boundary pages are derived values.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::model::{LabelMatch, LabelStore, PageData, SegmentWarning, Segmentation, Viewport};
use crate::segment::geometry::PageGeometry;

/// Effective end boundary for one question's page range.
///
/// The boundary page itself is exclusive: a question covers pages up to
/// `page() - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    /// The next question marker's page.
    NextQuestion(usize),
    /// An end-of-section marker, shifted to the start of the following
    /// page (the section's content runs to the end of the marker's page).
    SectionEnd(usize),
    /// Synthetic boundary one past the last page of the document.
    EndOfDocument(usize),
}

impl Boundary {
    fn page(&self) -> usize {
        match self {
            Boundary::NextQuestion(p) | Boundary::SectionEnd(p) | Boundary::EndOfDocument(p) => {
                *p
            }
        }
    }
}

/// The segmentation reducer: a strict left fold over the question
/// sequence.
pub struct Reducer<'a> {
    labels: &'a LabelStore,
    geometry: &'a PageGeometry,
    page_count: usize,
}

impl<'a> Reducer<'a> {
    /// Create a reducer over an extracted label store.
    pub fn new(labels: &'a LabelStore, geometry: &'a PageGeometry, page_count: usize) -> Self {
        Self {
            labels,
            geometry,
            page_count,
        }
    }

    /// Fold the question marker sequence into per-question page ranges.
    pub fn run(&self) -> Result<Segmentation> {
        let mut questions: BTreeMap<u32, Vec<PageData>> = BTreeMap::new();
        let mut warnings = Vec::new();

        for (current, next) in with_next(&self.labels.question) {
            let number = current.question_number()?;
            let boundary = self.boundary_for(number, current, next, &mut warnings);
            let pages = self.emit_pages(current, boundary.page());

            match questions.entry(number) {
                Entry::Occupied(mut entry) => {
                    log::info!(
                        "question {} reappears on page {}, extending its range",
                        number,
                        current.page
                    );
                    warnings.push(SegmentWarning::DuplicateQuestion {
                        question: number,
                        page: current.page,
                    });
                    entry.get_mut().extend(pages);
                }
                Entry::Vacant(entry) => {
                    entry.insert(pages);
                }
            }
        }

        Ok(Segmentation {
            questions,
            warnings,
        })
    }

    /// Determine where a question's content ends.
    fn boundary_for(
        &self,
        number: u32,
        current: &LabelMatch,
        next: Option<&LabelMatch>,
        warnings: &mut Vec<SegmentWarning>,
    ) -> Boundary {
        match next {
            Some(next) => {
                // An end-of-section marker strictly before the next
                // question ends this question early. The window is
                // half-open: [current.page, next.page).
                let mut qualifying = self
                    .labels
                    .end_of_section
                    .iter()
                    .filter(|m| current.page <= m.page && m.page < next.page);

                match qualifying.next() {
                    Some(first) => {
                        let extra = qualifying.count();
                        if extra > 0 {
                            log::warn!(
                                "{} end-of-section markers qualify as the boundary for \
                                 question {}; using the first (page {})",
                                extra + 1,
                                number,
                                first.page
                            );
                            warnings.push(SegmentWarning::AmbiguousBoundary {
                                question: number,
                                page: first.page,
                                candidates: extra + 1,
                            });
                        }
                        Boundary::SectionEnd(first.page + 1)
                    }
                    None => Boundary::NextQuestion(next.page),
                }
            }
            // Last question of the document: the final end-of-section
            // marker bounds it, or a sentinel one past the last page.
            None => match self.labels.end_of_section.last() {
                Some(last) => Boundary::SectionEnd(last.page + 1),
                None => Boundary::EndOfDocument(self.page_count),
            },
        }
    }

    /// Page slices from the question's marker down to the boundary.
    fn emit_pages(&self, current: &LabelMatch, end_page: usize) -> Vec<PageData> {
        let default = self.geometry.default_viewport();

        // The first page starts exactly at the question label's top edge.
        let mut pages = vec![PageData::new(
            current.page,
            Viewport::new(current.y1, default.y2),
        )];
        for page in (current.page + 1)..end_page {
            pages.push(PageData::new(
                page,
                self.geometry.continuation_viewport(page),
            ));
        }
        pages
    }
}

/// Pair each item with its successor; the last item pairs with `None`.
fn with_next<T>(items: &[T]) -> impl Iterator<Item = (&T, Option<&T>)> {
    items
        .iter()
        .enumerate()
        .map(move |(i, item)| (item, items.get(i + 1)))
}
