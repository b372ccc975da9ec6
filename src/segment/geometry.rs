//! Default and continuation viewport computation.
//!
//! The default viewport is derived from aggregate statistics over the
//! matched labels: question labels bound the top of the content area,
//! "see next page" footers bound the bottom, and the recurring header's
//! most common position caps the top bound from above.

use crate::error::{Error, Result};
use crate::model::{LabelMatch, LabelStore, Viewport};

/// Fixed margin added above the detected question-label line so content
/// such as tall equations sticking out above the line is not clipped.
pub const PAGE_TOP_MARGIN: f32 = 20.0;

/// Per-document vertical bounds inferred from marker statistics.
#[derive(Debug, Clone)]
pub struct PageGeometry {
    default_viewport: Viewport,
    continued: Vec<LabelMatch>,
}

impl PageGeometry {
    /// Derive the default content viewport from the label store.
    ///
    /// Fails with [`Error::InsufficientData`] when no question labels
    /// exist, since there is nothing to segment.
    pub fn from_labels(labels: &LabelStore) -> Result<Self> {
        if labels.question.is_empty() {
            return Err(Error::InsufficientData);
        }

        let top_of_page = labels
            .question
            .iter()
            .map(|m| m.y2)
            .fold(f32::NEG_INFINITY, f32::max);

        let bottom_of_page = if labels.next_page.is_empty() {
            0.0
        } else {
            labels
                .next_page
                .iter()
                .map(|m| m.y2)
                .fold(f32::INFINITY, f32::min)
        };

        let top = top_of_page + PAGE_TOP_MARGIN;
        let y1 = match mode_y1(&labels.header) {
            Some(header_start) => top.min(header_start),
            None => top,
        };

        Ok(Self {
            default_viewport: Viewport::new(y1, bottom_of_page),
            continued: labels.question_continued.clone(),
        })
    }

    /// The viewport used for every page that is not a question's first page.
    pub fn default_viewport(&self) -> Viewport {
        self.default_viewport
    }

    /// Viewport for a page whose content carries over from a previous page.
    ///
    /// If the page opens with a "question N continued" banner, content
    /// starts at that banner's top edge instead of the default top bound.
    pub fn continuation_viewport(&self, page: usize) -> Viewport {
        let y1 = self
            .continued
            .iter()
            .find(|m| m.page == page)
            .map(|m| m.y1)
            .unwrap_or(self.default_viewport.y1);
        Viewport::new(y1, self.default_viewport.y2)
    }
}

/// Most frequent `y1` among the header matches, ties broken by the value
/// seen first. `None` when the header category is empty.
fn mode_y1(matches: &[LabelMatch]) -> Option<f32> {
    let mut counts: Vec<(f32, usize)> = Vec::new();
    for m in matches {
        match counts.iter_mut().find(|(v, _)| *v == m.y1) {
            Some(entry) => entry.1 += 1,
            None => counts.push((m.y1, 1)),
        }
    }

    let mut best: Option<(f32, usize)> = None;
    for (value, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((value, count)),
        }
    }
    best.map(|(value, _)| value)
}
