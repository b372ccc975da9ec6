//! Viewport and segmentation output types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A vertical slice of a page: keep content between `y1` (top bound) and
/// `y2` (bottom bound). Top is numerically larger, so `y1 >= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Top bound
    pub y1: f32,
    /// Bottom bound
    pub y2: f32,
}

impl Viewport {
    /// Create a new viewport.
    pub fn new(y1: f32, y2: f32) -> Self {
        Self { y1, y2 }
    }

    /// Vertical extent of the slice.
    pub fn height(&self) -> f32 {
        self.y1 - self.y2
    }
}

/// One page slice belonging to a question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    /// Zero-based page index
    pub page: usize,
    /// Vertical slice of that page
    pub viewport: Viewport,
}

impl PageData {
    /// Create a new page slice.
    pub fn new(page: usize, viewport: Viewport) -> Self {
        Self { page, viewport }
    }
}

/// Non-fatal diagnostic raised while segmenting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentWarning {
    /// More than one end-of-section marker qualified as the boundary for
    /// a question; the first in store order was used.
    AmbiguousBoundary {
        /// Question whose boundary was ambiguous
        question: u32,
        /// Page of the marker that was used
        page: usize,
        /// How many markers qualified
        candidates: usize,
    },
    /// A question number appeared again later in the document; its new
    /// pages were appended to the existing range.
    DuplicateQuestion {
        /// The recurring question number
        question: u32,
        /// Page where the number reappeared
        page: usize,
    },
}

/// Result of segmenting one document.
///
/// Only the order of each per-question page list is meaningful; the key
/// order of the map is not part of the contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segmentation {
    /// Question number → ordered page slices
    pub questions: BTreeMap<u32, Vec<PageData>>,
    /// Diagnostics raised during the run
    pub warnings: Vec<SegmentWarning>,
}

impl Segmentation {
    /// Number of questions found.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Page slices for one question, if present.
    pub fn get(&self, question: u32) -> Option<&[PageData]> {
        self.questions.get(&question).map(|v| v.as_slice())
    }

    /// Serialize to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
