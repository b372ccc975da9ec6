//! Data model for document segmentation.
//!
//! This module defines the types that flow through the pipeline: label
//! matches produced by marker extraction, the per-category label store,
//! and the page/viewport output consumed by page cropping.

mod label;
mod viewport;

pub use label::{LabelCategory, LabelMatch, LabelStore};
pub use viewport::{PageData, SegmentWarning, Segmentation, Viewport};
