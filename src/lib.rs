//! # examsplit
//!
//! Question-level segmentation and splitting of paginated exam PDFs.
//!
//! The library scans a document's text for marker phrases ("Question 3",
//! "Question 3 continued", "See next page", "End of Section A") and
//! computes, per question, the exact vertical region of each page that
//! belongs to it. The resulting mapping can be used directly, or fed to
//! the bundled assembler to crop and reassemble the pages into one
//! standalone PDF per question.
//!
//! ## Quick Start
//!
//! ```no_run
//! use examsplit::segment_file;
//!
//! fn main() -> examsplit::Result<()> {
//!     let segmentation = segment_file("exam.pdf")?;
//!
//!     for (question, pages) in &segmentation.questions {
//!         println!("question {}: {} page slices", question, pages.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Splitting into per-question documents
//!
//! ```no_run
//! use examsplit::split_file;
//!
//! # fn main() -> examsplit::Result<()> {
//! for (question, mut doc) in split_file("exam.pdf")? {
//!     doc.save(format!("question-{}.pdf", question))?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod crop;
pub mod error;
pub mod layout;
pub mod model;
pub mod segment;

// Re-export commonly used types
pub use crop::PdfAssembler;
pub use error::{Error, Result};
pub use layout::{BBox, LabelPattern, LayoutNode, LayoutPage, PdfTextFinder, TextFinder};
pub use model::{
    LabelCategory, LabelMatch, LabelStore, PageData, SegmentWarning, Segmentation, Viewport,
};
pub use segment::{
    segment, segment_with_options, PageGeometry, PatternSet, SegmentOptions, PAGE_TOP_MARGIN,
};

use std::collections::BTreeMap;
use std::path::Path;

/// Segment a PDF file into per-question page ranges.
///
/// # Example
///
/// ```no_run
/// use examsplit::segment_file;
///
/// let segmentation = segment_file("exam.pdf").unwrap();
/// println!("{} questions", segmentation.question_count());
/// ```
pub fn segment_file<P: AsRef<Path>>(path: P) -> Result<Segmentation> {
    segment_file_with_options(path, &SegmentOptions::default())
}

/// Segment a PDF file with custom options.
pub fn segment_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &SegmentOptions,
) -> Result<Segmentation> {
    let finder = PdfTextFinder::open(path)?;
    segment_with_options(&finder, options)
}

/// Segment a PDF from bytes.
pub fn segment_bytes(data: &[u8]) -> Result<Segmentation> {
    segment_bytes_with_options(data, &SegmentOptions::default())
}

/// Segment a PDF from bytes with custom options.
pub fn segment_bytes_with_options(data: &[u8], options: &SegmentOptions) -> Result<Segmentation> {
    let finder = PdfTextFinder::from_bytes(data)?;
    segment_with_options(&finder, options)
}

/// Split a PDF file into one document per question.
///
/// The returned documents are in memory; the caller decides where to save
/// them.
pub fn split_file<P: AsRef<Path>>(path: P) -> Result<BTreeMap<u32, lopdf::Document>> {
    split_file_with_options(path, &SegmentOptions::default())
}

/// Split a PDF file with custom options.
pub fn split_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &SegmentOptions,
) -> Result<BTreeMap<u32, lopdf::Document>> {
    let doc = lopdf::Document::load(path).map_err(Error::from)?;
    split_document(doc, options)
}

/// Split a PDF from bytes into one document per question.
pub fn split_bytes(data: &[u8]) -> Result<BTreeMap<u32, lopdf::Document>> {
    split_bytes_with_options(data, &SegmentOptions::default())
}

/// Split a PDF from bytes with custom options.
pub fn split_bytes_with_options(
    data: &[u8],
    options: &SegmentOptions,
) -> Result<BTreeMap<u32, lopdf::Document>> {
    let doc = lopdf::Document::load_mem(data).map_err(Error::from)?;
    split_document(doc, options)
}

fn split_document(
    doc: lopdf::Document,
    options: &SegmentOptions,
) -> Result<BTreeMap<u32, lopdf::Document>> {
    let finder = PdfTextFinder::from_document(&doc)?;
    let segmentation = segment_with_options(&finder, options)?;
    PdfAssembler::from_document(doc).split(&segmentation)
}
