//! Layout tree node types.
//!
//! Text extraction produces one [`LayoutPage`] per document page, holding
//! a tree of [`LayoutNode`]s. Node capabilities (text content, bounding
//! box) are modeled as a tagged variant over node kinds rather than
//! runtime attribute probing.

/// Bounding box in page space (y increases upward, `y1 >= y2`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    /// Left edge
    pub x1: f32,
    /// Right edge
    pub x2: f32,
    /// Top edge
    pub y1: f32,
    /// Bottom edge
    pub y2: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x1: f32, x2: f32, y1: f32, y2: f32) -> Self {
        Self { x1, x2, y1, y2 }
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x1: self.x1.min(other.x1),
            x2: self.x2.max(other.x2),
            y1: self.y1.max(other.y1),
            y2: self.y2.min(other.y2),
        }
    }
}

/// A node in the layout tree.
#[derive(Debug, Clone)]
pub enum LayoutNode {
    /// A horizontal run of text with its bounding box.
    TextLine {
        /// Decoded line text
        text: String,
        /// Line bounding box
        bbox: BBox,
    },
    /// A grouping node (text box) holding children in visual order.
    Container {
        /// Child nodes
        children: Vec<LayoutNode>,
    },
}

impl LayoutNode {
    /// Text content, if this node carries any.
    pub fn text(&self) -> Option<&str> {
        match self {
            LayoutNode::TextLine { text, .. } => Some(text),
            LayoutNode::Container { .. } => None,
        }
    }

    /// Bounding box, if this node has one. For containers this is the
    /// union of the children's boxes.
    pub fn bbox(&self) -> Option<BBox> {
        match self {
            LayoutNode::TextLine { bbox, .. } => Some(*bbox),
            LayoutNode::Container { children } => {
                let mut boxes = children.iter().filter_map(|c| c.bbox());
                let first = boxes.next()?;
                Some(boxes.fold(first, |acc, b| acc.union(&b)))
            }
        }
    }

    /// Collect every text line under this node, depth first, preserving
    /// visual order.
    pub fn collect_lines<'a>(&'a self, out: &mut Vec<(&'a str, BBox)>) {
        match self {
            LayoutNode::TextLine { text, bbox } => out.push((text, *bbox)),
            LayoutNode::Container { children } => {
                for child in children {
                    child.collect_lines(out);
                }
            }
        }
    }
}

/// One page of layout nodes.
#[derive(Debug, Clone)]
pub struct LayoutPage {
    /// Zero-based page index
    pub index: usize,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Top-level nodes in visual order (top of page first)
    pub nodes: Vec<LayoutNode>,
}

impl LayoutPage {
    /// All text lines on the page, in visual order.
    pub fn text_lines(&self) -> Vec<(&str, BBox)> {
        let mut lines = Vec::new();
        for node in &self.nodes {
            node.collect_lines(&mut lines);
        }
        lines
    }
}
