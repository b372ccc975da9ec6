//! Positioned text extraction from PDF content streams.
//!
//! Walks each page's content stream with lopdf, decodes text runs with the
//! page font's encoding, and assembles them into the layout tree consumed
//! by the text finder: spans grouped into lines by baseline, lines grouped
//! into container boxes by vertical gap.

use lopdf::{Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::layout::node::{BBox, LayoutNode, LayoutPage};

/// Approximate ascender height as a fraction of font size.
const ASCENT_RATIO: f32 = 0.8;
/// Approximate descender depth as a fraction of font size.
const DESCENT_RATIO: f32 = 0.2;
/// Fallback glyph width as a fraction of font size.
const GLYPH_WIDTH_RATIO: f32 = 0.5;
/// Baseline distance (in font sizes) within which spans share a line.
const LINE_TOLERANCE: f32 = 0.5;
/// Baseline gap (in font sizes) beyond which lines start a new box.
const BOX_GAP: f32 = 1.8;

/// A decoded text run with position and size.
#[derive(Debug, Clone)]
struct TextSpan {
    text: String,
    x: f32,
    y: f32,
    width: f32,
    font_size: f32,
}

/// Tracks the text position across content stream operations.
///
/// Only translation and uniform scale are honored; rotated or skewed text
/// matrices are outside the single-column horizontal-text assumption.
#[derive(Debug, Clone, Copy)]
struct TextCursor {
    x: f32,
    y: f32,
    line_x: f32,
    line_y: f32,
    scale: f32,
    leading: f32,
}

impl Default for TextCursor {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            line_x: 0.0,
            line_y: 0.0,
            scale: 1.0,
            leading: 0.0,
        }
    }
}

impl TextCursor {
    fn set_matrix(&mut self, a: f32, _b: f32, _c: f32, d: f32, e: f32, f: f32) {
        self.scale = if a != 0.0 { a.abs() } else { d.abs().max(1.0) };
        self.line_x = e;
        self.line_y = f;
        self.x = e;
        self.y = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_x += tx * self.scale;
        self.line_y += ty * self.scale;
        self.x = self.line_x;
        self.y = self.line_y;
    }

    fn next_line(&mut self) {
        self.line_y -= self.leading * self.scale;
        self.x = self.line_x;
        self.y = self.line_y;
    }
}

/// Extract the full layout tree for a document, one page at a time.
pub(crate) fn extract_pages(doc: &LopdfDocument) -> Result<Vec<LayoutPage>> {
    let page_ids = doc.get_pages();
    let mut pages = Vec::with_capacity(page_ids.len());

    for (index, (_page_num, page_id)) in page_ids.iter().enumerate() {
        let (width, height) = page_dimensions(doc, *page_id);
        let spans = extract_page_spans(doc, *page_id)?;
        let lines = group_spans_into_lines(spans);
        let nodes = group_lines_into_boxes(lines);
        pages.push(LayoutPage {
            index,
            width,
            height,
            nodes,
        });
    }

    Ok(pages)
}

/// Page dimensions from the MediaBox, defaulting to A4.
fn page_dimensions(doc: &LopdfDocument, page_id: ObjectId) -> (f32, f32) {
    if let Ok(page_dict) = doc.get_dictionary(page_id) {
        if let Ok(media_box) = page_dict.get(b"MediaBox") {
            if let Ok(array) = media_box.as_array() {
                if array.len() >= 4 {
                    let width = array[2].as_float().unwrap_or(595.0);
                    let height = array[3].as_float().unwrap_or(842.0);
                    return (width, height);
                }
            }
        }
    }
    (595.0, 842.0)
}

/// Decode one page's content stream into positioned text spans.
fn extract_page_spans(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<TextSpan>> {
    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
    let content_data = page_content(doc, page_id)?;
    let content = lopdf::content::Content::decode(&content_data)
        .map_err(|e| Error::DocumentRead(e.to_string()))?;

    let mut spans = Vec::new();
    let mut cursor = TextCursor::default();
    let mut current_font: Vec<u8> = Vec::new();
    let mut font_size: f32 = 12.0;
    let mut in_text_block = false;

    for op in content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text_block = true;
                cursor = TextCursor::default();
            }
            "ET" => {
                in_text_block = false;
            }
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Object::Name(name) = &op.operands[0] {
                        current_font = name.clone();
                    }
                    font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                }
            }
            "TL" => {
                if let Some(l) = op.operands.first().and_then(get_number) {
                    cursor.leading = l;
                }
            }
            "Td" => {
                if op.operands.len() >= 2 {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    cursor.translate(tx, ty);
                }
            }
            "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    cursor.leading = -ty;
                    cursor.translate(tx, ty);
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    cursor.set_matrix(
                        get_number(&op.operands[0]).unwrap_or(1.0),
                        get_number(&op.operands[1]).unwrap_or(0.0),
                        get_number(&op.operands[2]).unwrap_or(0.0),
                        get_number(&op.operands[3]).unwrap_or(1.0),
                        get_number(&op.operands[4]).unwrap_or(0.0),
                        get_number(&op.operands[5]).unwrap_or(0.0),
                    );
                }
            }
            "T*" => {
                cursor.next_line();
            }
            "Tj" | "TJ" => {
                if in_text_block {
                    let text = decode_show_text(doc, page_id, &fonts, &current_font, &op);
                    push_span(&mut spans, text, &cursor, font_size);
                }
            }
            "'" | "\"" => {
                cursor.next_line();
                if in_text_block {
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let text = decode_bytes(doc, page_id, &fonts, &current_font, bytes);
                        push_span(&mut spans, text, &cursor, font_size);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

/// Decoded, NFKC-normalized text of a Tj/TJ operation.
fn decode_show_text(
    doc: &LopdfDocument,
    page_id: ObjectId,
    fonts: &std::collections::BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    font_name: &[u8],
    op: &lopdf::content::Operation,
) -> String {
    if op.operator == "TJ" {
        // TJ interleaves strings with kerning adjustments; large negative
        // adjustments stand in for word spaces.
        let mut combined = String::new();
        if let Some(Object::Array(arr)) = op.operands.first() {
            for item in arr {
                match item {
                    Object::String(bytes, _) => {
                        combined.push_str(&decode_bytes(doc, page_id, fonts, font_name, bytes));
                    }
                    Object::Integer(n) => {
                        if (-(*n as f32)) > 200.0 && !combined.ends_with(' ') {
                            combined.push(' ');
                        }
                    }
                    Object::Real(n) => {
                        if -n > 200.0 && !combined.ends_with(' ') {
                            combined.push(' ');
                        }
                    }
                    _ => {}
                }
            }
        }
        combined
    } else if let Some(Object::String(bytes, _)) = op.operands.first() {
        decode_bytes(doc, page_id, fonts, font_name, bytes)
    } else {
        String::new()
    }
}

/// Decode a text byte sequence using the current font's encoding, falling
/// back to simple decoding when the encoding is unavailable.
fn decode_bytes(
    doc: &LopdfDocument,
    _page_id: ObjectId,
    fonts: &std::collections::BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    font_name: &[u8],
    bytes: &[u8],
) -> String {
    let decoded = fonts
        .get(font_name)
        .and_then(|f| f.get_font_encoding(doc).ok())
        .and_then(|enc| LopdfDocument::decode_text(&enc, bytes).ok())
        .unwrap_or_else(|| decode_text_simple(bytes));
    decoded.nfkc().collect()
}

/// Simple text decoding fallback when no encoding is available.
pub(crate) fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1 fallback
    bytes.iter().map(|&b| b as char).collect()
}

fn push_span(spans: &mut Vec<TextSpan>, text: String, cursor: &TextCursor, font_size: f32) {
    if text.trim().is_empty() {
        return;
    }
    let effective_size = font_size * cursor.scale;
    let width = text.chars().count() as f32 * effective_size * GLYPH_WIDTH_RATIO;
    spans.push(TextSpan {
        text,
        x: cursor.x,
        y: cursor.y,
        width,
        font_size: effective_size,
    });
}

/// Raw (decompressed) content stream bytes for a page.
fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::DocumentRead(e.to_string()))?;

    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        // A page with no content stream is simply blank.
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        Object::Reference(r) => {
            if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                return s
                    .get_plain_content()
                    .map_err(|e| Error::DocumentRead(e.to_string()));
            }
            Err(Error::DocumentRead("Invalid content stream".to_string()))
        }
        Object::Array(arr) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Object::Reference(r) = obj {
                    if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                        if let Ok(data) = s.get_plain_content() {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                    }
                }
            }
            Ok(content)
        }
        Object::Stream(s) => s
            .get_plain_content()
            .map_err(|e| Error::DocumentRead(e.to_string())),
        _ => Err(Error::DocumentRead("Invalid content stream".to_string())),
    }
}

/// Group spans into text lines by baseline, top of page first.
fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<LayoutNode> {
    if spans.is_empty() {
        return Vec::new();
    }

    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<Vec<TextSpan>> = Vec::new();
    for span in spans {
        match lines.last_mut() {
            Some(line)
                if (line[0].y - span.y).abs() <= line[0].font_size * LINE_TOLERANCE =>
            {
                line.push(span);
            }
            _ => lines.push(vec![span]),
        }
    }

    lines.into_iter().map(line_node).collect()
}

/// Build a text-line node from the spans sharing a baseline.
fn line_node(mut spans: Vec<TextSpan>) -> LayoutNode {
    spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

    let mut text = String::new();
    for (i, span) in spans.iter().enumerate() {
        if i > 0 {
            let prev = &spans[i - 1];
            let gap = span.x - (prev.x + prev.width);
            let gap_threshold = span.font_size * GLYPH_WIDTH_RATIO * 0.4;
            if gap > gap_threshold && !text.ends_with(' ') && !span.text.starts_with(' ') {
                text.push(' ');
            }
        }
        text.push_str(&span.text);
    }

    let x1 = spans
        .iter()
        .map(|s| s.x)
        .fold(f32::INFINITY, f32::min);
    let x2 = spans
        .iter()
        .map(|s| s.x + s.width)
        .fold(f32::NEG_INFINITY, f32::max);
    let y = spans[0].y;
    let size = spans
        .iter()
        .map(|s| s.font_size)
        .fold(f32::NEG_INFINITY, f32::max);

    LayoutNode::TextLine {
        text: text.trim_end().to_string(),
        bbox: BBox::new(x1, x2, y + size * ASCENT_RATIO, y - size * DESCENT_RATIO),
    }
}

/// Group consecutive lines into container boxes by vertical gap.
fn group_lines_into_boxes(lines: Vec<LayoutNode>) -> Vec<LayoutNode> {
    let mut boxes: Vec<Vec<LayoutNode>> = Vec::new();

    for line in lines {
        let line_bbox = match line.bbox() {
            Some(b) => b,
            None => continue,
        };
        let starts_new_box = match boxes.last().and_then(|b| b.last()).and_then(|l| l.bbox()) {
            Some(prev) => {
                let line_height = prev.y1 - prev.y2;
                prev.y2 - line_bbox.y1 > line_height * BOX_GAP
            }
            None => true,
        };
        if starts_new_box {
            boxes.push(vec![line]);
        } else {
            // last() above guarantees a current box exists
            boxes.last_mut().expect("current box").push(line);
        }
    }

    boxes
        .into_iter()
        .map(|children| LayoutNode::Container { children })
        .collect()
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
