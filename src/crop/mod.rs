//! Page cropping and reassembly.
//!
//! Consumes the segmentation engine's output: for each page slice, copies
//! the source page into a fresh document and clamps its page boxes to the
//! slice's viewport, then assembles the slices of one question into a
//! standalone document. Viewport coordinates are interpreted in the same
//! page space the segmentation engine computed them in.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lopdf::{dictionary, Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use crate::error::{Error, Result};
use crate::model::{PageData, Segmentation, Viewport};

/// Assembles cropped page slices into standalone PDF documents.
pub struct PdfAssembler {
    source: LopdfDocument,
}

impl PdfAssembler {
    /// Open a source PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = LopdfDocument::load(path).map_err(Error::from)?;
        Ok(Self { source })
    }

    /// Use a source PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let source = LopdfDocument::load_mem(data).map_err(Error::from)?;
        Ok(Self { source })
    }

    /// Use an already-loaded lopdf document as the source.
    pub fn from_document(source: LopdfDocument) -> Self {
        Self { source }
    }

    /// Build one output document from a question's ordered page slices.
    pub fn assemble(&self, slices: &[PageData]) -> Result<LopdfDocument> {
        let src_pages = self.source.get_pages();
        let page_total = src_pages.len();

        let mut out = LopdfDocument::with_version("1.7");
        let pages_id = out.new_object_id();
        // reserve the id so copied objects allocated below don't collide
        out.objects.insert(pages_id, Object::Null);

        let mut kids: Vec<Object> = Vec::with_capacity(slices.len());
        for slice in slices {
            let page_number = (slice.page + 1) as u32;
            let src_id = *src_pages
                .get(&page_number)
                .ok_or(Error::PageOutOfRange(slice.page, page_total))?;
            let page_id = self.copy_page(src_id, pages_id, slice.viewport, &mut out)?;
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        out.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Object::Array(kids),
                "Count" => count,
            }),
        );

        let catalog_id = out.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        out.trailer.set("Root", catalog_id);

        Ok(out)
    }

    /// Build one document per question id.
    pub fn split(&self, segmentation: &Segmentation) -> Result<BTreeMap<u32, LopdfDocument>> {
        let mut documents = BTreeMap::new();
        for (question, pages) in &segmentation.questions {
            log::debug!("assembling question {} ({} pages)", question, pages.len());
            documents.insert(*question, self.assemble(pages)?);
        }
        Ok(documents)
    }

    /// Copy one source page into `out`, clipped to `viewport`.
    fn copy_page(
        &self,
        src_id: ObjectId,
        parent: ObjectId,
        viewport: Viewport,
        out: &mut LopdfDocument,
    ) -> Result<ObjectId> {
        let page_dict = self.source.get_dictionary(src_id).map_err(Error::from)?;
        let width = self.page_width(src_id);

        let new_id = out.new_object_id();
        out.objects.insert(new_id, Object::Null);

        let mut map = HashMap::new();
        map.insert(src_id, new_id);

        let mut copied = Dictionary::new();
        for (key, value) in page_dict.iter() {
            if key.as_slice() == b"Parent" {
                continue;
            }
            copied.set(key.clone(), self.copy_value(value, out, &mut map)?);
        }
        copied.set("Parent", Object::Reference(parent));

        // The original's trim-box crop: keep content between the viewport
        // bounds, full page width.
        let clip = Object::Array(vec![
            Object::Real(0.0),
            Object::Real(viewport.y2),
            Object::Real(width),
            Object::Real(viewport.y1),
        ]);
        copied.set("MediaBox", clip.clone());
        copied.set("CropBox", clip.clone());
        copied.set("TrimBox", clip);

        out.objects.insert(new_id, Object::Dictionary(copied));
        Ok(new_id)
    }

    /// Deep-copy a referenced object into `out`, reusing already-copied ids.
    fn copy_object(
        &self,
        src_id: ObjectId,
        out: &mut LopdfDocument,
        map: &mut HashMap<ObjectId, ObjectId>,
    ) -> Result<ObjectId> {
        if let Some(id) = map.get(&src_id) {
            return Ok(*id);
        }

        let new_id = out.new_object_id();
        out.objects.insert(new_id, Object::Null);
        map.insert(src_id, new_id);

        let value = self.source.get_object(src_id).map_err(Error::from)?;
        let copied = match value {
            // Parent links are dropped so a copy never drags the source
            // page tree along with it.
            Object::Dictionary(dict) => {
                let mut c = Dictionary::new();
                for (key, v) in dict.iter() {
                    if key.as_slice() == b"Parent" {
                        continue;
                    }
                    c.set(key.clone(), self.copy_value(v, out, map)?);
                }
                Object::Dictionary(c)
            }
            other => self.copy_value(other, out, map)?,
        };

        out.objects.insert(new_id, copied);
        Ok(new_id)
    }

    /// Deep-copy an object value, rewriting references into `out`.
    fn copy_value(
        &self,
        value: &Object,
        out: &mut LopdfDocument,
        map: &mut HashMap<ObjectId, ObjectId>,
    ) -> Result<Object> {
        match value {
            Object::Reference(id) => Ok(Object::Reference(self.copy_object(*id, out, map)?)),
            Object::Array(items) => {
                let copied = items
                    .iter()
                    .map(|item| self.copy_value(item, out, map))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Object::Array(copied))
            }
            Object::Dictionary(dict) => {
                let mut copied = Dictionary::new();
                for (key, v) in dict.iter() {
                    copied.set(key.clone(), self.copy_value(v, out, map)?);
                }
                Ok(Object::Dictionary(copied))
            }
            Object::Stream(stream) => {
                let mut dict = Dictionary::new();
                for (key, v) in stream.dict.iter() {
                    copied_stream_key(&mut dict, key, self.copy_value(v, out, map)?);
                }
                Ok(Object::Stream(Stream::new(dict, stream.content.clone())))
            }
            other => Ok(other.clone()),
        }
    }

    /// Page width from the MediaBox, which may be inherited from an
    /// ancestor Pages node.
    fn page_width(&self, src_id: ObjectId) -> f32 {
        let mut id = src_id;
        loop {
            let dict = match self.source.get_dictionary(id) {
                Ok(d) => d,
                Err(_) => break,
            };
            if let Ok(media_box) = dict.get(b"MediaBox") {
                if let Ok(array) = media_box.as_array() {
                    if array.len() >= 4 {
                        return array[2].as_float().unwrap_or(595.0);
                    }
                }
            }
            match dict.get(b"Parent").and_then(|p| p.as_reference()) {
                Ok(parent) => id = parent,
                Err(_) => break,
            }
        }
        595.0
    }
}

fn copied_stream_key(dict: &mut Dictionary, key: &[u8], value: Object) {
    // Stream::new recomputes Length from the carried content
    if key != b"Length" {
        dict.set(key.to_vec(), value);
    }
}
