// PDF text extraction backed by lopdf

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, warn};

use super::TextExtractor;
use crate::types::{AppError, AppResult};

/// US Letter, used when no MediaBox is found in the page tree.
const DEFAULT_MEDIA_BOX: (f32, f32) = (612.0, 792.0);
const MAX_PAGE_TREE_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub page_number: u32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    pub fn new() -> Self {
        Self
    }

    fn load(bytes: &[u8]) -> AppResult<Document> {
        if bytes.is_empty() {
            return Err(AppError::Extraction("document is empty".to_string()));
        }
        let doc = Document::load_mem(bytes)
            .map_err(|e| AppError::Extraction(format!("invalid pdf: {}", e)))?;
        if doc.get_pages().is_empty() {
            return Err(AppError::Extraction("document has no pages".to_string()));
        }
        Ok(doc)
    }

    /// MediaBox dimensions of every page, in page order.
    pub fn page_sizes(&self, bytes: &[u8]) -> AppResult<Vec<PageSize>> {
        let doc = Self::load(bytes)?;
        Ok(doc
            .get_pages()
            .into_iter()
            .map(|(page_number, page_id)| {
                let (width, height) = media_box(&doc, page_id).unwrap_or(DEFAULT_MEDIA_BOX);
                PageSize {
                    page_number,
                    width,
                    height,
                }
            })
            .collect())
    }
}

impl TextExtractor for LopdfExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> AppResult<Vec<String>> {
        let doc = Self::load(bytes)?;
        let pages = doc.get_pages();
        debug!(pages = pages.len(), bytes = bytes.len(), "Extracting PDF text");

        let texts = pages
            .keys()
            .map(|&page_number| match doc.extract_text(&[page_number]) {
                Ok(text) => text,
                Err(e) => {
                    warn!(page_number, error = %e, "Could not decode page text");
                    String::new()
                }
            })
            .collect();

        Ok(texts)
    }
}

/// Width and height of a page, following `Parent` links for inherited boxes.
fn media_box(doc: &Document, page_id: ObjectId) -> Option<(f32, f32)> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Some(size) = dict.get(b"MediaBox").ok().and_then(|obj| box_size(doc, obj)) {
            return Some(size);
        }
        dict = parent(doc, dict)?;
    }
    None
}

fn parent<'a>(doc: &'a Document, dict: &Dictionary) -> Option<&'a Dictionary> {
    let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
    doc.get_dictionary(parent_id).ok()
}

fn box_size(doc: &Document, obj: &Object) -> Option<(f32, f32)> {
    let obj = match obj.as_reference() {
        Ok(id) => doc.get_object(id).ok()?,
        Err(_) => obj,
    };
    let coords: Vec<f32> = obj.as_array().ok()?.iter().filter_map(number).collect();
    if coords.len() != 4 {
        return None;
    }
    let width = (coords[2] - coords[0]).abs();
    let height = (coords[3] - coords[1]).abs();
    (width > 0.0 && height > 0.0).then_some((width, height))
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}
