//! Page source abstraction layer.
//!
//! The classification pipeline only needs, per page, the extracted text lines
//! and the list of embedded images. [`PageSource`] isolates that contract from
//! the concrete PDF library; [`LopdfSource`] implements it on top of lopdf.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};
use serde::{Deserialize, Serialize};

use super::layout;
use crate::error::{Error, Result};

/// An embedded image as reported by the page source.
///
/// Only the count and order of descriptors matter to the pipeline; the
/// remaining fields are informational.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// Resource name of the image (e.g. "Im1")
    #[serde(default)]
    pub name: String,
    /// Width in pixels
    #[serde(default)]
    pub width: Option<u32>,
    /// Height in pixels
    #[serde(default)]
    pub height: Option<u32>,
}

impl ImageDescriptor {
    /// Create a descriptor with only a resource name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set pixel dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// Upstream provider of per-page text lines and images.
pub trait PageSource {
    /// Page numbers (1-indexed) in document order.
    fn page_numbers(&self) -> Vec<u32>;

    /// Raw text lines of a page, in reading order. Lines need not be trimmed.
    fn lines(&self, page: u32) -> Result<Vec<String>>;

    /// Embedded images of a page, in resource order.
    fn images(&self, page: u32) -> Result<Vec<ImageDescriptor>>;
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn page_numbers(&self) -> Vec<u32> {
        (**self).page_numbers()
    }

    fn lines(&self, page: u32) -> Result<Vec<String>> {
        (**self).lines(page)
    }

    fn images(&self, page: u32) -> Result<Vec<ImageDescriptor>> {
        (**self).images(page)
    }
}

// ---------------------------------------------------------------------------
// LopdfSource: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

/// How deep to follow Form XObjects and `/Parent` links.
const MAX_NESTING: usize = 16;

/// Concrete [`PageSource`] backed by `lopdf::Document`.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfSource {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    /// Load from a reader.
    pub fn load_reader<R: std::io::Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_bytes(&data)
    }

    fn from_document(doc: LopdfDocument) -> Self {
        if doc.is_encrypted() {
            log::warn!("document is encrypted; page text may be unreadable");
        }
        let pages = doc.get_pages();
        Self { doc, pages }
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.pages.len() as u32))
    }

    /// Resolve an object to a dictionary, following one reference.
    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Dictionary(d) => Some(d),
            Object::Stream(s) => Some(&s.dict),
            Object::Reference(r) => match self.doc.get_object(*r).ok()? {
                Object::Dictionary(d) => Some(d),
                Object::Stream(s) => Some(&s.dict),
                _ => None,
            },
            _ => None,
        }
    }

    /// The page's resource dictionary, inherited from ancestors if needed.
    fn page_resources(&self, page_id: ObjectId) -> Option<&Dictionary> {
        let mut node = self.doc.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_NESTING {
            if let Ok(res) = node.get(b"Resources") {
                return self.resolve_dict(res);
            }
            let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
            node = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    /// Collect image XObjects, descending into Form XObjects.
    fn collect_images(
        &self,
        resources: &Dictionary,
        depth: usize,
        seen_forms: &mut HashSet<ObjectId>,
        out: &mut Vec<ImageDescriptor>,
    ) {
        let Some(xobjects) = resources
            .get(b"XObject")
            .ok()
            .and_then(|x| self.resolve_dict(x))
        else {
            return;
        };

        for (name, obj) in xobjects.iter() {
            let Ok(obj_ref) = obj.as_reference() else {
                continue;
            };
            let Ok(Object::Stream(stream)) = self.doc.get_object(obj_ref) else {
                continue;
            };
            let dict = &stream.dict;
            let subtype = dict.get(b"Subtype").and_then(|s| s.as_name()).ok();

            match subtype {
                Some(b"Image") => {
                    let dimension = |key: &[u8]| {
                        dict.get(key)
                            .ok()
                            .and_then(|v| v.as_i64().ok())
                            .and_then(|v| u32::try_from(v).ok())
                    };
                    out.push(ImageDescriptor {
                        name: String::from_utf8_lossy(name).to_string(),
                        width: dimension(b"Width"),
                        height: dimension(b"Height"),
                    });
                }
                Some(b"Form") if depth < MAX_NESTING && seen_forms.insert(obj_ref) => {
                    if let Some(form_res) = dict
                        .get(b"Resources")
                        .ok()
                        .and_then(|r| self.resolve_dict(r))
                    {
                        self.collect_images(form_res, depth + 1, seen_forms, out);
                    }
                }
                _ => {}
            }
        }
    }
}

impl PageSource for LopdfSource {
    fn page_numbers(&self) -> Vec<u32> {
        self.pages.keys().copied().collect()
    }

    fn lines(&self, page: u32) -> Result<Vec<String>> {
        let page_id = self.page_id(page)?;
        let spans = layout::extract_page_spans(&self.doc, page_id).map_err(|e| match e {
            Error::TextExtract(msg) => Error::TextExtract(format!("Page {}: {}", page, msg)),
            other => other,
        })?;
        Ok(layout::group_lines(spans))
    }

    fn images(&self, page: u32) -> Result<Vec<ImageDescriptor>> {
        let page_id = self.page_id(page)?;
        let mut images = Vec::new();
        if let Some(resources) = self.page_resources(page_id) {
            self.collect_images(resources, 0, &mut HashSet::new(), &mut images);
        }
        Ok(images)
    }
}
