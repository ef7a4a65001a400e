//! Output document assembly
//!
//! Pages are appended in call order; the page tree and catalog are written
//! once every page is known.

use crate::compress::CompressedImage;
use crate::layout::{PageGeometry, Rect};
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId};

use super::page::render_image_page;

/// Builds a document with one image per page
pub struct DocumentBuilder {
    output: Document,
    pages_tree_id: ObjectId,
    page_refs: Vec<Object>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        let mut output = Document::with_version("1.7");
        let pages_tree_id = output.new_object_id();
        Self {
            output,
            pages_tree_id,
            page_refs: Vec::new(),
        }
    }

    /// Append a page drawing `image` at `placement`
    pub fn add_image_page(
        &mut self,
        image: &CompressedImage,
        placement: &Rect,
        geometry: &PageGeometry,
    ) -> ObjectId {
        let page_id = render_image_page(
            &mut self.output,
            image,
            placement,
            geometry,
            self.pages_tree_id,
        );
        self.page_refs.push(Object::Reference(page_id));
        page_id
    }

    /// Write the page tree and catalog and hand back the document
    pub fn finish(self) -> Document {
        let Self {
            mut output,
            pages_tree_id,
            page_refs,
        } = self;

        // Create pages tree
        let count = page_refs.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(page_refs)),
            ("Count", Object::Integer(count)),
        ]);
        output
            .objects
            .insert(pages_tree_id, Object::Dictionary(pages_dict));

        // Create catalog
        let catalog_id = output.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_tree_id)),
        ]));

        output.trailer.set("Root", catalog_id);

        output
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a document to PDF bytes
pub fn document_to_bytes(mut doc: Document) -> Result<Vec<u8>> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}
