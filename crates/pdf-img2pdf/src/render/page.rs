//! Output page rendering
//!
//! Each output page carries exactly one image, drawn at its computed
//! placement.

use crate::compress::CompressedImage;
use crate::constants::PAGE_IMAGE_NAME;
use crate::layout::{PageGeometry, Rect};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::xobject::create_image_xobject;

/// Render one image page.
///
/// # Arguments
/// * `output` - The output document
/// * `image` - The encoded image to embed
/// * `placement` - Where to draw the image, in points
/// * `geometry` - Page size shared by every page
/// * `parent_pages_id` - The parent Pages object ID
pub fn render_image_page(
    output: &mut Document,
    image: &CompressedImage,
    placement: &Rect,
    geometry: &PageGeometry,
    parent_pages_id: ObjectId,
) -> ObjectId {
    let xobject_id = create_image_xobject(output, image);

    let mut xobjects = Dictionary::new();
    xobjects.set(PAGE_IMAGE_NAME, Object::Reference(xobject_id));

    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let content = generate_draw_command(PAGE_IMAGE_NAME, placement);
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(geometry.page_width_pt),
            Object::Real(geometry.page_height_pt),
        ]),
    );
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    output.add_object(page_dict)
}

/// Generate the content stream that paints an image XObject into `rect`.
///
/// Image space is the unit square, so the matrix scales it to the draw
/// size and translates it to the lower-left corner.
pub fn generate_draw_command(xobject_name: &str, rect: &Rect) -> String {
    format!(
        "q {} 0 0 {} {} {} cm /{} Do Q\n",
        rect.width, rect.height, rect.x, rect.y, xobject_name
    )
}
