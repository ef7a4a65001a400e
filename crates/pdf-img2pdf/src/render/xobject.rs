//! Image XObject creation
//!
//! JPEG streams are embedded as-is with the `DCTDecode` filter, so the
//! encoder's output is what ends up in the file.

use crate::compress::CompressedImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Add a JPEG image XObject to `output` and return its id.
pub fn create_image_xobject(output: &mut Document, image: &CompressedImage) -> ObjectId {
    let color_space: &[u8] = if image.greyscale {
        b"DeviceGray"
    } else {
        b"DeviceRGB"
    };

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(image.size.width as i64));
    dict.set("Height", Object::Integer(image.size.height as i64));
    dict.set("ColorSpace", Object::Name(color_space.to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));

    // Already compressed; never run it through Flate
    let stream = Stream::new(dict, image.data.clone()).with_compression(false);
    output.add_object(stream)
}
