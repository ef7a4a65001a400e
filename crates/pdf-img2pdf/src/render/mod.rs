//! PDF rendering modules for image pages
//!
//! This module handles all PDF-specific operations:
//! - Creating image XObjects from JPEG streams
//! - Building output pages that draw one image each
//! - Assembling the page tree and catalog

mod document;
mod page;
mod xobject;

pub use document::*;
pub use page::*;
pub use xobject::create_image_xobject;
