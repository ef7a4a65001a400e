//! File I/O around conversion

use crate::types::*;
use std::path::Path;

/// Read a single image file into memory.
///
/// The file is not decoded here; undecodable files fail during conversion.
pub async fn load_image(path: impl AsRef<Path>) -> Result<ImageSource> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(ImageSource::new(name, bytes))
}

/// Read multiple image files, keeping their order
pub async fn load_images(paths: &[impl AsRef<Path>]) -> Result<Vec<ImageSource>> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        images.push(load_image(path).await?);
    }
    Ok(images)
}

/// Write the finished PDF
pub async fn save_pdf(pdf: &[u8], path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::write(path, pdf).await?;
    Ok(())
}
