//! Encoding and decoding helpers for grayscale frames.
//!
//! - `decode_image`: any format the `image` crate understands, to 8-bit gray.
//! - `encode_png`: owned gray buffer to PNG bytes (reply payloads).
//! - `load_grayscale_image` / `save_grayscale_u8`: the same on disk.
use super::GrayImageU8;
use crate::error::Result;
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Decode encoded image bytes into a grayscale buffer.
pub fn decode_image(bytes: &[u8]) -> Result<GrayImageU8> {
    let img = image::load_from_memory(bytes)?.into_luma8();
    Ok(GrayImageU8::from_gray_image(img))
}

/// Encode a grayscale buffer as PNG.
pub fn encode_png(buffer: &GrayImageU8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(buffer.to_gray_image()?)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Load an image from disk and convert to 8-bit grayscale.
pub fn load_grayscale_image(path: &Path) -> Result<GrayImageU8> {
    let img = image::open(path)?.into_luma8();
    Ok(GrayImageU8::from_gray_image(img))
}

/// Save an 8-bit grayscale buffer, format chosen from the extension.
pub fn save_grayscale_u8(buffer: &GrayImageU8, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    buffer.to_gray_image()?.save(path)?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
