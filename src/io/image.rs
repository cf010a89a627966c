//! Raster loading, PNG encoding and canvas persistence

use crate::io::configuration::OUTPUT_EXTENSION;
use crate::io::error::{OutpaintError, Result};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Load any supported raster as RGBA
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).map_err(|e| OutpaintError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(image.to_rgba8())
}

/// Encode an RGBA raster as PNG bytes
///
/// # Errors
///
/// Returns an error if PNG encoding fails
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(|e| OutpaintError::ImageCodec {
            operation: "PNG encoding",
            source: e,
        })?;
    Ok(bytes.into_inner())
}

/// Decode raster bytes of any supported format into RGBA
///
/// # Errors
///
/// Returns an error if the format is unknown or the data is corrupt
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage> {
    let image = image::load_from_memory(bytes).map_err(|e| OutpaintError::ImageCodec {
        operation: "image decoding",
        source: e,
    })?;
    Ok(image.to_rgba8())
}

/// Write a raster as PNG, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| OutpaintError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| OutpaintError::ImageExport {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Deterministic snapshot path: `<stem>-<timestamp>-<sequence>.png` beside the output
pub fn snapshot_path(output: &Path, timestamp: &str, sequence: usize) -> PathBuf {
    let stem = output.file_stem().unwrap_or_default().to_string_lossy();
    let name = format!("{stem}-{timestamp}-{sequence:04}.{OUTPUT_EXTENSION}");

    match output.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}
