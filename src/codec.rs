//! Reading and writing image files.
//!
//! The sorting core only sees [`PixelGrid`]s; this module is the boundary
//! to the filesystem.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with guessed format |
//! | Expand to 16-bit RGBA | `DynamicImage::into_rgba16` |
//! | Encode PNG / TIFF | 16-bit RGBA, written as-is |
//! | Encode JPEG | converted to 8-bit RGB (JPEG has neither alpha nor 16-bit) |
//!
//! Decode and encode failures keep the underlying `image::ImageError` as
//! their source so the caller sees the codec's own message.

use crate::grid::PixelGrid;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("Unrecognised image format: {0}")]
    UnknownFormat(PathBuf),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Output formats with a working encoder.
const WRITABLE: &[(&str, ImageFormat)] = &[
    ("png", ImageFormat::Png),
    ("jpeg", ImageFormat::Jpeg),
    ("jpg", ImageFormat::Jpeg),
    ("tiff", ImageFormat::Tiff),
    ("tif", ImageFormat::Tiff),
];

/// A decoded image and the format tag of its container.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub grid: PixelGrid,
    /// Lowercase format name, e.g. `"png"`, `"jpg"`, `"tiff"`, `"webp"`.
    pub format: String,
}

/// Canonical lowercase name of a format, used as the output extension.
pub fn format_tag(format: ImageFormat) -> String {
    format
        .extensions_str()
        .first()
        .copied()
        .unwrap_or("bin")
        .to_string()
}

/// Decode an image file into a 16-bit RGBA grid.
///
/// The format is detected from the file contents, falling back to the
/// extension.
pub fn decode_image(path: &Path) -> Result<DecodedImage, CodecError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader
        .format()
        .ok_or_else(|| CodecError::UnknownFormat(path.to_path_buf()))?;
    let image = reader.decode().map_err(|source| CodecError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(DecodedImage {
        grid: image.into_rgba16(),
        format: format_tag(format),
    })
}

/// Resolve a format tag to an encodable format.
pub fn writable_format(tag: &str) -> Result<ImageFormat, CodecError> {
    let tag = tag.to_ascii_lowercase();
    WRITABLE
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, fmt)| *fmt)
        .ok_or(CodecError::UnsupportedFormat(tag))
}

/// Encode `grid` to `path` in the format named by `tag`.
pub fn encode_image(path: &Path, grid: &PixelGrid, tag: &str) -> Result<(), CodecError> {
    let format = writable_format(tag)?;
    let image = match format {
        // JPEG carries neither alpha nor 16-bit samples.
        ImageFormat::Jpeg => {
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba16(grid.clone()).to_rgb8())
        }
        _ => DynamicImage::ImageRgba16(grid.clone()),
    };
    image
        .save_with_format(path, format)
        .map_err(|source| CodecError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

/// File locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub image: PathBuf,
    pub mask: PathBuf,
    pub span_overlay: PathBuf,
    pub span_list: PathBuf,
    /// Format tag used for `image` and `mask`.
    pub format: String,
}

impl OutputPaths {
    /// Name outputs inside `dir`. Images are PNG unless `preserve_format`
    /// is set, in which case `source_format` is used.
    pub fn new(dir: &Path, source_format: &str, preserve_format: bool) -> Self {
        let format = if preserve_format {
            source_format.to_ascii_lowercase()
        } else {
            "png".to_string()
        };
        Self {
            image: dir.join(format!("out.{format}")),
            mask: dir.join(format!("mask.{format}")),
            span_overlay: dir.join("spans.png"),
            span_list: dir.join("spans.json"),
            format,
        }
    }
}
