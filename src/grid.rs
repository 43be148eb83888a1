//! The in-memory pixel grid every stage reads and writes.
//!
//! Samples are straight (non-premultiplied) RGBA at 16 bits per channel.
//! 8-bit sources are expanded by ×257 on decode, so `0xFF` becomes `0xFFFF`
//! and luminance thresholds keep the same meaning regardless of the source
//! bit depth.

use image::{ImageBuffer, Rgba};

/// A width × height grid of 16-bit RGBA samples.
pub type PixelGrid = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// A single sample of a [`PixelGrid`].
pub type Pixel = Rgba<u16>;

/// Fully opaque white.
pub const WHITE: Pixel = Rgba([u16::MAX, u16::MAX, u16::MAX, u16::MAX]);

/// Fully opaque black.
pub const BLACK: Pixel = Rgba([0, 0, 0, u16::MAX]);

/// Fully opaque magenta, used to make spans and transparent pixels visible.
pub const MAGENTA: Pixel = Rgba([u16::MAX, 0, u16::MAX, u16::MAX]);

/// Fully transparent black.
pub const TRANSPARENT: Pixel = Rgba([0, 0, 0, 0]);

/// Allocate a grid of the given size filled with one color.
pub fn filled(width: u32, height: u32, pixel: Pixel) -> PixelGrid {
    ImageBuffer::from_pixel(width, height, pixel)
}
