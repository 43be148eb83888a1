//! Writing sorted spans back into an image.
//!
//! [`compose`] starts from a copy of the source and overwrites only the
//! positions covered by spans. Spans from one detection pass never overlap,
//! so the order they are written in does not matter.

use crate::axis::ScanAxis;
use crate::grid::{self, PixelGrid};
use crate::sort::ColorSpan;
use crate::span::Span;
use serde::{Deserialize, Serialize};

/// What to write when a sorted pixel is fully transparent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TransparentPixels {
    /// Write opaque magenta so the pixel is visible in the output.
    #[default]
    Highlight,
    /// Write the transparent pixel as-is.
    Keep,
}

/// Build the output grid from `source` and its sorted spans.
pub fn compose(
    source: &PixelGrid,
    spans: &[ColorSpan],
    axis: ScanAxis,
    transparent: TransparentPixels,
) -> PixelGrid {
    let mut out = source.clone();

    for color_span in spans {
        for ((x, y), pixel) in color_span.span.coords(axis).zip(&color_span.pixels) {
            let value = if pixel[3] == 0 && transparent == TransparentPixels::Highlight {
                grid::MAGENTA
            } else {
                *pixel
            };
            out.put_pixel(x, y, value);
        }
    }

    out
}

/// Draw every span in magenta on a transparent grid of the given size.
///
/// Debug view of where sorting will happen, without sorting anything.
pub fn render_span_overlay(width: u32, height: u32, spans: &[Span], axis: ScanAxis) -> PixelGrid {
    let mut out = grid::filled(width, height, grid::TRANSPARENT);
    for span in spans {
        for (x, y) in span.coords(axis) {
            out.put_pixel(x, y, grid::MAGENTA);
        }
    }
    out
}
