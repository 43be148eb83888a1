//! Hue ordering within a span.
//!
//! A [`ColorSpan`] is a [`Span`] plus the source pixels it covers, copied out
//! in scan order. Sorting permutes those pixels and never touches the span's
//! coordinates, so the compositor can write the result straight back.

use crate::axis::ScanAxis;
use crate::grid::{Pixel, PixelGrid};
use crate::hue::hue_of;
use crate::span::Span;
use std::cmp::Reverse;

/// A span with its source pixels, in scan order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorSpan {
    pub span: Span,
    pub pixels: Vec<Pixel>,
}

impl ColorSpan {
    /// Copy the pixels covered by `span` out of `source`.
    pub fn materialize(span: Span, source: &PixelGrid, axis: ScanAxis) -> Self {
        let pixels = span
            .coords(axis)
            .map(|(x, y)| *source.get_pixel(x, y))
            .collect();
        Self { span, pixels }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Reorder a span's pixels by hue.
///
/// Highest hue first by default; `reverse` puts the lowest hue first. The sort
/// is stable, so pixels of equal hue keep their scan order. Spans of one pixel
/// or fewer come back unchanged.
pub fn sort_span(mut color_span: ColorSpan, reverse: bool) -> ColorSpan {
    if color_span.len() <= 1 {
        return color_span;
    }
    if reverse {
        color_span.pixels.sort_by_key(hue_of);
    } else {
        color_span.pixels.sort_by_key(|p| Reverse(hue_of(p)));
    }
    color_span
}
