//! Shared test utilities for the huesort test suite.
//!
//! Builders for small grids and masks, written so tests read like the data
//! they describe.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mask = mask_line("WWWBBWW");
//! let source = grid_from_rows(&[vec![hue_pixel(10.0), hue_pixel(350.0)]]);
//! assert_eq!(hues(&source.pixels().copied().collect::<Vec<_>>()), vec![10, 350]);
//! ```

use crate::grid::{Pixel, PixelGrid};
use crate::hue::hue_of;
use crate::mask::{Mask, MaskCell};
use image::Rgba;

// =========================================================================
// Pixel builders
// =========================================================================

/// Opaque gray with every color channel set to `v`.
pub fn gray(v: u16) -> Pixel {
    Rgba([v, v, v, u16::MAX])
}

/// Opaque, fully saturated, full-value pixel whose hue is `degrees`.
///
/// Channels are rounded to 16 bits, which keeps [`hue_of`] within a
/// thousandth of a degree of `degrees`.
pub fn hue_pixel(degrees: f64) -> Pixel {
    let max = u16::MAX;
    let frac = |f: f64| (f * f64::from(u16::MAX)).round() as u16;
    let d = degrees.rem_euclid(360.0);
    let (r, g, b) = match (d / 60.0) as u32 {
        0 => (max, frac(d / 60.0), 0),
        1 => (frac((120.0 - d) / 60.0), max, 0),
        2 => (0, max, frac((d - 120.0) / 60.0)),
        3 => (0, frac((240.0 - d) / 60.0), max),
        4 => (frac((d - 240.0) / 60.0), 0, max),
        _ => (max, 0, frac((360.0 - d) / 60.0)),
    };
    Rgba([r, g, b, u16::MAX])
}

/// Hue of each pixel, in order.
pub fn hues(pixels: &[Pixel]) -> Vec<u16> {
    pixels.iter().map(hue_of).collect()
}

// =========================================================================
// Grid and mask builders
// =========================================================================

/// Build a grid from rows of pixels. Panics if rows differ in length.
pub fn grid_from_rows(rows: &[Vec<Pixel>]) -> PixelGrid {
    let height = rows.len() as u32;
    let width = rows.first().map_or(0, |r| r.len() as u32);
    assert!(
        rows.iter().all(|r| r.len() as u32 == width),
        "all rows must have the same length"
    );
    PixelGrid::from_fn(width, height, |x, y| rows[y as usize][x as usize])
}

/// Single-row mask from a pattern of `W` (selected) and `B` (unselected).
pub fn mask_line(pattern: &str) -> Mask {
    mask_from_lines(&[pattern])
}

/// Multi-row mask, one pattern string per row.
pub fn mask_from_lines(lines: &[&str]) -> Mask {
    let height = lines.len() as u32;
    let width = lines.first().map_or(0, |l| l.len() as u32);
    let cells: Vec<MaskCell> = lines
        .iter()
        .flat_map(|line| line.chars())
        .map(|c| match c {
            'W' => MaskCell::Selected,
            'B' => MaskCell::Unselected,
            other => panic!("unexpected mask character '{other}', use W or B"),
        })
        .collect();
    Mask::from_cells(width, height, cells)
        .unwrap_or_else(|| panic!("mask rows must all be {width} cells wide"))
}
