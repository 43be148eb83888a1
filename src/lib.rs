//! # huesort
//!
//! A pixel-sorting glitch effect. Pixels whose perceived luminance falls in
//! a band are grouped into runs along each row (or column), and every run is
//! reordered by hue. Everything outside the runs is left exactly as it was.
//!
//! # Architecture: Five-Stage Pipeline
//!
//! ```text
//! 1. Mask      source grid  →  Mask           (luminance band → selected/unselected)
//! 2. Detect    Mask         →  [Span]         (runs of selected cells per scan line)
//! 3. Gather    Span + grid  →  ColorSpan      (source pixels under each span)
//! 4. Sort      ColorSpan    →  ColorSpan      (same coordinates, hue order)
//! 5. Compose   grid + spans →  output grid    (copy of source, spans overwritten)
//! ```
//!
//! Every stage is a pure function over in-memory data. File decoding and
//! encoding live at the edge in [`codec`], and the binary is the only place
//! that touches the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`grid`] | `PixelGrid`: 16-bit RGBA image buffer shared by all stages |
//! | [`axis`] | Scan axis and the `(line, offset) → (x, y)` mapping |
//! | [`mask`] | Stage 1 — perceived luminance and the selection mask |
//! | [`span`] | Stage 2 — run-length span detection |
//! | [`hue`] | HSV hue of a pixel, the sort key |
//! | [`sort`] | Stages 3–4 — gathering and hue-sorting span pixels |
//! | [`compose`] | Stage 5 — writing sorted spans back, plus a span debug overlay |
//! | [`pipeline`] | Runs the stages in order, validates options, reports progress |
//! | [`error`] | Configuration errors raised by the core |
//! | [`config`] | `huesort.toml` loading, merging, validation |
//! | [`codec`] | Image file decode/encode and output naming |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## 16-bit Samples Throughout
//!
//! Thresholds are calibrated against 16-bit channel values (0–65535), so every
//! source is expanded to 16-bit RGBA on decode. An 8-bit JPEG and a 16-bit
//! TIFF of the same scene select the same pixels.
//!
//! ## One Code Path for Rows and Columns
//!
//! Stages never index the grid directly by row or column. They walk
//! `(line, offset)` pairs and let [`axis::ScanAxis::coords`] map them to
//! `(x, y)`, so switching axis cannot make detection and write-back disagree.
//!
//! ## Typed Mask Cells
//!
//! The mask stores [`mask::MaskCell`] values. The black/white rendering is
//! only produced for saving to disk; nothing downstream compares colors to
//! decide what is selected.
//!
//! ## Parallel by Construction
//!
//! Scan lines are independent during detection and spans are disjoint during
//! sorting, so both run on rayon. Results are collected in scan order and the
//! sort is stable, so output is identical to a sequential run.

pub mod axis;
pub mod codec;
pub mod compose;
pub mod config;
pub mod error;
pub mod grid;
pub mod hue;
pub mod mask;
pub mod output;
pub mod pipeline;
pub mod sort;
pub mod span;

pub use error::SortError;
pub use pipeline::{SortOptions, SortOutcome, sort_pixels};

#[cfg(test)]
pub(crate) mod test_helpers;
