//! Luminance mask generation.
//!
//! Every pixel gets a perceived luminance
//!
//! ```text
//! L = sqrt(wr·R² + wg·G² + wb·B²)
//! ```
//!
//! computed on raw 16-bit channel magnitudes (no gamma correction). With the
//! default BT.601 weights `L` ranges over `0..=65535`, and the thresholds are
//! calibrated against that range: `10000..=30000` selects the mid-tones.
//!
//! By default the color channels are first scaled by alpha
//! ([`AlphaMode::Premultiply`]), so a half-transparent white measures about
//! 32768 and a fully transparent pixel always measures 0.
//! [`AlphaMode::Ignore`] measures the straight channels instead.
//!
//! A pixel is [`MaskCell::Selected`] when `low <= L <= high`; `invert` flips
//! the test. Downstream stages only ever look at [`MaskCell`] values. The
//! black/white rendering from [`Mask::to_grid`] exists for persisting the mask
//! and is never read back.

use crate::error::{SortError, ThresholdProblem};
use crate::grid::{self, Pixel, PixelGrid};
use serde::{Deserialize, Serialize};

/// Whether a pixel takes part in a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskCell {
    Selected,
    Unselected,
}

/// Channel weights for perceived luminance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LuminanceWeights {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl LuminanceWeights {
    /// ITU-R BT.601 luma coefficients.
    pub const BT601: Self = Self {
        red: 0.299,
        green: 0.587,
        blue: 0.114,
    };
}

impl Default for LuminanceWeights {
    fn default() -> Self {
        Self::BT601
    }
}

/// How alpha enters the luminance measurement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AlphaMode {
    /// Scale R, G and B by `alpha / 65535` before weighting.
    #[default]
    Premultiply,
    /// Measure the straight channels; alpha has no effect.
    Ignore,
}

/// Inclusive luminance band.
///
/// Signed so that a negative configured value can be reported instead of
/// wrapping silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub low: i64,
    pub high: i64,
}

impl Thresholds {
    pub fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    pub fn validate(&self) -> Result<(), SortError> {
        let (low, high) = (self.low, self.high);
        if low > high {
            return Err(SortError::InvalidThreshold(ThresholdProblem::Inverted {
                low,
                high,
            }));
        }
        if low < 0 || high < 0 {
            return Err(SortError::InvalidThreshold(ThresholdProblem::Negative {
                low,
                high,
            }));
        }
        Ok(())
    }

    fn contains(&self, luminance: f64) -> bool {
        self.low as f64 <= luminance && luminance <= self.high as f64
    }
}

/// Perceived luminance of a pixel.
pub fn luminance(pixel: &Pixel, weights: &LuminanceWeights, alpha: AlphaMode) -> f64 {
    let [r, g, b, a] = pixel.0.map(f64::from);
    let scale = match alpha {
        AlphaMode::Premultiply => a / f64::from(u16::MAX),
        AlphaMode::Ignore => 1.0,
    };
    let (r, g, b) = (r * scale, g * scale, b * scale);
    (weights.red * r * r + weights.green * g * g + weights.blue * b * b).sqrt()
}

/// Binary selection mask with the same bounds as its source grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    cells: Vec<MaskCell>,
}

impl Mask {
    /// Build a mask from row-major cells. Returns `None` if the cell count
    /// does not match `width * height`.
    pub fn from_cells(width: u32, height: u32, cells: Vec<MaskCell>) -> Option<Self> {
        (cells.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Cell at `(x, y)`. Panics when out of bounds, like `ImageBuffer::get_pixel`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> MaskCell {
        match self.get_checked(x, y) {
            Some(cell) => cell,
            None => panic!(
                "mask coordinates ({x}, {y}) out of bounds {}x{}",
                self.width, self.height
            ),
        }
    }

    /// Cell at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn get_checked(&self, x: u32, y: u32) -> Option<MaskCell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y as usize * self.width as usize + x as usize])
    }

    /// Number of selected cells.
    pub fn selected_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| **c == MaskCell::Selected)
            .count()
    }

    /// Render as a grid: white is selected, black is not.
    pub fn to_grid(&self) -> PixelGrid {
        PixelGrid::from_fn(self.width, self.height, |x, y| match self.get(x, y) {
            MaskCell::Selected => grid::WHITE,
            MaskCell::Unselected => grid::BLACK,
        })
    }
}

/// Compute the selection mask of `source`.
pub fn generate_mask(
    source: &PixelGrid,
    thresholds: Thresholds,
    weights: &LuminanceWeights,
    alpha: AlphaMode,
    invert: bool,
) -> Result<Mask, SortError> {
    thresholds.validate()?;

    let cells = source
        .pixels()
        .map(|pixel| {
            let inside = thresholds.contains(luminance(pixel, weights, alpha));
            if inside != invert {
                MaskCell::Selected
            } else {
                MaskCell::Unselected
            }
        })
        .collect();

    Ok(Mask {
        width: source.width(),
        height: source.height(),
        cells,
    })
}
