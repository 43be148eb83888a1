//! Scan axis: the direction spans are detected, sorted, and written back along.
//!
//! Rows and columns share one implementation everywhere downstream. Each
//! stage walks abstract `(line, offset)` pairs and asks the axis to map them
//! to grid `(x, y)` coordinates:
//!
//! | Axis | line | offset | `(x, y)` |
//! |---|---|---|---|
//! | [`ScanAxis::Rows`] | row index | column index | `(offset, line)` |
//! | [`ScanAxis::Columns`] | column index | row index | `(line, offset)` |
//!
//! [`AxisSelector`] is the wider configuration-facing value. It also accepts
//! `diagonal`, which is parsed but refused with
//! [`SortError::UnsupportedScanAxis`] when converted into a [`ScanAxis`].

use crate::error::SortError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis value as it appears in configuration and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AxisSelector {
    #[default]
    Rows,
    Columns,
    Diagonal,
}

impl fmt::Display for AxisSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AxisSelector::Rows => "rows",
            AxisSelector::Columns => "columns",
            AxisSelector::Diagonal => "diagonal",
        })
    }
}

/// An implemented scan axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanAxis {
    #[default]
    Rows,
    Columns,
}

impl TryFrom<AxisSelector> for ScanAxis {
    type Error = SortError;

    fn try_from(selector: AxisSelector) -> Result<Self, Self::Error> {
        match selector {
            AxisSelector::Rows => Ok(ScanAxis::Rows),
            AxisSelector::Columns => Ok(ScanAxis::Columns),
            AxisSelector::Diagonal => Err(SortError::UnsupportedScanAxis(selector)),
        }
    }
}

impl ScanAxis {
    /// Number of scan lines in a grid of the given size.
    pub fn line_count(self, width: u32, height: u32) -> u32 {
        match self {
            ScanAxis::Rows => height,
            ScanAxis::Columns => width,
        }
    }

    /// Number of pixels on each scan line.
    pub fn line_len(self, width: u32, height: u32) -> u32 {
        match self {
            ScanAxis::Rows => width,
            ScanAxis::Columns => height,
        }
    }

    /// Map `(line, offset)` to grid `(x, y)`.
    #[inline]
    pub fn coords(self, line: u32, offset: u32) -> (u32, u32) {
        match self {
            ScanAxis::Rows => (offset, line),
            ScanAxis::Columns => (line, offset),
        }
    }
}
