//! Errors raised by the sorting core.
//!
//! Every variant is a caller configuration error. The core does no I/O, so
//! nothing here is transient and nothing is worth retrying: the run aborts
//! before any output is produced.

use crate::axis::AxisSelector;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    #[error("Invalid luminance threshold: {0}")]
    InvalidThreshold(ThresholdProblem),
    #[error("Scan axis '{0}' is not implemented")]
    UnsupportedScanAxis(AxisSelector),
    #[error("Minimum span length must be at least 1 (got {0})")]
    InvalidMinLength(usize),
}

/// Which threshold rule was broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdProblem {
    /// `low > high`.
    Inverted { low: i64, high: i64 },
    /// One of the bounds is below zero.
    Negative { low: i64, high: i64 },
}

impl fmt::Display for ThresholdProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdProblem::Inverted { low, high } => write!(
                f,
                "lower threshold ({low}) must not exceed upper threshold ({high})"
            ),
            ThresholdProblem::Negative { low, high } => write!(
                f,
                "threshold values must be non-negative (lower {low}, upper {high})"
            ),
        }
    }
}
