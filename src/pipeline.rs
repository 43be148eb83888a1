//! The full sort: mask → spans → sorted spans → output grid.
//!
//! ```text
//! source ──generate_mask──▶ Mask ──detect_spans──▶ [Span]
//!    │                                               │
//!    └──────────── materialize + sort_span ◀─────────┘
//!                           │
//!                        compose ──▶ output
//! ```
//!
//! Options are validated up front by [`SortOptions::validate`], so a bad
//! configuration fails before any pixel work starts. Progress is reported as
//! [`PipelineEvent`]s over an optional channel, mirroring how the CLI prints
//! per-stage output on a separate thread.

use crate::axis::ScanAxis;
use crate::compose::{TransparentPixels, compose};
use crate::config::SortConfig;
use crate::error::SortError;
use crate::grid::PixelGrid;
use crate::mask::{AlphaMode, LuminanceWeights, Mask, Thresholds, generate_mask};
use crate::sort::{ColorSpan, sort_span};
use crate::span::{Span, TrailingRun, detect_spans};
use rayon::prelude::*;
use std::sync::mpsc::Sender;

/// Everything the core needs to sort one image.
#[derive(Debug, Clone, PartialEq)]
pub struct SortOptions {
    pub thresholds: Thresholds,
    pub weights: LuminanceWeights,
    pub alpha: AlphaMode,
    pub invert: bool,
    pub min_length: usize,
    pub axis: ScanAxis,
    pub trailing: TrailingRun,
    pub reverse: bool,
    pub transparent: TransparentPixels,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::new(10_000, 30_000),
            weights: LuminanceWeights::default(),
            alpha: AlphaMode::Premultiply,
            invert: false,
            min_length: 2,
            axis: ScanAxis::Rows,
            trailing: TrailingRun::Flush,
            reverse: false,
            transparent: TransparentPixels::Highlight,
        }
    }
}

impl SortOptions {
    /// Extract and check core options from a loaded configuration.
    ///
    /// Fails with [`SortError::UnsupportedScanAxis`] for `diagonal`.
    pub fn from_config(config: &SortConfig) -> Result<Self, SortError> {
        let options = Self {
            thresholds: Thresholds::new(config.mask.lower_threshold, config.mask.upper_threshold),
            weights: config.mask.weights,
            alpha: config.mask.alpha,
            invert: config.mask.invert,
            min_length: config.spans.min_length,
            axis: ScanAxis::try_from(config.spans.axis)?,
            trailing: config.spans.trailing_runs,
            reverse: config.sort.reverse,
            transparent: config.output.transparent_pixels,
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), SortError> {
        self.thresholds.validate()?;
        if self.min_length == 0 {
            return Err(SortError::InvalidMinLength(self.min_length));
        }
        Ok(())
    }
}

/// Progress reported while an image is sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    MaskGenerated { selected: usize, total: usize },
    SpansDetected { count: usize, longest: u32 },
    SpansSorted { count: usize, skipped: usize },
    Composed { width: u32, height: u32 },
}

/// Mask and spans for an image, before any sorting.
#[derive(Debug, Clone)]
pub struct SpanPlan {
    pub mask: Mask,
    pub spans: Vec<Span>,
}

/// Result of [`sort_pixels`].
#[derive(Debug, Clone)]
pub struct SortOutcome {
    pub image: PixelGrid,
    pub mask: Mask,
    pub span_count: usize,
}

fn emit(events: &Option<Sender<PipelineEvent>>, event: PipelineEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is listening.
        let _ = tx.send(event);
    }
}

/// Generate the mask and detect spans.
pub fn plan_spans(
    source: &PixelGrid,
    options: &SortOptions,
    events: &Option<Sender<PipelineEvent>>,
) -> Result<SpanPlan, SortError> {
    options.validate()?;

    let mask = generate_mask(
        source,
        options.thresholds,
        &options.weights,
        options.alpha,
        options.invert,
    )?;
    emit(
        events,
        PipelineEvent::MaskGenerated {
            selected: mask.selected_count(),
            total: source.width() as usize * source.height() as usize,
        },
    );

    let spans = detect_spans(&mask, options.min_length, options.axis, options.trailing)?;
    emit(
        events,
        PipelineEvent::SpansDetected {
            count: spans.len(),
            longest: spans.iter().map(|s| s.len).max().unwrap_or(0),
        },
    );

    Ok(SpanPlan { mask, spans })
}

/// Sort `source` and return the output grid along with the mask it used.
pub fn sort_pixels(
    source: &PixelGrid,
    options: &SortOptions,
    events: Option<Sender<PipelineEvent>>,
) -> Result<SortOutcome, SortError> {
    let SpanPlan { mask, spans } = plan_spans(source, options, &events)?;
    let span_count = spans.len();

    let skipped = spans.iter().filter(|s| s.len <= 1).count();
    let sorted: Vec<ColorSpan> = spans
        .into_par_iter()
        .map(|span| {
            sort_span(
                ColorSpan::materialize(span, source, options.axis),
                options.reverse,
            )
        })
        .collect();
    emit(
        &events,
        PipelineEvent::SpansSorted {
            count: span_count - skipped,
            skipped,
        },
    );

    let image = compose(source, &sorted, options.axis, options.transparent);
    emit(
        &events,
        PipelineEvent::Composed {
            width: image.width(),
            height: image.height(),
        },
    );

    Ok(SortOutcome {
        image,
        mask,
        span_count,
    })
}
