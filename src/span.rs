//! Run-length span detection over a [`Mask`].
//!
//! Each scan line is walked once, tracking the color of the current run and
//! where it started. When the color changes, a just-closed selected run is
//! emitted if it is at least `min_length` long.
//!
//! A selected run still open when the line ends is handled by
//! [`TrailingRun`]: `Flush` emits it whatever its length (the canonical
//! behavior), `Filter` holds it to the same `min_length` rule as interior
//! runs. So with `min_length = 4` the line `W W W B B W W` yields `[5, 7)`
//! under `Flush` and nothing under `Filter`.
//!
//! Lines are independent, so they are scanned in parallel. The output is
//! still in scan order: increasing line, then increasing start offset.

use crate::axis::ScanAxis;
use crate::error::SortError;
use crate::mask::{Mask, MaskCell};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One run of selected pixels along a scan line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Row index for row scans, column index for column scans.
    pub line: u32,
    /// Offset along the line where the run begins.
    pub start: u32,
    /// Number of pixels in the run, always at least 1.
    pub len: u32,
}

impl Span {
    /// One past the last offset covered by the span.
    pub fn end(&self) -> u32 {
        self.start + self.len
    }

    /// Grid coordinates covered by the span, in scan order.
    pub fn coords(&self, axis: ScanAxis) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.start..self.end()).map(move |offset| axis.coords(self.line, offset))
    }
}

/// How a selected run that reaches the end of its line is treated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TrailingRun {
    /// Emit it regardless of `min_length`.
    #[default]
    Flush,
    /// Apply `min_length` like any other run.
    Filter,
}

/// Detect all spans in `mask` along `axis`.
pub fn detect_spans(
    mask: &Mask,
    min_length: usize,
    axis: ScanAxis,
    trailing: TrailingRun,
) -> Result<Vec<Span>, SortError> {
    if min_length == 0 {
        return Err(SortError::InvalidMinLength(min_length));
    }
    let min_length = u32::try_from(min_length).unwrap_or(u32::MAX);

    let (width, height) = mask.dimensions();
    let spans = (0..axis.line_count(width, height))
        .into_par_iter()
        .flat_map_iter(|line| scan_line(mask, axis, line, min_length, trailing))
        .collect();

    Ok(spans)
}

fn scan_line(
    mask: &Mask,
    axis: ScanAxis,
    line: u32,
    min_length: u32,
    trailing: TrailingRun,
) -> Vec<Span> {
    let len = axis.line_len(mask.width(), mask.height());
    let cell_at = |offset: u32| {
        let (x, y) = axis.coords(line, offset);
        mask.get(x, y)
    };

    let mut spans = Vec::new();
    if len == 0 {
        return spans;
    }

    let mut run_cell = cell_at(0);
    let mut run_start = 0;

    for offset in 1..len {
        let cell = cell_at(offset);
        if cell == run_cell {
            continue;
        }
        let run_len = offset - run_start;
        if run_cell == MaskCell::Selected && run_len >= min_length {
            spans.push(Span {
                line,
                start: run_start,
                len: run_len,
            });
        }
        run_cell = cell;
        run_start = offset;
    }

    let run_len = len - run_start;
    let keep_trailing = match trailing {
        TrailingRun::Flush => true,
        TrailingRun::Filter => run_len >= min_length,
    };
    if run_cell == MaskCell::Selected && keep_trailing {
        spans.push(Span {
            line,
            start: run_start,
            len: run_len,
        });
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{mask_from_lines, mask_line};

    fn span(line: u32, start: u32, len: u32) -> Span {
        Span { line, start, len }
    }

    #[test]
    fn interior_and_trailing_runs_above_minimum() {
        let mask = mask_line("WWWBBWW");
        let spans = detect_spans(&mask, 2, ScanAxis::Rows, TrailingRun::Flush).unwrap();
        assert_eq!(spans, vec![span(0, 0, 3), span(0, 5, 2)]);
    }

    #[test]
    fn filter_drops_short_trailing_run() {
        let mask = mask_line("WWWBBWW");
        let spans = detect_spans(&mask, 4, ScanAxis::Rows, TrailingRun::Filter).unwrap();
        assert!(spans.is_empty());
    }

    // Short interior runs are dropped, but a short run that reaches the end of
    // the line is still emitted under `Flush`.
    #[test]
    fn flush_keeps_short_trailing_run_but_not_short_interior_run() {
        let mask = mask_line("WWWBBWW");
        let spans = detect_spans(&mask, 4, ScanAxis::Rows, TrailingRun::Flush).unwrap();
        assert_eq!(spans, vec![span(0, 5, 2)]);
    }

    #[test]
    fn single_trailing_pixel_is_flushed() {
        let mask = mask_line("BBBW");
        let spans = detect_spans(&mask, 3, ScanAxis::Rows, TrailingRun::Flush).unwrap();
        assert_eq!(spans, vec![span(0, 3, 1)]);
    }

    #[test]
    fn trailing_unselected_run_is_never_emitted() {
        let mask = mask_line("WWBBBB");
        let spans = detect_spans(&mask, 1, ScanAxis::Rows, TrailingRun::Flush).unwrap();
        assert_eq!(spans, vec![span(0, 0, 2)]);
    }

    #[test]
    fn fully_selected_line_is_one_span() {
        let mask = mask_line("WWWW");
        let spans = detect_spans(&mask, 2, ScanAxis::Rows, TrailingRun::Filter).unwrap();
        assert_eq!(spans, vec![span(0, 0, 4)]);
    }

    #[test]
    fn runs_do_not_continue_across_lines() {
        let mask = mask_from_lines(&["BBWW", "WWBB"]);
        let spans = detect_spans(&mask, 3, ScanAxis::Rows, TrailingRun::Filter).unwrap();
        assert!(spans.is_empty());
        let spans = detect_spans(&mask, 2, ScanAxis::Rows, TrailingRun::Filter).unwrap();
        assert_eq!(spans, vec![span(0, 2, 2), span(1, 0, 2)]);
    }

    #[test]
    fn columns_scan_top_to_bottom() {
        // Column 0 is W,W,B; column 1 is B,W,W.
        let mask = mask_from_lines(&["WB", "WW", "BW"]);
        let spans = detect_spans(&mask, 2, ScanAxis::Columns, TrailingRun::Flush).unwrap();
        assert_eq!(spans, vec![span(0, 0, 2), span(1, 1, 2)]);
    }

    #[test]
    fn spans_are_in_scan_order() {
        let mask = mask_from_lines(&["WWBWW", "BBBBB", "WBWWW"]);
        let spans = detect_spans(&mask, 1, ScanAxis::Rows, TrailingRun::Flush).unwrap();
        assert_eq!(
            spans,
            vec![
                span(0, 0, 2),
                span(0, 3, 2),
                span(2, 0, 1),
                span(2, 2, 3)
            ]
        );
    }

    #[test]
    fn spans_stay_within_line() {
        let mask = mask_from_lines(&["WBWBWWW", "WWWWWWW", "BWBWBWB"]);
        let spans = detect_spans(&mask, 1, ScanAxis::Rows, TrailingRun::Flush).unwrap();
        assert!(spans.iter().all(|s| s.len >= 1 && s.end() <= 7));
    }

    #[test]
    fn zero_min_length_is_rejected() {
        let mask = mask_line("WW");
        let err = detect_spans(&mask, 0, ScanAxis::Rows, TrailingRun::Flush).unwrap_err();
        assert_eq!(err, SortError::InvalidMinLength(0));
    }

    #[test]
    fn empty_mask_yields_no_spans() {
        let mask = Mask::from_cells(0, 0, Vec::new()).unwrap();
        let spans = detect_spans(&mask, 2, ScanAxis::Rows, TrailingRun::Flush).unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn span_coords_follow_axis() {
        let s = span(1, 2, 3);
        let rows: Vec<_> = s.coords(ScanAxis::Rows).collect();
        assert_eq!(rows, vec![(2, 1), (3, 1), (4, 1)]);
        let cols: Vec<_> = s.coords(ScanAxis::Columns).collect();
        assert_eq!(cols, vec![(1, 2), (1, 3), (1, 4)]);
    }
}
