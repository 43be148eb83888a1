//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Sort
//!
//! ```text
//! photo.jpg (jpg, 1920x1080)
//!     Thresholds: 10000..=30000 (inverted)
//!     Axis: rows, min length 2, descending hue
//! Mask: 812345 of 2073600 pixels selected (39.2%)
//! Spans: 20211 detected, longest 1411
//! Sorted: 19870 spans (341 single-pixel spans skipped)
//! Composed: 1920x1080
//!
//! Wrote
//!     output/out.png
//!     output/mask.png
//! ```
//!
//! # Architecture
//!
//! Every `format_*` function returns `Vec<String>` and does no I/O, so tests
//! can check output line by line. `print_*` wrappers write to stdout.

use crate::axis::ScanAxis;
use crate::pipeline::{PipelineEvent, SortOptions};
use std::path::{Path, PathBuf};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

fn axis_name(axis: ScanAxis) -> &'static str {
    match axis {
        ScanAxis::Rows => "rows",
        ScanAxis::Columns => "columns",
    }
}

// ============================================================================
// Run header
// ============================================================================

/// Format the header printed before an image is processed.
///
/// ```text
/// photo.jpg (jpg, 1920x1080)
///     Thresholds: 10000..=30000
///     Axis: rows, min length 2, descending hue
/// ```
pub fn format_run_header(
    input: &Path,
    format: &str,
    dimensions: (u32, u32),
    options: &SortOptions,
) -> Vec<String> {
    let name = input
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    let (w, h) = dimensions;

    let mut thresholds = format!(
        "{}Thresholds: {}..={}",
        indent(1),
        options.thresholds.low,
        options.thresholds.high
    );
    if options.invert {
        thresholds.push_str(" (inverted)");
    }

    vec![
        format!("{name} ({format}, {w}x{h})"),
        thresholds,
        format!(
            "{}Axis: {}, min length {}, {} hue",
            indent(1),
            axis_name(options.axis),
            options.min_length,
            if options.reverse {
                "ascending"
            } else {
                "descending"
            }
        ),
    ]
}

pub fn print_run_header(input: &Path, format: &str, dimensions: (u32, u32), options: &SortOptions) {
    for line in format_run_header(input, format, dimensions, options) {
        println!("{}", line);
    }
}

// ============================================================================
// Pipeline progress
// ============================================================================

/// Format a single pipeline progress event as display lines.
pub fn format_pipeline_event(event: &PipelineEvent) -> Vec<String> {
    match event {
        PipelineEvent::MaskGenerated { selected, total } => vec![format!(
            "Mask: {} of {} pixels selected ({:.1}%)",
            selected,
            total,
            percent(*selected, *total)
        )],
        PipelineEvent::SpansDetected { count, longest } => {
            if *count == 0 {
                vec!["Spans: none detected".to_string()]
            } else {
                vec![format!("Spans: {count} detected, longest {longest}")]
            }
        }
        PipelineEvent::SpansSorted { count, skipped } => {
            if *skipped == 0 {
                vec![format!("Sorted: {count} spans")]
            } else {
                vec![format!(
                    "Sorted: {count} spans ({skipped} single-pixel spans skipped)"
                )]
            }
        }
        PipelineEvent::Composed { width, height } => {
            vec![format!("Composed: {width}x{height}")]
        }
    }
}

// ============================================================================
// Written files
// ============================================================================

/// Format the list of files a run produced.
pub fn format_written_files(paths: &[PathBuf]) -> Vec<String> {
    let mut lines = vec![String::new(), "Wrote".to_string()];
    lines.extend(
        paths
            .iter()
            .map(|p| format!("{}{}", indent(1), p.display())),
    );
    lines
}

pub fn print_written_files(paths: &[PathBuf]) {
    for line in format_written_files(paths) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::Thresholds;

    #[test]
    fn header_shows_name_format_and_size() {
        let lines = format_run_header(
            Path::new("/photos/dusk.jpg"),
            "jpg",
            (640, 480),
            &SortOptions::default(),
        );
        assert_eq!(
            lines,
            vec![
                "dusk.jpg (jpg, 640x480)",
                "    Thresholds: 10000..=30000",
                "    Axis: rows, min length 2, descending hue",
            ]
        );
    }

    #[test]
    fn header_marks_inverted_columns_ascending() {
        let options = SortOptions {
            thresholds: Thresholds::new(0, 500),
            invert: true,
            axis: ScanAxis::Columns,
            reverse: true,
            min_length: 5,
            ..SortOptions::default()
        };
        let lines = format_run_header(Path::new("a.png"), "png", (1, 1), &options);
        assert_eq!(lines[1], "    Thresholds: 0..=500 (inverted)");
        assert_eq!(lines[2], "    Axis: columns, min length 5, ascending hue");
    }

    #[test]
    fn mask_event_shows_percentage() {
        let lines = format_pipeline_event(&PipelineEvent::MaskGenerated {
            selected: 1,
            total: 4,
        });
        assert_eq!(lines, vec!["Mask: 1 of 4 pixels selected (25.0%)"]);
    }

    #[test]
    fn mask_event_on_empty_image() {
        let lines = format_pipeline_event(&PipelineEvent::MaskGenerated {
            selected: 0,
            total: 0,
        });
        assert_eq!(lines, vec!["Mask: 0 of 0 pixels selected (0.0%)"]);
    }

    #[test]
    fn no_spans_detected() {
        let lines = format_pipeline_event(&PipelineEvent::SpansDetected {
            count: 0,
            longest: 0,
        });
        assert_eq!(lines, vec!["Spans: none detected"]);
    }

    #[test]
    fn sorted_event_mentions_skipped_spans() {
        let lines = format_pipeline_event(&PipelineEvent::SpansSorted {
            count: 10,
            skipped: 2,
        });
        assert_eq!(lines, vec!["Sorted: 10 spans (2 single-pixel spans skipped)"]);

        let lines = format_pipeline_event(&PipelineEvent::SpansSorted {
            count: 10,
            skipped: 0,
        });
        assert_eq!(lines, vec!["Sorted: 10 spans"]);
    }

    #[test]
    fn composed_event_shows_dimensions() {
        let lines = format_pipeline_event(&PipelineEvent::Composed {
            width: 3,
            height: 2,
        });
        assert_eq!(lines, vec!["Composed: 3x2"]);
    }

    #[test]
    fn written_files_are_indented() {
        let lines = format_written_files(&[
            PathBuf::from("output/out.png"),
            PathBuf::from("output/mask.png"),
        ]);
        assert_eq!(
            lines,
            vec!["", "Wrote", "    output/out.png", "    output/mask.png"]
        );
    }
}
