//! Sort configuration.
//!
//! Handles loading, validating, and merging a `huesort.toml` file. Stock
//! defaults are the base layer; a user file only needs the keys it wants to
//! change, and command-line flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [mask]
//! lower_threshold = 10000   # Perceived luminance band, 16-bit scale (0-65535)
//! upper_threshold = 30000
//! invert = false            # Select pixels outside the band instead
//! alpha = "premultiply"     # premultiply | ignore
//!
//! [mask.weights]
//! red = 0.299               # ITU-R BT.601
//! green = 0.587
//! blue = 0.114
//!
//! [spans]
//! min_length = 2            # Shortest run that gets sorted
//! axis = "rows"             # rows | columns
//! trailing_runs = "flush"   # flush | filter
//!
//! [sort]
//! reverse = false           # false: highest hue first
//!
//! [output]
//! directory = "output"
//! keep_mask = false
//! preserve_format = false
//! transparent_pixels = "highlight"  # highlight | keep
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early. Checks on the values the
//! sorting core consumes (threshold order, span length, axis) live in
//! [`SortOptions::from_config`](crate::pipeline::SortOptions::from_config).

use crate::axis::AxisSelector;
use crate::compose::TransparentPixels;
use crate::mask::{AlphaMode, LuminanceWeights};
use crate::span::TrailingRun;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `huesort.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SortConfig {
    /// Luminance mask settings.
    pub mask: MaskConfig,
    /// Span detection settings.
    pub spans: SpansConfig,
    /// Hue ordering settings.
    pub sort: SortOrderConfig,
    /// Output file settings.
    pub output: OutputConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SortConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.mask.weights;
        if [w.red, w.green, w.blue]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ConfigError::Validation(
                "mask.weights must be finite and non-negative".into(),
            ));
        }
        if self.output.directory.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.directory must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Luminance mask settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaskConfig {
    pub lower_threshold: i64,
    pub upper_threshold: i64,
    pub invert: bool,
    pub alpha: AlphaMode,
    pub weights: LuminanceWeights,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            lower_threshold: 10_000,
            upper_threshold: 30_000,
            invert: false,
            alpha: AlphaMode::Premultiply,
            weights: LuminanceWeights::default(),
        }
    }
}

/// Span detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpansConfig {
    pub min_length: usize,
    pub axis: AxisSelector,
    pub trailing_runs: TrailingRun,
}

impl Default for SpansConfig {
    fn default() -> Self {
        Self {
            min_length: 2,
            axis: AxisSelector::Rows,
            trailing_runs: TrailingRun::Flush,
        }
    }
}

/// Hue ordering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SortOrderConfig {
    /// Lowest hue first instead of highest.
    pub reverse: bool,
}

/// Output file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory that receives `out.<ext>` and friends.
    pub directory: String,
    /// Also write the luminance mask as `mask.<ext>`.
    pub keep_mask: bool,
    /// Write in the input's format instead of PNG.
    pub preserve_format: bool,
    pub transparent_pixels: TransparentPixels,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "output".to_string(),
            keep_mask: false,
            preserve_format: false,
            transparent_pixels: TransparentPixels::Highlight,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of worker threads.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SortConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SortConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SortConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load configuration.
///
/// With no path the stock defaults are returned. A given path must exist.
pub fn load_config(path: Option<&Path>) -> Result<SortConfig, ConfigError> {
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `huesort.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# huesort configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Command-line flags override them.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Luminance mask
# ---------------------------------------------------------------------------
[mask]
# Pixels whose perceived luminance falls inside [lower, upper] are sorted.
# Luminance is measured on 16-bit channels, so the full range is 0-65535.
lower_threshold = 10000
upper_threshold = 30000

# Sort the pixels outside the band instead.
invert = false

# How transparency affects luminance:
#   "premultiply" - scale R, G, B by alpha first (transparent pixels measure 0)
#   "ignore"      - measure the color channels as stored
alpha = "premultiply"

# Channel weights for sqrt(r*R^2 + g*G^2 + b*B^2). Defaults are ITU-R BT.601.
[mask.weights]
red = 0.299
green = 0.587
blue = 0.114

# ---------------------------------------------------------------------------
# Span detection
# ---------------------------------------------------------------------------
[spans]
# Shortest run of selected pixels that gets sorted.
min_length = 2

# Scan direction: "rows" (left to right) or "columns" (top to bottom).
# "diagonal" is recognised but not implemented, and is rejected.
axis = "rows"

# A selected run that reaches the edge of the image:
#   "flush"  - always sorted, even if shorter than min_length
#   "filter" - subject to min_length like every other run
trailing_runs = "flush"

# ---------------------------------------------------------------------------
# Sorting
# ---------------------------------------------------------------------------
[sort]
# false: highest hue first. true: lowest hue first.
reverse = false

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Directory for out.<ext>, mask.<ext>, spans.png and spans.json.
directory = "output"

# Also write the luminance mask (white = sorted).
keep_mask = false

# Write in the input's format instead of PNG.
preserve_format = false

# Fully transparent pixels inside a sorted run:
#   "highlight" - replaced with opaque magenta
#   "keep"      - written unchanged
transparent_pixels = "highlight"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
