use clap::{Parser, Subcommand};
use huesort::axis::AxisSelector;
use huesort::codec::{self, OutputPaths};
use huesort::compose::{TransparentPixels, render_span_overlay};
use huesort::config::{self, SortConfig};
use huesort::mask::AlphaMode;
use huesort::output;
use huesort::pipeline::{self, PipelineEvent, SortOptions};
use huesort::span::{Span, TrailingRun};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn version_string() -> &'static str {
    if env!("HUESORT_RELEASE_BUILD") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    match env!("HUESORT_GIT_HASH") {
        "" => concat!(env!("CARGO_PKG_VERSION"), "-dev"),
        // Leaked once at startup
        hash => Box::leak(format!("{}-dev@{hash}", env!("CARGO_PKG_VERSION")).into_boxed_str()),
    }
}

/// Resolve an `--x` / `--no-x` pair. `None` keeps the config value.
fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Flags that shape the mask and span detection.
#[derive(clap::Args, Clone, Default)]
struct SpanArgs {
    /// Lower perceived luminance threshold (16-bit scale, 0-65535)
    #[arg(short = 'l', long, allow_negative_numbers = true)]
    lower_threshold: Option<i64>,

    /// Upper perceived luminance threshold (16-bit scale, 0-65535)
    #[arg(short = 'u', long, allow_negative_numbers = true)]
    upper_threshold: Option<i64>,

    /// Sort pixels outside the luminance band instead of inside it
    #[arg(short = 'i', long, overrides_with = "no_invert")]
    invert: bool,

    /// Sort pixels inside the band even if the config file sets invert
    #[arg(long, overrides_with = "invert")]
    no_invert: bool,

    /// How transparency affects luminance
    #[arg(long, value_enum)]
    alpha: Option<AlphaMode>,

    /// Minimum length of a span that gets sorted
    #[arg(short = 's', long = "minimum-span-length")]
    min_length: Option<usize>,

    /// Scan direction
    #[arg(short = 'a', long, value_enum)]
    axis: Option<AxisSelector>,

    /// How runs that reach the edge of the image are treated
    #[arg(long, value_enum)]
    trailing_runs: Option<TrailingRun>,
}

impl SpanArgs {
    fn apply(&self, config: &mut SortConfig) {
        if let Some(low) = self.lower_threshold {
            config.mask.lower_threshold = low;
        }
        if let Some(high) = self.upper_threshold {
            config.mask.upper_threshold = high;
        }
        if let Some(invert) = toggle(self.invert, self.no_invert) {
            config.mask.invert = invert;
        }
        if let Some(alpha) = self.alpha {
            config.mask.alpha = alpha;
        }
        if let Some(min) = self.min_length {
            config.spans.min_length = min;
        }
        if let Some(axis) = self.axis {
            config.spans.axis = axis;
        }
        if let Some(trailing) = self.trailing_runs {
            config.spans.trailing_runs = trailing;
        }
    }
}

/// Flags for the `sort` command.
#[derive(clap::Args, Clone)]
struct SortArgs {
    /// Image to sort (JPEG, PNG, TIFF, WebP)
    input: PathBuf,

    #[command(flatten)]
    spans: SpanArgs,

    /// Sort lowest hue first
    #[arg(short = 'r', long, overrides_with = "no_reverse")]
    reverse: bool,

    /// Sort highest hue first even if the config file sets reverse
    #[arg(long, overrides_with = "reverse")]
    no_reverse: bool,

    /// Also write the generated mask
    #[arg(short = 'm', long, overrides_with = "no_keep_mask")]
    keep_mask: bool,

    /// Do not write the mask even if the config file asks for it
    #[arg(long, overrides_with = "keep_mask")]
    no_keep_mask: bool,

    /// Write output in the input's format instead of PNG
    #[arg(short = 'p', long, overrides_with = "no_preserve_format")]
    preserve_format: bool,

    /// Write PNG even if the config file sets preserve_format
    #[arg(long, overrides_with = "preserve_format")]
    no_preserve_format: bool,

    /// What to write for fully transparent pixels inside sorted spans
    #[arg(long, value_enum)]
    transparent_pixels: Option<TransparentPixels>,
}

impl SortArgs {
    fn apply(&self, config: &mut SortConfig) {
        self.spans.apply(config);
        if let Some(reverse) = toggle(self.reverse, self.no_reverse) {
            config.sort.reverse = reverse;
        }
        if let Some(keep) = toggle(self.keep_mask, self.no_keep_mask) {
            config.output.keep_mask = keep;
        }
        if let Some(preserve) = toggle(self.preserve_format, self.no_preserve_format) {
            config.output.preserve_format = preserve;
        }
        if let Some(transparent) = self.transparent_pixels {
            config.output.transparent_pixels = transparent;
        }
    }
}

/// Flags for the `spans` command.
#[derive(clap::Args, Clone)]
struct SpansArgs {
    /// Image to analyse
    input: PathBuf,

    #[command(flatten)]
    spans: SpanArgs,
}

#[derive(Parser)]
#[command(name = "huesort")]
#[command(about = "Sort runs of pixels by hue")]
#[command(long_about = "\
Sort runs of pixels by hue

Pixels whose perceived luminance falls between the lower and upper
thresholds are grouped into runs along each row (or column). Runs at least
the minimum span length long are reordered by hue, highest first. Every
other pixel is left untouched.

Luminance is sqrt(0.299 R^2 + 0.587 G^2 + 0.114 B^2) on 16-bit channels,
so thresholds range over 0-65535.

Outputs (in --output-dir, default ./output):
  out.<ext>      sorted image (PNG unless --preserve-format)
  mask.<ext>     mask, white = sorted (with --keep-mask)
  spans.png      spans drawn in magenta (spans command)
  spans.json     span list (spans command)

Run 'huesort gen-config' to generate a documented huesort.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory (overrides output.directory)
    #[arg(short = 'o', long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sort an image and write the result
    Sort(SortArgs),
    /// Detect spans without sorting, writing a debug overlay and span list
    Spans(SpansArgs),
    /// Print a stock huesort.toml with all options documented
    GenConfig,
}

/// Span list written by the `spans` command.
#[derive(Serialize)]
struct SpanReport<'a> {
    source: String,
    width: u32,
    height: u32,
    axis: AxisSelector,
    spans: &'a [Span],
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Sort(args) => {
            let config = resolve_config(&cli, |c| args.apply(c))?;
            run_sort(&args.input, &config)?;
        }
        Command::Spans(args) => {
            let config = resolve_config(&cli, |c| args.spans.apply(c))?;
            run_spans(&args.input, &config)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file, apply command-line overrides, and validate.
fn resolve_config(cli: &Cli, overrides: impl FnOnce(&mut SortConfig)) -> CliResult<SortConfig> {
    let mut config = config::load_config(cli.config.as_deref())?;
    overrides(&mut config);
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.to_string_lossy().into_owned();
    }
    config.validate()?;
    Ok(config)
}

fn run_sort(input: &Path, config: &SortConfig) -> CliResult<()> {
    let options = SortOptions::from_config(config)?;
    init_thread_pool(&config.processing);

    let decoded = codec::decode_image(input)?;
    let out_dir = PathBuf::from(&config.output.directory);
    let paths = OutputPaths::new(&out_dir, &decoded.format, config.output.preserve_format);
    // Fail on an unwritable format before doing any pixel work.
    codec::writable_format(&paths.format)?;

    output::print_run_header(input, &decoded.format, decoded.grid.dimensions(), &options);
    let outcome =
        with_progress_printer(|tx| pipeline::sort_pixels(&decoded.grid, &options, Some(tx)))??;

    std::fs::create_dir_all(&out_dir)?;
    let mut written = Vec::new();
    codec::encode_image(&paths.image, &outcome.image, &paths.format)?;
    written.push(paths.image.clone());
    if config.output.keep_mask {
        codec::encode_image(&paths.mask, &outcome.mask.to_grid(), &paths.format)?;
        written.push(paths.mask.clone());
    }
    output::print_written_files(&written);
    Ok(())
}

fn run_spans(input: &Path, config: &SortConfig) -> CliResult<()> {
    let options = SortOptions::from_config(config)?;
    init_thread_pool(&config.processing);

    let decoded = codec::decode_image(input)?;
    let out_dir = PathBuf::from(&config.output.directory);
    let paths = OutputPaths::new(&out_dir, &decoded.format, false);

    output::print_run_header(input, &decoded.format, decoded.grid.dimensions(), &options);
    let plan = with_progress_printer(|tx| {
        pipeline::plan_spans(&decoded.grid, &options, &Some(tx))
    })??;

    let (width, height) = decoded.grid.dimensions();
    let overlay = render_span_overlay(width, height, &plan.spans, options.axis);
    let report = SpanReport {
        source: input.display().to_string(),
        width,
        height,
        axis: config.spans.axis,
        spans: &plan.spans,
    };

    std::fs::create_dir_all(&out_dir)?;
    codec::encode_image(&paths.span_overlay, &overlay, "png")?;
    std::fs::write(&paths.span_list, serde_json::to_string_pretty(&report)?)?;
    output::print_written_files(&[paths.span_overlay, paths.span_list]);
    Ok(())
}

/// Run `work` while a separate thread prints its progress events.
fn with_progress_printer<T>(work: impl FnOnce(Sender<PipelineEvent>) -> T) -> CliResult<T> {
    let (tx, rx) = mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_pipeline_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = work(tx);
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;
    Ok(result)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
