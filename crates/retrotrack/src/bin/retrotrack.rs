//! Run the tracker over a sequence of still images, one per frame.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use image::ImageReader;
use retrotrack::core::Frame;
use retrotrack::{
    draw_overlay, ExposureControl, FrameReport, MemoryStore, TargetKind, Tracker, TrackerConfig,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TargetArg {
    Tape,
    Ball,
}

impl From<TargetArg> for TargetKind {
    fn from(t: TargetArg) -> Self {
        match t {
            TargetArg::Tape => TargetKind::Tape,
            TargetArg::Ball => TargetKind::Ball,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Track retro-reflective targets in a sequence of images"
)]
struct Args {
    /// JSON tracker config; overrides `--target`.
    #[arg(long, conflicts_with = "target")]
    config: Option<PathBuf>,
    /// Built-in preset to use when no config file is given.
    #[arg(long, value_enum, default_value_t = TargetArg::Tape)]
    target: TargetArg,
    /// Seed the parameter table, e.g. `--set HL=10`. Repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    set: Vec<(String, f64)>,
    /// Request auto exposure for every frame.
    #[arg(long)]
    auto_exposure: bool,
    /// Write annotated frames into this directory.
    #[arg(long)]
    overlay_dir: Option<PathBuf>,
    /// Write the JSON report here instead of stdout.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Log level: off, error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    log_level: String,
    /// Emit JSON log lines (requires the `tracing` feature).
    #[arg(long)]
    log_json: bool,
    /// Print the effective config as JSON and exit.
    #[arg(long)]
    print_config: bool,
    /// Input images, processed in order.
    images: Vec<PathBuf>,
}

fn parse_key_value(raw: &str) -> Result<(String, f64), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|err| format!("invalid number for `{key}`: {err}"))?;
    Ok((key.trim().to_owned(), value))
}

/// Camera stand-in that only logs exposure commands.
struct LoggedExposure;

impl ExposureControl for LoggedExposure {
    fn set_manual(&mut self, exposure: f64) {
        log::info!("camera: manual exposure {exposure}");
    }

    fn set_auto(&mut self) {
        log::info!("camera: auto exposure");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args.log_level, args.log_json);

    let config = match &args.config {
        Some(path) => TrackerConfig::from_json_file(path)?,
        None => TrackerConfig::for_target(args.target.into()),
    };
    if args.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let mut table = MemoryStore::new();
    for (key, value) in &args.set {
        table.set_number(key, *value);
    }
    if args.auto_exposure {
        table.set_number(&config.exposure.request_key, 1.0);
    }
    if let Some(dir) = &args.overlay_dir {
        fs::create_dir_all(dir)?;
    }

    let mut tracker = Tracker::new(config);
    let mut camera = LoggedExposure;
    let mut reports: Vec<FrameReport> = Vec::with_capacity(args.images.len());

    for path in &args.images {
        let frame = load_frame(path);
        let report = tracker.process(frame.as_ref(), &table, &mut camera);
        report.publish(&mut table, &tracker.config().outputs);

        if let (Some(dir), Some(frame)) = (&args.overlay_dir, frame) {
            let mut canvas = frame;
            draw_overlay(&mut canvas, &report.annotations);
            let out = overlay_path(dir, path);
            if let Err(err) = canvas.save(&out) {
                log::warn!("failed to save overlay {}: {err}", out.display());
            }
        }
        reports.push(report);
    }

    let json = serde_json::to_string_pretty(&reports)?;
    match &args.report {
        Some(path) => {
            fs::write(path, json)?;
            log::info!("wrote report JSON to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// An unreadable image is a dropped frame, not a fatal error.
fn load_frame(path: &Path) -> Option<Frame> {
    let decoded = ImageReader::open(path)
        .map_err(image::ImageError::from)
        .and_then(|reader| reader.decode());
    match decoded {
        Ok(img) => Some(img.to_rgb8()),
        Err(err) => {
            log::warn!("frame {} unreadable: {err}", path.display());
            None
        }
    }
}

fn overlay_path(dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("frame");
    dir.join(format!("{stem}_overlay.png"))
}

fn init_logging(level: &str, json: bool) {
    #[cfg(feature = "tracing")]
    {
        if !retrotrack::core::init_tracing(level, json) {
            log::debug!("tracing subscriber already installed");
        }
    }
    #[cfg(not(feature = "tracing"))]
    {
        if json {
            eprintln!("--log-json needs the `tracing` feature; using plain logs");
        }
        let _ = retrotrack::core::init_with_level(retrotrack::core::level_from_name(level));
    }
}
