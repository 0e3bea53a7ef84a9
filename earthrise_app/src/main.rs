//! Earthrise viewer
//!
//! Re-renders the Earth as seen from the Moon at a fixed cadence (1 Hz by
//! default) and hands every frame to a presenter.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use earthrise::foundation::logging::{self, LevelFilter};
use earthrise::prelude::*;

mod presenter;
use presenter::{FrameInfo, FramePresenter, LogPresenter};

const DEFAULT_INTERVAL_MS: u64 = 1000;

/// How the redraw loop runs, separate from what it renders
#[derive(Debug, Clone, PartialEq)]
struct LoopSettings {
    /// Simulated start time; `None` follows the wall clock
    start: Option<TimeInstant>,
    /// Frames to render before exiting; 0 runs forever
    frames: u64,
    /// Target time between frame starts
    interval: Duration,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            start: None,
            frames: 0,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
        }
    }
}

fn cli() -> Command {
    let float = |id: &'static str, help: &'static str| {
        Arg::new(id)
            .long(id)
            .value_name("VALUE")
            .help(help)
            .allow_negative_numbers(true)
            .value_parser(value_parser!(f64))
    };
    let flag = |id: &'static str, help: &'static str| {
        Arg::new(id).long(id).help(help).action(ArgAction::SetTrue)
    };

    Command::new("earthrise")
        .about("Renders the Earth as seen from the Apollo 11 site on the Moon")
        .arg(
            Arg::new("texture")
                .long("texture")
                .value_name("PATH")
                .help("Equirectangular Earth texture (required unless --test-pattern)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML or RON configuration file"),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .value_name("PIXELS")
                .help("Frame width")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .value_name("PIXELS")
                .help("Frame height")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("at")
                .long("at")
                .value_name("RFC3339")
                .help("Simulated start time, e.g. 1969-07-21T02:56:00Z (default: now)"),
        )
        .arg(
            Arg::new("frames")
                .short('n')
                .long("frames")
                .value_name("COUNT")
                .help("Number of frames to render, 0 runs forever")
                .value_parser(value_parser!(u64))
                .default_value("0"),
        )
        .arg(
            Arg::new("interval-ms")
                .long("interval-ms")
                .value_name("MILLISECONDS")
                .help("Time between frames")
                .value_parser(value_parser!(u64))
                .default_value("1000"),
        )
        .arg(float("night-floor", "Minimum brightness on the night side"))
        .arg(float("gamma", "Shading falloff exponent"))
        .arg(float("exposure", "Brightness multiplier"))
        .arg(flag("no-shading", "Render at uniform full brightness"))
        .arg(float("texture-offset", "Texture longitude offset, degrees"))
        .arg(float("water-boost", "Ocean colour multiplier"))
        .arg(float("water-hue-lo", "Lower ocean hue bound, degrees"))
        .arg(float("water-hue-hi", "Upper ocean hue bound, degrees"))
        .arg(float("water-sat-min", "Minimum ocean saturation"))
        .arg(flag("test-pattern", "Colour pixels by their view-space normal"))
        .arg(flag("debug-overlay", "Draw rotation axis, sun arrow and terminator"))
        .arg(float("fudge-lon", "Calibration yaw about the polar axis, degrees"))
        .arg(float("roll", "Calibration screen roll, degrees"))
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log per-frame geometry")
                .action(ArgAction::SetTrue),
        )
}

fn override_value<T>(matches: &ArgMatches, id: &str, target: &mut T)
where
    T: Clone + Send + Sync + std::fmt::Debug + 'static,
{
    if let Some(value) = matches.get_one::<T>(id) {
        log::debug!("Override {} = {:?}", id, value);
        *target = value.clone();
    }
}

/// Defaults, then the optional config file, then command-line flags
fn layered_config(matches: &ArgMatches) -> Result<RenderConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            RenderConfig::load_from_file(path).with_context(|| format!("Failed to load config {path}"))?
        }
        None => RenderConfig::default(),
    };

    override_value(matches, "width", &mut config.width);
    override_value(matches, "height", &mut config.height);
    override_value(matches, "night-floor", &mut config.shading.night_floor);
    override_value(matches, "gamma", &mut config.shading.gamma);
    override_value(matches, "exposure", &mut config.shading.exposure);
    override_value(matches, "texture-offset", &mut config.texture_lon_offset_deg);
    override_value(matches, "water-boost", &mut config.water.boost);
    override_value(matches, "water-hue-lo", &mut config.water.hue_lo_deg);
    override_value(matches, "water-hue-hi", &mut config.water.hue_hi_deg);
    override_value(matches, "water-sat-min", &mut config.water.sat_min);
    override_value(matches, "fudge-lon", &mut config.calibration.fudge_lon_deg);
    override_value(matches, "roll", &mut config.calibration.roll_deg);

    if matches.get_flag("no-shading") {
        config.shading.disabled = true;
    }
    if matches.get_flag("test-pattern") {
        config.test_pattern = true;
    }
    if matches.get_flag("debug-overlay") {
        config.debug_overlay = true;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn parse_start(value: &str) -> Result<TimeInstant> {
    let datetime = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("--at expects an RFC 3339 timestamp, got {value:?}"))?;
    Ok(TimeInstant::from_datetime(datetime.with_timezone(&Utc)))
}

fn loop_settings(matches: &ArgMatches) -> Result<LoopSettings> {
    let start = matches.get_one::<String>("at").map(|s| parse_start(s)).transpose()?;
    let frames = *matches.get_one::<u64>("frames").ok_or_else(|| anyhow!("missing --frames"))?;
    let interval_ms = *matches
        .get_one::<u64>("interval-ms")
        .ok_or_else(|| anyhow!("missing --interval-ms"))?;
    Ok(LoopSettings {
        start,
        frames,
        interval: Duration::from_millis(interval_ms),
    })
}

/// Render and present frames until the frame budget runs out.
///
/// One render is in flight at a time. After each frame the loop sleeps for
/// whatever is left of the interval; a slow frame delays the next one.
fn run(renderer: &EarthRenderer, settings: &LoopSettings, presenter: &mut dyn FramePresenter) -> Result<u64> {
    let clock = Stopwatch::start_new();
    let mut frame = RasterFrame::new(renderer.config().width, renderer.config().height);
    let mut index = 0u64;

    loop {
        let frame_timer = Stopwatch::start_new();
        let time = settings
            .start
            .map_or_else(TimeInstant::now, |start| start.offset(clock.elapsed().as_secs_f64()));

        let geometry = renderer.render_into(time, &mut frame);
        let info = FrameInfo {
            index,
            time,
            geometry,
            render_time: frame_timer.elapsed(),
        };
        presenter
            .present(&frame, &info)
            .with_context(|| format!("Failed to present frame {index}"))?;
        index += 1;

        if settings.frames != 0 && index >= settings.frames {
            return Ok(index);
        }

        let remaining = settings.interval.saturating_sub(frame_timer.elapsed());
        if remaining.is_zero() {
            log::warn!("Frame {} overran the {:?} interval", index - 1, settings.interval);
        } else {
            thread::sleep(remaining);
        }
    }
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    logging::init(if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    let config = layered_config(&matches)?;
    let settings = loop_settings(&matches)?;
    let texture = matches.get_one::<PathBuf>("texture");

    let renderer = EarthRenderer::from_config(config, texture.map(PathBuf::as_path))
        .context("Failed to create renderer")?;

    log::info!(
        "Starting redraw loop: {:?} interval, {}",
        settings.interval,
        match settings.frames {
            0 => "until interrupted".to_string(),
            n => format!("{n} frames"),
        }
    );

    let mut presenter = LogPresenter::default();
    let rendered = run(&renderer, &settings, &mut presenter)?;
    log::info!("Rendered {} frames", rendered);
    Ok(())
}
