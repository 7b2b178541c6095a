use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use eframe::egui;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quarter_pi::config::{self, Config, SourceKind};
use quarter_pi::display::{Fanout, Headless, PngSequence, PngSnapshot};
use quarter_pi::sampler::{Lcg, RandSource, UnitSource};
use quarter_pi::window::PlotApp;
use quarter_pi::Driver;

fn command() -> Command {
    Command::new("quarter_pi")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Estimates pi by scattering random points over the unit quarter circle")
        .arg(
            Arg::new("frames")
                .help(format!(
                    "Number of points to draw, one per frame [default: {}]",
                    config::DEFAULT_FRAMES
                ))
                .long("frames")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("interval-ms")
                .help(format!(
                    "Delay between frames in milliseconds, 0 to run unpaced [default: {}]",
                    config::DEFAULT_INTERVAL.as_millis()
                ))
                .long("interval-ms")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("seed")
                .help("Seed for the random source")
                .long("seed")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("source")
                .help("Random source [default: rand]")
                .long("source")
                .value_parser(["rand", "lcg"]),
        )
        .arg(
            Arg::new("width")
                .help(format!("Canvas width in pixels [default: {}]", config::DEFAULT_CANVAS))
                .long("width")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("height")
                .help(format!("Canvas height in pixels [default: {}]", config::DEFAULT_CANVAS))
                .long("height")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("point-size")
                .help(format!(
                    "Side of each plotted point in pixels [default: {}]",
                    config::DEFAULT_POINT_SIZE
                ))
                .long("point-size")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("snapshot")
                .help("Write the final frame to this PNG file")
                .long("snapshot")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("frames-dir")
                .help("Write every frame as a PNG into this directory")
                .long("frames-dir")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("headless")
                .help("Run without a window")
                .long("headless")
                .action(ArgAction::SetTrue),
        )
}

/// Starts from `Config::default()` and applies whatever flags were given.
fn config_from(matches: &ArgMatches) -> Config {
    let mut config = Config::default();
    if let Some(frames) = matches.get_one::<usize>("frames").copied() {
        config.frames = frames;
    }
    if let Some(ms) = matches.get_one::<u64>("interval-ms").copied() {
        config.interval = Duration::from_millis(ms);
    }
    config.seed = matches.get_one::<u64>("seed").copied();
    if let Some("lcg") = matches.get_one::<String>("source").map(String::as_str) {
        config.source = SourceKind::Lcg;
    }
    if let Some(width) = matches.get_one::<u32>("width").copied() {
        config.width = width;
    }
    if let Some(height) = matches.get_one::<u32>("height").copied() {
        config.height = height;
    }
    if let Some(size) = matches.get_one::<u32>("point-size").copied() {
        config.point_size = size;
    }
    config.snapshot = matches.get_one::<PathBuf>("snapshot").cloned();
    config.frames_dir = matches.get_one::<PathBuf>("frames-dir").cloned();
    config.headless = matches.get_flag("headless");
    config
}

fn source_for(config: &Config) -> Box<dyn UnitSource> {
    match (config.source, config.seed) {
        (SourceKind::Lcg, seed) => Box::new(seed.map_or_else(Lcg::default, |s| Lcg::new(s as u32))),
        (SourceKind::Rand, Some(seed)) => Box::new(RandSource::new(StdRng::seed_from_u64(seed))),
        (SourceKind::Rand, None) => Box::new(RandSource::new(StdRng::from_entropy())),
    }
}

/// File sinks requested on the command line.
fn sinks_for(config: &Config) -> quarter_pi::Result<Fanout> {
    let mut sinks = Fanout::new();
    if let Some(dir) = &config.frames_dir {
        sinks.push(PngSequence::create(dir)?);
    }
    if let Some(path) = &config.snapshot {
        sinks.push(PngSnapshot::new(path));
    }
    Ok(sinks)
}

fn run_headless(config: &Config) -> anyhow::Result<()> {
    let mut sinks = sinks_for(config).context("Failed to prepare frame output")?;
    sinks.push(Headless::new());
    let mut driver = Driver::new(config, source_for(config), sinks, std::io::stdout().lock())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to build runtime")?;
    runtime.block_on(driver.run()).context("Run failed")?;
    Ok(())
}

fn run_window(config: Config) -> anyhow::Result<()> {
    let sinks = sinks_for(&config).context("Failed to prepare frame output")?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width as f32 + 32.0, config.height as f32 + 64.0])
            .with_title("Monte Carlo estimate of pi"),
        ..Default::default()
    };

    eframe::run_native(
        "quarter_pi",
        options,
        Box::new(move |cc| {
            let app = PlotApp::new(
                &cc.egui_ctx,
                &config,
                source_for(&config),
                sinks,
                std::io::stdout(),
            )?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow!("Window failed: {}", err))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config_from(&command().get_matches());
    config.validate()?;
    info!(
        frames = config.frames,
        interval_ms = config.interval.as_millis() as u64,
        source = ?config.source,
        seed = ?config.seed,
        width = config.width,
        height = config.height,
        headless = config.headless,
        "starting"
    );

    if config.headless {
        run_headless(&config)
    } else {
        run_window(config)
    }
}
