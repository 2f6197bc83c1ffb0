//! Binary entrypoint for the slideshow.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::io::{self, BufReader};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use rust_slideshow::config::Configuration;
use rust_slideshow::events::{COMMAND_HELP, Command};
use rust_slideshow::render::ImageCrateDecoder;
use rust_slideshow::surface::ConsoleSurface;
use rust_slideshow::tasks::controller::{self, Slideshow, SlideshowOptions};
use rust_slideshow::tasks::input;

#[derive(Debug, Parser)]
#[command(name = "rust-slideshow", version, about = "Image viewer and slideshow")]
struct Cli {
    /// Path to YAML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Image directory to open (overrides the config file)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Override the slideshow delay (ms)
    #[arg(long, value_name = "MILLIS")]
    delay_ms: Option<u64>,

    /// Write the current frame to this PNG file
    #[arg(long, value_name = "FILE")]
    output_frame: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(
        format!("rust_slideshow={level}")
            .parse()
            .context("building log filter")?,
    );
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Configuration> {
    let mut cfg = match &cli.config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Configuration::default(),
    };
    if let Some(dir) = &cli.dir {
        cfg.image_directory = Some(dir.clone());
    }
    if let Some(ms) = cli.delay_ms {
        cfg.slide_delay = Duration::from_millis(ms);
    }
    if let Some(frame) = &cli.output_frame {
        cfg.output_frame = Some(frame.clone());
    }
    cfg.validated().context("validating configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let cfg = load_config(&cli)?;
    info!(
        dir = ?cfg.image_directory,
        delay = %humantime::format_duration(cfg.slide_delay),
        "configuration loaded"
    );

    let decoder = ImageCrateDecoder {
        apply_exif_orientation: cfg.apply_exif_orientation,
    };
    let surface = ConsoleSurface::new(io::stdout(), cfg.output_frame.clone());
    let mut slideshow = Slideshow::new(SlideshowOptions::from(&cfg), decoder, surface);
    slideshow
        .start(cfg.image_directory.as_deref())
        .context("opening image directory")?;
    eprintln!("{COMMAND_HELP}");

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(16);
    let cancel = CancellationToken::new();

    // stdin -> commands; EOF closes the channel and ends the controller.
    // A detached thread, so a pending read never holds up runtime shutdown.
    std::thread::Builder::new()
        .name("stdin-commands".into())
        .spawn(move || {
            if let Err(err) = input::read_commands(BufReader::new(io::stdin()), cmd_tx) {
                tracing::warn!("input reader failed: {err:?}");
            }
        })
        .context("spawning input thread")?;

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("ctrl-c handler failed: {err}");
                return;
            }
            info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    controller::run(slideshow, cmd_rx, cfg.slide_delay, cancel.clone())
        .await
        .context("controller failed")?;
    cancel.cancel();
    info!("slideshow closed");
    Ok(())
}
