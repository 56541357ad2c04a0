use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use flipbook_engine::{
    AlwaysVisible, Cadence, DefaultAssetLoader, FitMode, Projector, RasterSurface,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the sheet manifest JSON
    #[arg(value_name = "MANIFEST")]
    manifest: PathBuf,

    /// Script to play (defaults to the full catalog)
    #[arg(long, default_value = "all")]
    script: String,

    /// Surface width in pixels
    #[arg(long, default_value_t = 128)]
    width: u32,

    /// Surface height in pixels
    #[arg(long, default_value_t = 128)]
    height: u32,

    /// Scale frames to fit the surface instead of drawing at native size
    #[arg(long)]
    fill: bool,

    /// How long to run playback, in milliseconds
    #[arg(long, default_value_t = 2000)]
    duration: u64,

    /// Write the final surface to this PNG
    #[arg(long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(cli.log_level.to_string().parse()?)
        .from_env_lossy();
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let fit = if cli.fill {
        FitMode::Contain
    } else {
        FitMode::Native
    };
    let projector = Projector::new(
        RasterSurface::new(cli.width, cli.height),
        Box::new(AlwaysVisible),
        Arc::new(DefaultAssetLoader),
        fit,
    );

    projector.load(&cli.manifest.to_string_lossy()).await;
    if !projector.is_loaded() {
        anyhow::bail!("sheet did not load; see log output");
    }
    projector.play(&cli.script).await;

    // Stand in for the host's animation callback: tick on a ~60Hz cadence
    // until playback halts or the requested duration elapses.
    let start = Instant::now();
    loop {
        let now = start.elapsed().as_secs_f64() * 1000.0;
        if now >= cli.duration as f64 {
            break;
        }
        if projector.tick(now) == Cadence::Halt {
            break;
        }
        tokio::time::sleep(Duration::from_millis(16)).await;
    }
    projector.stop().await;

    if let Some(path) = &cli.output {
        projector.with_surface(|s| s.save_png(path))?;
        info!(path = %path.display(), "surface written");
    }
    Ok(())
}
