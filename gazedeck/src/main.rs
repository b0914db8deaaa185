//! gazedeck - replay a recorded gaze trace through the session controller.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use gazedeck::clock::{Clock, ManualClock};
use gazedeck::config::AppConfig;
use gazedeck::controller::SessionController;
use gazedeck::deck::builder::ActionRegistry;
use gazedeck::input_source::{FrameSource, ScriptedFrames};
use gazedeck::session::SessionRecorder;

#[derive(Parser, Debug)]
#[command(name = "gazedeck", about = "Gaze-driven communication deck")]
struct Cli {
    /// TOML config file (default: built-in settings)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON-lines gaze trace to replay, one frame per line
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Where to write the session report (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// User identifier recorded in the session summary
    #[arg(long, default_value = "anonymous")]
    user_id: String,

    /// Session identifier (default: derived from the start time)
    #[arg(long)]
    session_id: Option<String>,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("gazedeck {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gazedeck=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    info!("gazedeck v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    let deck = config
        .build_deck(&ActionRegistry::with_phrases())
        .context("building deck")?;
    info!("deck ready: {} cards", deck.card_count());

    let mut frames = match &cli.trace {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening trace {}", path.display()))?;
            ScriptedFrames::from_jsonl(BufReader::new(file))
                .with_context(|| format!("reading trace {}", path.display()))?
        }
        None => ScriptedFrames::from_jsonl(io::stdin().lock())
            .context("reading trace from stdin")?,
    };
    info!("replaying {} frames", frames.remaining());

    let clock = ManualClock::new();
    let origin = clock.now();
    let started_at = clock.unix_millis();
    let session_id = cli
        .session_id
        .clone()
        .unwrap_or_else(|| format!("session-{started_at}"));
    let recorder = SessionRecorder::new(cli.user_id.clone(), session_id, started_at);
    let mut controller = SessionController::new(config, &deck, recorder);

    let mut last_t = 0.0;
    while let Some(frame) = frames.next_frame() {
        clock.advance_secs(frame.t_s - last_t);
        last_t = last_t.max(frame.t_s);
        let time = clock.frame_time(origin);
        let outcome = controller.step(&frame, time);
        if let Some(label) = &outcome.selected_card {
            info!("t={:.3}s selected '{}'", time.now_s, label);
        }
    }

    let report = controller.finish(clock.unix_millis());
    let json = report.to_json_pretty().context("serializing session report")?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("writing report {}", path.display()))?;
            info!("report written to {}", path.display());
        }
        None => {
            let mut out = io::stdout().lock();
            writeln!(out, "{json}").context("writing report to stdout")?;
        }
    }

    Ok(())
}
