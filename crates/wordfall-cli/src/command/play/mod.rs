use std::{fs, path::PathBuf};

use anyhow::Context as _;
use wordfall_engine::{GameConfig, GameSession, GeneratorSeed, NullSink, SessionSink};

use crate::{command::play::app::PlayApp, sink::JsonlSink, tui::Tui};

mod app;

const FPS: u64 = 60;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed as a 32-character hex string; the same seed replays the same game
    #[clap(long)]
    seed: Option<GeneratorSeed>,
    /// Path to a JSON file with challenges, vocabulary, and palette
    #[clap(long)]
    config: Option<PathBuf>,
    /// Append session events to this file as JSON lines
    #[clap(long)]
    record: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        seed,
        config,
        record,
    } = arg;

    let config = match config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => GameConfig::default_content(),
    };

    let sink: Box<dyn SessionSink> = match record {
        Some(path) => Box::new(JsonlSink::create(path)?),
        None => Box::new(NullSink::default()),
    };

    let session = match seed {
        Some(seed) => GameSession::with_seed(config, FPS, sink, *seed)?,
        None => GameSession::new(config, FPS, sink)?,
    };

    let mut app = PlayApp::new(session);
    Tui::new().run(&mut app)
}
