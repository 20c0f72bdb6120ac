use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{Board, Game, GameConfig, GameSeed};
use clap::{Parser, Subcommand};
use rand::Rng as _;

use crate::util;

use self::{play::PlayArg, simulate::SimulateArg};

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Run a headless game with random inputs and print a JSON report
    Simulate(#[clap(flatten)] SimulateArg),
}

/// Options shared by every mode that creates a game.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GameArg {
    /// Board width in cells
    #[clap(long, default_value_t = 10)]
    width: usize,
    /// Board height in cells
    #[clap(long, default_value_t = 20)]
    height: usize,
    /// Path to a game configuration file (JSON format)
    #[clap(long)]
    config: Option<PathBuf>,
    /// Seed for figure generation (32 hex digits), random if omitted
    #[clap(long)]
    seed: Option<GameSeed>,
}

impl Default for GameArg {
    fn default() -> Self {
        Self {
            width: 10,
            height: 20,
            config: None,
            seed: None,
        }
    }
}

impl GameArg {
    pub(crate) fn seed(&self) -> GameSeed {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }

    pub(crate) fn build_game(&self, seed: GameSeed) -> anyhow::Result<Game> {
        anyhow::ensure!(
            self.width > 0 && self.height > 0,
            "board size must be positive, got {}x{}",
            self.width,
            self.height
        );
        let config = match &self.config {
            Some(path) => util::read_json_file::<GameConfig, _>("game config", path)?,
            None => GameConfig::default(),
        };
        Game::with_seed(Board::new(self.width, self.height), config, seed)
            .context("Invalid game configuration")
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}
