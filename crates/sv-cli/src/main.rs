//! Spinvault - text-menu slot machine
//!
//! Usage:
//!   spinvault                         - play with the default data directory
//!   spinvault --player ana            - skip the name prompt
//!   spinvault --data-dir ./saves      - keep players and leaderboard elsewhere
//!   spinvault --seed 42               - replay the same reels and coin flips

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sv_economy::{EconomyEngine, GameConfig};

mod menu;
mod prompt;

use menu::Menu;
use prompt::Prompter;

#[derive(Parser)]
#[command(name = "spinvault", version, about = "Three-reel slot machine with a persistent player economy")]
struct Cli {
    /// JSON config file (missing file means defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding players.json and leaderboard.json
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Seed for reproducible reels, coin flips and bonuses
    #[arg(short, long)]
    seed: Option<u64>,

    /// Player name
    #[arg(short, long)]
    player: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }
    log::info!("Using data directory {}", config.storage.data_dir.display());

    let engine = EconomyEngine::open(&config, cli.seed).context("Failed to open player data")?;

    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout().lock());
    prompter.say("Welcome to Spinvault")?;
    let Some(player) = menu::login(&engine, &mut prompter, cli.player)? else {
        return Ok(());
    };

    Menu::new(engine, prompter, player).run()
}
