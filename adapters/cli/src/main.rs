#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Neon Arcade games headlessly.

mod autopilot;
mod layout_transfer;
mod scores;

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use neon_arcade_core::{Event, HudSnapshot, WELCOME_BANNER};
use neon_arcade_engine::{
    record_high_score, run_frames, schedule::step_duration, DefenseEngine, EngineConfig,
    FrameScheduler, IntervalScheduler, ManualClock, Simulation, SurvivorEngine,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    autopilot::{DefensePilot, SurvivorPilot},
    layout_transfer::{LayoutSnapshot, PlacedStructure},
    scores::FileScores,
};

/// Headless host for the Neon Arcade games.
#[derive(Debug, Parser)]
#[command(name = "neon-arcade", version, about)]
struct Cli {
    /// TOML file overriding the default tuning.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Seed for every random draw; overrides the configured seed.
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// TOML file recording the best score of each game.
    #[arg(long, global = true)]
    scores: Option<PathBuf>,
    #[command(subcommand)]
    game: Game,
}

#[derive(Debug, Subcommand)]
enum Game {
    /// Lane defense: build a maze, then hold it against waves.
    Defense(DefenseArgs),
    /// Survivor: outlast the horde and collect upgrades.
    Survivor(SurvivorArgs),
}

#[derive(Debug, Args)]
struct DefenseArgs {
    /// Frames to simulate.
    #[arg(long, default_value_t = 36_000)]
    frames: u64,
    /// Stop launching waves after this one.
    #[arg(long)]
    waves: Option<u32>,
    /// File holding a layout string to build before the first wave.
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Print the final layout string.
    #[arg(long)]
    export_layout: bool,
    /// Pace frames against the wall clock.
    #[arg(long)]
    realtime: bool,
}

#[derive(Debug, Args)]
struct SurvivorArgs {
    /// Frames to simulate.
    #[arg(long, default_value_t = 36_000)]
    frames: u64,
    /// Pace frames against the wall clock.
    #[arg(long)]
    realtime: bool,
}

/// Entry point for the Neon Arcade command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    let mut scores = cli.scores.as_deref().map(FileScores::open).transpose()?;

    println!("{WELCOME_BANNER}");
    let (game, hud) = match cli.game {
        Game::Defense(args) => run_defense(&config, &args)?,
        Game::Survivor(args) => run_survivor(&config, &args),
    };

    if let Some(scores) = scores.as_mut() {
        if record_high_score(scores, game, hud.score)? {
            println!("New high score for {game}: {}", hud.score);
        }
    }
    Ok(())
}

fn run_defense(
    config: &EngineConfig,
    args: &DefenseArgs,
) -> Result<(&'static str, HudSnapshot)> {
    let mut engine =
        DefenseEngine::new(&config.lane, config.seed).context("invalid lane layout")?;
    if let Some(path) = &args.layout {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read layout {}", path.display()))?;
        import_layout(&mut engine, config, &source)?;
    }

    let mut pilot = DefensePilot::new(&config.lane.rules(), args.waves);
    pilot.drive(&mut engine);
    let ticks = play(&mut engine, args.frames, args.realtime, |engine| pilot.drive(engine));

    let hud = engine.snapshot();
    info!(ticks, "defense session finished");
    println!(
        "wave {} | lives {} | money {} | score {} | frame {}{}",
        hud.wave,
        hud.lives,
        hud.money,
        hud.score,
        hud.frame,
        if hud.is_game_over() { " | game over" } else { "" }
    );

    if args.export_layout {
        let snapshot = LayoutSnapshot {
            columns: config.lane.columns,
            rows: config.lane.rows,
            structures: engine
                .structures()
                .into_iter()
                .map(|(cell, structure)| PlacedStructure { cell, structure })
                .collect(),
        };
        println!("{}", snapshot.encode().context("failed to encode layout")?);
    }
    Ok((engine.game_name(), hud))
}

fn import_layout(engine: &mut DefenseEngine, config: &EngineConfig, source: &str) -> Result<()> {
    let layout = LayoutSnapshot::decode(source).context("invalid layout string")?;
    if (layout.columns, layout.rows) != (config.lane.columns, config.lane.rows) {
        bail!(
            "layout targets a {}x{} grid but the configured grid is {}x{}",
            layout.columns,
            layout.rows,
            config.lane.columns,
            config.lane.rows
        );
    }
    for placed in layout.structures {
        if let Err(reason) = engine.try_place(placed.cell, placed.structure) {
            warn!(
                cell = ?placed.cell,
                structure = ?placed.structure,
                %reason,
                "layout entry skipped"
            );
        }
    }
    Ok(())
}

fn run_survivor(config: &EngineConfig, args: &SurvivorArgs) -> (&'static str, HudSnapshot) {
    let mut engine = SurvivorEngine::new(&config.survivor, config.seed);
    let mut pilot = SurvivorPilot::default();
    pilot.drive(&mut engine);
    let ticks = play(&mut engine, args.frames, args.realtime, |engine| pilot.drive(engine));

    let hud = engine.snapshot();
    info!(ticks, "survivor session finished");
    println!(
        "level {} | hp {:.0}/{:.0} | xp {}/{} | score {} | frame {}{}",
        hud.level,
        hud.hit_points,
        hud.max_hit_points,
        hud.experience,
        hud.experience_threshold,
        hud.score,
        hud.frame,
        if hud.is_game_over() { " | game over" } else { "" }
    );
    (engine.game_name(), hud)
}

/// Runs `simulation` for `frames` frames, logging notable events as they drain.
fn play<S, F>(simulation: &mut S, frames: u64, realtime: bool, mut drive: F) -> u64
where
    S: Simulation,
    F: FnMut(&mut S),
{
    let mut scheduler: Box<dyn FrameScheduler> = if realtime {
        Box::new(IntervalScheduler::new(step_duration(), Some(frames)))
    } else {
        Box::new(ManualClock::new(frames))
    };
    run_frames(simulation, scheduler.as_mut(), |simulation| {
        for event in simulation.drain_events() {
            log_event(&event);
        }
        drive(simulation);
    })
}

fn log_event(event: &Event) {
    match event {
        Event::WaveStarted { plan } => info!(
            wave = plan.wave,
            category = ?plan.category,
            count = plan.count,
            "wave incoming"
        ),
        Event::WaveCleared { wave, reward } => info!(wave, reward, "wave cleared"),
        Event::LifeLost { remaining } => info!(remaining, "life lost"),
        Event::LevelUp { level, options } => {
            let options: Vec<&str> = options.iter().map(|option| option.id()).collect();
            info!(level, ?options, "level up");
        }
        Event::UpgradeApplied { upgrade } => info!(upgrade = upgrade.id(), "upgrade applied"),
        Event::GameOver => info!("game over"),
        _ => {}
    }
}
