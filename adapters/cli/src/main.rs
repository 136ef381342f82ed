#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line shell for the Troposphere simulation.
//!
//! `troposphere run` plays a level from a scripted input file and prints a
//! summary; `troposphere inspect` decodes a layout transfer string.

mod level_transfer;
mod script;

use std::{
    collections::BTreeMap,
    fs, iter,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use troposphere_core::{Command, ControlInput, Event, Tuning};
use troposphere_rendering::Scene;
use troposphere_world::{apply, query, Phase, World, DEFAULT_SEED};

use crate::{level_transfer::LevelLayoutSnapshot, script::Script};

/// Simulated time between two ticks at 60 Hz.
const TICK: Duration = Duration::from_micros(16_667);

/// Runs the Troposphere platformer simulation without a window.
#[derive(Debug, Parser)]
#[command(name = "troposphere", version)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Plays a level from scripted input and prints a summary.
    Run(RunArgs),
    /// Prints the contents of a layout transfer string.
    Inspect {
        /// String produced by `run --export-layout`.
        layout: String,
    },
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Level to start; 0 is the idle screen.
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Seed for level generation and the simulation RNG.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Input script, one `<ticks> <keys...>` step per line.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Idle ticks to simulate after the script ends.
    #[arg(long, default_value_t = 0)]
    idle_ticks: u32,
    /// TOML file overriding tuning values.
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Print the final render scene as JSON.
    #[arg(long)]
    scene: bool,
    /// Print a transfer string describing the final level layout.
    #[arg(long)]
    export_layout: bool,
}

/// Entry point for the Troposphere command-line interface.
fn main() -> Result<()> {
    init_tracing();
    match Cli::parse().mode {
        Mode::Run(args) => run(&args),
        Mode::Inspect { layout } => inspect(&layout),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(args: &RunArgs) -> Result<()> {
    let tuning = match &args.tuning {
        Some(path) => load_tuning(path)?,
        None => Tuning::default(),
    };
    let script = match &args.script {
        Some(path) => Script::load(path).context("failed to load input script")?,
        None => Script::default(),
    };
    debug!(
        scripted_ticks = script.len(),
        idle_ticks = args.idle_ticks,
        "script_loaded"
    );

    let mut world = World::with_tuning(tuning, args.seed);
    let mut events = Vec::new();
    let mut tally = EventTally::default();
    apply(
        &mut world,
        Command::StartLevel { number: args.level },
        &mut events,
    );
    tally.record(&events);

    let idle = iter::repeat(ControlInput::IDLE).take(args.idle_ticks as usize);
    let mut now = Duration::ZERO;
    for input in script.inputs().chain(idle) {
        if query::phase(&world) == Phase::GameFinished {
            break;
        }
        now += TICK;
        events.clear();
        apply(&mut world, Command::Tick { input, now }, &mut events);
        tally.record(&events);
    }
    info!(ticks = tally.ticks, "run_finished");

    print_summary(&world, &tally);
    if args.scene {
        let scene = Scene::capture(
            query::level(&world),
            query::camera(&world),
            query::tuning(&world),
        );
        println!(
            "{}",
            serde_json::to_string_pretty(&scene).context("failed to serialise scene")?
        );
    }
    if args.export_layout {
        let snapshot = LevelLayoutSnapshot::capture(query::level(&world), query::seed(&world));
        println!(
            "{}",
            snapshot.encode().context("failed to encode level layout")?
        );
    }
    Ok(())
}

fn inspect(layout: &str) -> Result<()> {
    let snapshot =
        LevelLayoutSnapshot::decode(layout).context("failed to decode layout string")?;
    println!("level      {}", snapshot.number);
    println!("size       {}x{}", snapshot.width, snapshot.height);
    println!("seed       {}", snapshot.seed);
    match snapshot.spawn {
        Some(spawn) => println!("spawn      ({:.1}, {:.1})", spawn.x, spawn.y),
        None => println!("spawn      none"),
    }
    println!("platforms  {}", snapshot.platforms.len());
    println!("ladders    {}", snapshot.ladders.len());
    println!("portals    {}", snapshot.portals.len());
    println!("hostiles   {}", snapshot.hostiles.len());
    Ok(())
}

fn load_tuning(path: &Path) -> Result<Tuning> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file at {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse tuning toml at {}", path.display()))
}

/// Counts the events a run produced, keyed by kind.
#[derive(Debug, Default)]
struct EventTally {
    ticks: u64,
    counts: BTreeMap<&'static str, u64>,
}

impl EventTally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            if matches!(event, Event::TimeAdvanced { .. }) {
                self.ticks += 1;
            }
            *self.counts.entry(event_name(event)).or_insert(0) += 1;
        }
    }
}

fn event_name(event: &Event) -> &'static str {
    match event {
        Event::LevelStarted { .. } => "level_started",
        Event::GameFinished => "game_finished",
        Event::TimeAdvanced { .. } => "time_advanced",
        Event::TimeTravelRefused => "time_travel_refused",
        Event::PlayerHit { .. } => "player_hit",
        Event::PlayerDied { .. } => "player_died",
        Event::LevelFinished { .. } => "level_finished",
        Event::CameraShaken { .. } => "camera_shaken",
    }
}

fn print_summary(world: &World, tally: &EventTally) {
    println!("level      {}", query::level_number(world));
    println!("phase      {:?}", query::phase(world));
    println!("ticks      {}", tally.ticks);
    match query::player(world) {
        Some(player) => {
            println!(
                "player     ({:.1}, {:.1}) {:?}",
                player.body.x, player.body.y, player.state
            );
            println!("energy     {}", player.energy);
        }
        None => println!("player     none"),
    }
    for (name, count) in &tally.counts {
        println!("  {name:<20} {count}");
    }
}
