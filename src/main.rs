//! Sky Runner headless driver
//!
//! Runs the simulation with a simple autopilot at a fixed 60 Hz step, feeding
//! a draw list and a logging HUD. Useful for replaying seeds and inspecting
//! generated courses.
//!
//! Usage:
//!   sky-runner --seed 42 --ticks 3600
//!   sky-runner --tuning tuning.json --settings settings.json --dump

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use sky_runner::consts::SIM_DT;
use sky_runner::render::DrawList;
use sky_runner::sim::{
    Archetype, Avatar, Hud, InputState, RenderSink, RunPhase, RunState, spawn_world, tick,
};
use sky_runner::{Settings, Tuning};

#[derive(Parser)]
#[command(name = "sky-runner")]
#[command(about = "Procedural endless-runner course generator and simulator")]
struct Cli {
    /// Run seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Frames to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,
    /// JSON file overriding gameplay tuning
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// JSON file with presentation settings
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Disable sprint camera jitter
    #[arg(long)]
    no_shake: bool,
    /// Print a JSON summary of the run to stdout
    #[arg(long)]
    dump: bool,
}

/// HUD that logs progress
struct LogHud;

impl Hud for LogHud {
    fn checkpoint_progress(&mut self, collected: u32, total: u32) {
        log::info!("Checkpoint {}/{}", collected, total);
    }

    fn goal_reached(&mut self) {
        log::info!("Course complete!");
    }
}

/// Serializable end-of-run report
#[derive(Serialize)]
struct Summary<'a> {
    seed: u64,
    ticks: u64,
    complete: bool,
    checkpoints: (u32, u32),
    segments_generated: u32,
    frontier_z: f32,
    live_entities: usize,
    spawned: u64,
    released: u64,
    archetypes: Vec<(Archetype, u32)>,
    avatar: &'a Avatar,
}

fn load_json<T>(path: &Path, parse: impl Fn(&str) -> Result<T>) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(&text).with_context(|| format!("failed to load {}", path.display()))
}

/// Hold forward, sprint on straights and hop periodically
fn autopilot(state: &RunState) -> InputState {
    let t = state.time_ticks;
    InputState {
        forward: true,
        sprint: t % 240 < 180,
        jump: state.avatar.on_ground && t % 40 == 0,
        ..Default::default()
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let tuning = match &cli.tuning {
        Some(path) => load_json(path, Tuning::from_json)?,
        None => Tuning::default(),
    };
    let mut settings = match &cli.settings {
        Some(path) => load_json(path, Settings::from_json)?,
        None => Settings::default(),
    };
    if cli.no_shake {
        settings.screen_shake = false;
    }

    let seed = cli.seed.unwrap_or_else(rand::random);
    log::info!("Sky Runner starting with seed: {}", seed);

    let mut state = RunState::new(seed, tuning, &settings);
    log::info!(
        "Course of {} segments, {} checkpoints",
        state.world.tuning().goal_target,
        state.world.total_checkpoints()
    );
    let mut draw_list = DrawList::new();
    let mut hud = LogHud;
    spawn_world(&state, &mut draw_list);

    let mut last_segments = state.world.segments_generated();
    while state.time_ticks < cli.ticks && state.phase == RunPhase::Running {
        let input = autopilot(&state);
        tick(&mut state, &input, SIM_DT, &mut draw_list, &mut hud);
        draw_list.sync(state.world.entities());

        if state.world.segments_generated() != last_segments {
            last_segments = state.world.segments_generated();
            if last_segments % 10 == 0 {
                log::info!(
                    "{} segments generated, frontier {:.1}, {} boxes live",
                    last_segments,
                    state.world.frontier_z(),
                    draw_list.len()
                );
            }
        }
    }

    let mut archetypes: Vec<(Archetype, u32)> = Vec::new();
    for &archetype in state.world.archetypes() {
        match archetypes.iter_mut().find(|(a, _)| *a == archetype) {
            Some((_, count)) => *count += 1,
            None => archetypes.push((archetype, 1)),
        }
    }

    let (collected, total) = state.progress();
    log::info!(
        "Run finished after {} ticks: {}/{} checkpoints, avatar at {:?}",
        state.time_ticks,
        collected,
        total,
        state.avatar.position
    );

    if cli.dump {
        let (spawned, released) = draw_list.totals();
        let summary = Summary {
            seed,
            ticks: state.time_ticks,
            complete: state.is_complete(),
            checkpoints: (collected, total),
            segments_generated: state.world.segments_generated(),
            frontier_z: state.world.frontier_z(),
            live_entities: state.world.entities().len(),
            spawned,
            released,
            archetypes,
            avatar: &state.avatar,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    // Hand the remaining boxes back before exit
    let live: Vec<_> = state.world.entities().to_vec();
    for entity in live {
        draw_list.release(entity);
    }
    Ok(())
}
