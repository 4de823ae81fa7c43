//! Sky Runner - procedural endless-runner platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level generation, avatar physics, collisions)
//! - `render`: Renderer-facing draw list built from live entities
//! - `tuning`: Data-driven gameplay constants
//! - `settings`: Presentation preferences (camera shake, FOV, sensitivity)

pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{ArchetypeWeights, Tuning};

/// Game configuration constants
pub mod consts {
    /// Frame step used by the headless driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta handed to the simulation
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Gravity (units/s², negative is down)
    pub const GRAVITY: f32 = -30.0;
    /// Vertical velocity applied on jump
    pub const JUMP_IMPULSE: f32 = 15.0;

    /// Movement speeds
    pub const BASE_SPEED: f32 = 10.0;
    pub const SPRINT_SPEED: f32 = 18.0;
    pub const CROUCH_SPEED: f32 = 6.0;

    /// Avatar body
    pub const NORMAL_HEIGHT: f32 = 2.0;
    pub const CROUCH_HEIGHT: f32 = 1.0;
    /// Half of the avatar's horizontal footprint
    pub const AVATAR_HALF_WIDTH: f32 = 0.5;
    /// Box extent above the eye position
    pub const HEAD_MARGIN: f32 = 0.2;

    /// Camera field of view (degrees)
    pub const BASE_FOV: f32 = 75.0;
    pub const SPRINT_FOV: f32 = 85.0;

    /// World streaming
    pub const RETENTION_CAP: usize = 300;
    pub const RENDER_DISTANCE: f32 = 200.0;
    /// Entities that must lie ahead of an eviction candidate
    pub const MIN_ENTITIES_AHEAD: usize = 20;

    /// Progression
    pub const GOAL_TARGET: u32 = 100;
    /// Opening segments drawn from the easy archetypes only
    pub const EASY_SEGMENTS: u32 = 15;
    /// Segments generated at start-up without a checkpoint in front
    pub const INITIAL_SAFE_SEGMENTS: u32 = 5;

    /// Falling below this height respawns at the last checkpoint
    pub const FALL_THRESHOLD: f32 = -50.0;
    /// Height added to the checkpoint anchor on respawn
    pub const RESPAWN_DROP: f32 = 10.0;
}

/// Exponential-ish blend of `current` toward `target` at `rate` per second
#[inline]
pub fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * rate * dt
}
