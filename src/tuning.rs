//! Data-driven gameplay tuning
//!
//! Defaults come from [`crate::consts`]; a JSON file may override any subset.

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Relative weights for the archetype draw after the opening segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeWeights {
    pub standard: f32,
    pub flat_run: f32,
    pub slide: f32,
    pub dodge: f32,
    pub wide: f32,
    pub guided: f32,
}

impl Default for ArchetypeWeights {
    fn default() -> Self {
        Self {
            standard: 0.30,
            flat_run: 0.15,
            slide: 0.15,
            dodge: 0.15,
            wide: 0.125,
            guided: 0.125,
        }
    }
}

impl ArchetypeWeights {
    pub fn total(&self) -> f32 {
        self.standard + self.flat_run + self.slide + self.dodge + self.wide + self.guided
    }

    fn all(&self) -> [f32; 6] {
        [
            self.standard,
            self.flat_run,
            self.slide,
            self.dodge,
            self.wide,
            self.guided,
        ]
    }
}

/// Gameplay constants for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gravity: f32,
    pub jump_impulse: f32,
    pub base_speed: f32,
    pub sprint_speed: f32,
    pub crouch_speed: f32,
    pub normal_height: f32,
    pub crouch_height: f32,
    pub fall_threshold: f32,
    pub retention_cap: usize,
    pub min_entities_ahead: usize,
    pub render_distance: f32,
    pub goal_target: u32,
    pub easy_segments: u32,
    pub initial_safe_segments: u32,
    pub weights: ArchetypeWeights,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            base_speed: BASE_SPEED,
            sprint_speed: SPRINT_SPEED,
            crouch_speed: CROUCH_SPEED,
            normal_height: NORMAL_HEIGHT,
            crouch_height: CROUCH_HEIGHT,
            fall_threshold: FALL_THRESHOLD,
            retention_cap: RETENTION_CAP,
            min_entities_ahead: MIN_ENTITIES_AHEAD,
            render_distance: RENDER_DISTANCE,
            goal_target: GOAL_TARGET,
            easy_segments: EASY_SEGMENTS,
            initial_safe_segments: INITIAL_SAFE_SEGMENTS,
            weights: ArchetypeWeights::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let tuning: Tuning = serde_json::from_str(json).context("invalid tuning JSON")?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the generator or avatar cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.gravity < 0.0, "gravity must point down (got {})", self.gravity);
        ensure!(self.jump_impulse > 0.0, "jump_impulse must be positive");
        ensure!(
            self.crouch_speed > 0.0 && self.base_speed > 0.0 && self.sprint_speed > 0.0,
            "speeds must be positive"
        );
        ensure!(
            self.sprint_speed > self.base_speed,
            "sprint_speed ({}) must exceed base_speed ({})",
            self.sprint_speed,
            self.base_speed
        );
        ensure!(
            self.crouch_height > 0.0 && self.crouch_height <= self.normal_height,
            "crouch_height must be in (0, normal_height]"
        );
        ensure!(self.render_distance > 0.0, "render_distance must be positive");
        ensure!(self.retention_cap > 0, "retention_cap must be positive");
        ensure!(
            self.initial_safe_segments <= self.goal_target,
            "initial_safe_segments ({}) exceeds goal_target ({})",
            self.initial_safe_segments,
            self.goal_target
        );
        ensure!(
            self.weights.all().iter().all(|w| *w >= 0.0) && self.weights.total() > 0.0,
            "archetype weights must be non-negative with a positive sum"
        );
        Ok(())
    }

    /// Checkpoint platforms in a full level, the goal plaza included.
    ///
    /// Saturates when the safe sequence is longer than the course; the goal
    /// plaza is then the only checkpoint.
    pub fn total_checkpoints(&self) -> u32 {
        self.goal_target.saturating_sub(self.initial_safe_segments) + 1
    }
}
