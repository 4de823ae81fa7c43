//! Run state and simulation events

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::avatar::Avatar;
use super::entity::EntityId;
use super::world::WorldGenerator;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Something the avatar step observed, in the order it happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// First touch of a checkpoint platform; `collected` is the new total
    CheckpointCollected { platform: EntityId, collected: u32 },
    /// Respawn anchor moved to this platform
    CheckpointActivated {
        platform: EntityId,
        beacon: Option<EntityId>,
    },
    /// Avatar overlapped the goal plaza
    GoalReached { platform: EntityId },
    /// Fell below the world and was put back above the anchor
    Respawned { at: Vec3 },
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Running,
    /// Goal reached; further ticks do nothing
    Complete,
}

/// Everything one run owns
#[derive(Debug, Clone)]
pub struct RunState {
    pub seed: u64,
    pub world: WorldGenerator,
    pub avatar: Avatar,
    pub phase: RunPhase,
    /// Ticks simulated while running
    pub time_ticks: u64,
}

impl RunState {
    pub fn new(seed: u64, tuning: Tuning, settings: &Settings) -> Self {
        let avatar = Avatar::new(&tuning, settings, seed);
        let world = WorldGenerator::new(seed, tuning);
        Self {
            seed,
            world,
            avatar,
            phase: RunPhase::Running,
            time_ticks: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == RunPhase::Complete
    }

    /// Checkpoints collected and the level total
    pub fn progress(&self) -> (u32, u32) {
        (self.avatar.checkpoints_collected, self.world.total_checkpoints())
    }
}
