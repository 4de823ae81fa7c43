//! Level entities: platforms, obstacles and checkpoint beacons

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::volume::Volume;

/// Stable handle to an entity. Allocated in generation order, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Collision kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Walkable floor tile
    Platform,
    /// Wall, barrier, pillar or rail
    Obstacle,
    /// Non-solid marker above a checkpoint platform
    CheckpointBeacon,
}

/// Colors for level geometry (0xRRGGBB)
pub mod palette {
    /// Random tint pool for standard platforms
    pub const PLATFORM_TINTS: [u32; 5] = [0x00ffff, 0xff00ff, 0xffff00, 0x00ff00, 0xff5500];
    pub const START: u32 = 0x44aa88;
    pub const FLAT_RUN: u32 = 0x00aaff;
    pub const SLIDE: u32 = 0xff00ff;
    pub const DODGE: u32 = 0xffff00;
    pub const WIDE: u32 = 0x55ddaa;
    pub const GUIDED: u32 = 0x8899ff;
    pub const RAIL: u32 = 0xdddddd;
    pub const WALL: u32 = 0xff0044;
    pub const BARRIER: u32 = 0xffaa00;
    pub const PILLAR: u32 = 0xff4444;
    pub const CHECKPOINT: u32 = 0xffffff;
    pub const BEACON_IDLE: u32 = 0xff8800;
    pub const BEACON_ACTIVE: u32 = 0x00ff00;
    pub const FLOOR_ACTIVE_GLOW: u32 = 0x00aa00;
    pub const GOAL: u32 = 0xffd700;
    pub const GOAL_WALL: u32 = 0x996633;
}

/// A renderable box with a collision volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Box center in world space
    pub position: Vec3,
    /// Full box extents
    pub size: Vec3,
    /// Collision volume, kept in sync with `position`
    pub volume: Volume,
    /// Base color (0xRRGGBB)
    pub color: u32,
    /// Emissive glow, if any
    pub emissive: Option<u32>,
    /// Floor tile that grants a checkpoint on first touch
    pub is_checkpoint_platform: bool,
    /// Checkpoint credit already granted (never reset)
    pub is_collected: bool,
    /// Terminal platform; touching it ends the run
    pub is_goal_platform: bool,
    /// Exempt from eviction
    pub is_permanent: bool,
    /// Beacon standing on this platform (not owned)
    pub linked_beacon: Option<EntityId>,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, position: Vec3, size: Vec3, color: u32) -> Self {
        Self {
            id,
            kind,
            position,
            size,
            volume: Volume::from_center_size(position, size),
            color,
            emissive: None,
            is_checkpoint_platform: false,
            is_collected: false,
            is_goal_platform: false,
            is_permanent: false,
            linked_beacon: None,
        }
    }

    /// Beacons are pass-through; everything else blocks the avatar
    pub fn is_solid(&self) -> bool {
        self.kind != EntityKind::CheckpointBeacon
    }
}

/// Index of `id` in an entity list kept in id order
pub fn find_index(entities: &[Entity], id: EntityId) -> Option<usize> {
    entities.binary_search_by_key(&id, |e| e.id).ok()
}
