//! Segment archetypes
//!
//! Each archetype lays out one batch of platforms and obstacles starting at the
//! current frontier and moving it forward (toward -Z). Platforms are 1 unit
//! thick with their top at `y + 0.5`.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityKind, palette};
use crate::tuning::ArchetypeWeights;

/// Gap between consecutive fixed-layout platforms
pub const SEGMENT_GAP: f32 = 4.0;
/// Checkpoint safe zone footprint
pub const CHECKPOINT_SIZE: f32 = 30.0;
/// Checkpoint and goal floors are thicker than regular platforms
pub const THICK_FLOOR: f32 = 2.0;
/// Goal plaza footprint
pub const GOAL_SIZE: f32 = 60.0;
/// Lateral lanes in a dodge row
pub const DODGE_LANES: [f32; 3] = [-6.0, 0.0, 6.0];
pub const DODGE_ROWS: usize = 5;

/// Kinds of generated segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// 3-5 randomized platforms with small gaps
    Standard,
    /// One long platform with periodic walls
    FlatRun,
    /// Three platforms gated by crouch-height barriers
    Slide,
    /// Wide platform with pillar rows, one clear lane per row
    Dodge,
    /// Single wide obstacle-free platform
    Wide,
    /// Narrow platform with rails on both sides
    Guided,
    /// Terminal plaza
    Goal,
}

impl Archetype {
    /// Archetypes allowed during the opening stretch
    pub const EASY: [Archetype; 3] = [Archetype::FlatRun, Archetype::Wide, Archetype::Guided];

    /// Weighted pool for the rest of the run
    pub const WEIGHTED: [Archetype; 6] = [
        Archetype::Standard,
        Archetype::FlatRun,
        Archetype::Slide,
        Archetype::Dodge,
        Archetype::Wide,
        Archetype::Guided,
    ];

    pub fn is_easy(self) -> bool {
        Self::EASY.contains(&self)
    }

    /// Uniform draw from the easy subset
    pub fn pick_easy(rng: &mut Pcg32) -> Self {
        Self::EASY[rng.random_range(0..Self::EASY.len())]
    }

    /// Weighted draw over all six regular archetypes
    pub fn pick_weighted(rng: &mut Pcg32, weights: &ArchetypeWeights) -> Self {
        let table = [
            weights.standard,
            weights.flat_run,
            weights.slide,
            weights.dodge,
            weights.wide,
            weights.guided,
        ];
        let roll = rng.random::<f32>() * weights.total();
        let mut acc = 0.0;
        for (archetype, weight) in Self::WEIGHTED.iter().zip(table) {
            acc += weight;
            if roll < acc {
                return *archetype;
            }
        }
        // Float round-off on the last bucket
        Self::WEIGHTED
            .iter()
            .zip(table)
            .rev()
            .find(|(_, w)| *w > 0.0)
            .map(|(a, _)| *a)
            .unwrap_or(Archetype::Standard)
    }
}

/// Appends one segment's entities and tracks the moving frontier
pub struct SegmentBuilder<'a> {
    entities: &'a mut Vec<Entity>,
    next_id: &'a mut u32,
    rng: &'a mut Pcg32,
    /// Forward-most coordinate laid out so far
    pub frontier_z: f32,
    spawned: usize,
}

impl<'a> SegmentBuilder<'a> {
    pub fn new(
        entities: &'a mut Vec<Entity>,
        next_id: &'a mut u32,
        rng: &'a mut Pcg32,
        frontier_z: f32,
    ) -> Self {
        Self {
            entities,
            next_id,
            rng,
            frontier_z,
            spawned: 0,
        }
    }

    /// Entities appended by this builder
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    fn unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.unit() * (hi - lo)
    }

    fn push(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.push(entity);
        self.spawned += 1;
        id
    }

    fn alloc(&mut self) -> EntityId {
        let id = EntityId(*self.next_id);
        *self.next_id += 1;
        id
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().rev().find(|e| e.id == id)
    }

    /// Box of `size` centered at `center`
    pub fn spawn_box(&mut self, kind: EntityKind, center: Vec3, size: Vec3, color: u32) -> EntityId {
        let id = self.alloc();
        self.push(Entity::new(id, kind, center, size, color))
    }

    /// Regular 1-unit-thick platform
    pub fn spawn_platform(&mut self, x: f32, y: f32, z: f32, width: f32, depth: f32, color: u32) -> EntityId {
        self.spawn_box(
            EntityKind::Platform,
            Vec3::new(x, y, z),
            Vec3::new(width, 1.0, depth),
            color,
        )
    }

    /// Wall standing on a platform at `local_z` from its center
    fn spawn_wall_on(&mut self, platform: Vec3, platform_width: f32, local_z: f32) -> EntityId {
        let height = 2.0 + self.unit();
        let width = platform_width * (0.3 + self.unit() * 0.4);
        let x = (self.unit() - 0.5) * (platform_width - width);
        self.spawn_box(
            EntityKind::Obstacle,
            Vec3::new(
                platform.x + x,
                platform.y + 0.5 + height / 2.0,
                platform.z + local_z,
            ),
            Vec3::new(width, height, 1.0),
            palette::WALL,
        )
    }

    /// Lay out one archetype
    pub fn build(&mut self, archetype: Archetype) {
        match archetype {
            Archetype::Standard => self.standard(),
            Archetype::FlatRun => self.flat_run(),
            Archetype::Slide => self.slide(),
            Archetype::Dodge => self.dodge(),
            Archetype::Wide => self.wide(),
            Archetype::Guided => self.guided(),
            Archetype::Goal => self.goal_plaza(),
        }
    }

    /// Full-width safe floor with a beacon on it, cross-linked
    pub fn checkpoint(&mut self) -> EntityId {
        self.frontier_z -= SEGMENT_GAP;
        let z = self.frontier_z - CHECKPOINT_SIZE / 2.0;
        let floor_center = Vec3::new(0.0, 0.5 - THICK_FLOOR / 2.0, z);

        let floor = self.spawn_box(
            EntityKind::Platform,
            floor_center,
            Vec3::new(CHECKPOINT_SIZE, THICK_FLOOR, CHECKPOINT_SIZE),
            palette::CHECKPOINT,
        );
        let beacon = self.spawn_beacon(z, palette::BEACON_IDLE);
        if let Some(floor) = self.entity_mut(floor) {
            floor.is_checkpoint_platform = true;
            floor.linked_beacon = Some(beacon);
        }

        self.frontier_z -= CHECKPOINT_SIZE;
        floor
    }

    fn spawn_beacon(&mut self, z: f32, color: u32) -> EntityId {
        let height = 8.0;
        self.spawn_box(
            EntityKind::CheckpointBeacon,
            Vec3::new(0.0, 0.5 + height / 2.0, z),
            Vec3::new(1.0, height, 1.0),
            color,
        )
    }

    fn standard(&mut self) {
        let count = self.rng.random_range(3..=5);
        let mut z = self.frontier_z;

        for _ in 0..count {
            let gap = self.range(5.0, 10.0);
            let depth = self.range(15.0, 25.0);
            let width = self.range(8.0, 12.0);
            let x = (self.unit() - 0.5) * 12.0;
            let y = ((self.unit() - 0.5) * 5.0).clamp(-5.0, 5.0);
            let tint = palette::PLATFORM_TINTS[self.rng.random_range(0..palette::PLATFORM_TINTS.len())];

            z -= gap;
            let center_z = z - depth / 2.0;
            self.spawn_platform(x, y, center_z, width, depth, tint);
            if self.unit() > 0.6 {
                let local_z = (self.unit() - 0.5) * depth * 0.5;
                self.spawn_wall_on(Vec3::new(x, y, center_z), width, local_z);
            }
            z -= depth;
        }
        self.frontier_z = z;
    }

    fn flat_run(&mut self) {
        let depth = self.range(60.0, 100.0);
        let width = 12.0;
        self.frontier_z -= SEGMENT_GAP;
        let z = self.frontier_z - depth / 2.0;

        self.spawn_platform(0.0, 0.0, z, width, depth, palette::FLAT_RUN);

        let walls = (depth / 15.0).floor() as usize;
        let spacing = depth / walls as f32;
        for i in 0..walls {
            let local_z = i as f32 * spacing - depth / 2.0 + 5.0;
            self.spawn_wall_on(Vec3::new(0.0, 0.0, z), width, local_z);
        }
        self.frontier_z -= depth;
    }

    fn slide(&mut self) {
        let depth = 20.0;
        let width = 12.0;
        // Bottom edge sits above a crouched avatar's head box
        let barrier_height = 2.0;
        let barrier_y = 2.75;

        for _ in 0..3 {
            self.frontier_z -= SEGMENT_GAP;
            let z = self.frontier_z - depth / 2.0;
            self.spawn_platform(0.0, 0.0, z, width, depth, palette::SLIDE);
            self.spawn_box(
                EntityKind::Obstacle,
                Vec3::new(0.0, barrier_y, z),
                Vec3::new(width, barrier_height, 1.0),
                palette::BARRIER,
            );
            self.frontier_z -= depth;
        }
    }

    fn dodge(&mut self) {
        let depth = 50.0;
        let width = 20.0;
        self.frontier_z -= SEGMENT_GAP;
        let z = self.frontier_z - depth / 2.0;

        self.spawn_platform(0.0, 0.0, z, width, depth, palette::DODGE);

        let row_spacing = depth / DODGE_ROWS as f32;
        for row in 0..DODGE_ROWS {
            let row_z = z + (row as f32 - DODGE_ROWS as f32 / 2.0) * row_spacing;
            let safe_lane = self.rng.random_range(0..DODGE_LANES.len());
            for (lane, &x) in DODGE_LANES.iter().enumerate() {
                if lane == safe_lane {
                    continue;
                }
                self.spawn_box(
                    EntityKind::Obstacle,
                    Vec3::new(x, 2.0, row_z),
                    Vec3::splat(4.0),
                    palette::PILLAR,
                );
            }
        }
        self.frontier_z -= depth;
    }

    fn wide(&mut self) {
        let depth = self.range(40.0, 60.0);
        self.frontier_z -= SEGMENT_GAP;
        let z = self.frontier_z - depth / 2.0;
        self.spawn_platform(0.0, 0.0, z, 24.0, depth, palette::WIDE);
        self.frontier_z -= depth;
    }

    fn guided(&mut self) {
        let depth = self.range(40.0, 70.0);
        let width = 10.0;
        let rail_width = 0.5;
        let rail_height = 1.5;
        self.frontier_z -= SEGMENT_GAP;
        let z = self.frontier_z - depth / 2.0;

        self.spawn_platform(0.0, 0.0, z, width, depth, palette::GUIDED);
        for side in [-1.0, 1.0] {
            self.spawn_box(
                EntityKind::Obstacle,
                Vec3::new(
                    side * (width + rail_width) / 2.0,
                    0.5 + rail_height / 2.0,
                    z,
                ),
                Vec3::new(rail_width, rail_height, depth),
                palette::RAIL,
            );
        }
        self.frontier_z -= depth;
    }

    fn goal_plaza(&mut self) {
        let wall_height = 6.0;
        let wall_y = 0.5 + wall_height / 2.0;
        let half = GOAL_SIZE / 2.0;
        self.frontier_z -= SEGMENT_GAP;
        let z = self.frontier_z - half;

        let floor = self.spawn_box(
            EntityKind::Platform,
            Vec3::new(0.0, 0.5 - THICK_FLOOR / 2.0, z),
            Vec3::new(GOAL_SIZE, THICK_FLOOR, GOAL_SIZE),
            palette::GOAL,
        );
        let beacon = self.spawn_beacon(z, palette::GOAL);
        if let Some(floor) = self.entity_mut(floor) {
            floor.is_goal_platform = true;
            floor.is_checkpoint_platform = true;
            floor.is_permanent = true;
            floor.linked_beacon = Some(beacon);
        }

        for side in [-1.0, 1.0] {
            self.spawn_box(
                EntityKind::Obstacle,
                Vec3::new(side * (half + 0.5), wall_y, z),
                Vec3::new(1.0, wall_height, GOAL_SIZE),
                palette::GOAL_WALL,
            );
        }
        self.spawn_box(
            EntityKind::Obstacle,
            Vec3::new(0.0, wall_y, z - half - 0.5),
            Vec3::new(GOAL_SIZE + 2.0, wall_height, 1.0),
            palette::GOAL_WALL,
        );

        self.frontier_z -= GOAL_SIZE + 1.0;
    }
}
