//! Procedural world streaming
//!
//! The generator keeps one ordered entity list that doubles as the render
//! list, the collision list and the eviction queue. Segments are appended at
//! the frontier as the player approaches; the oldest disposable entities are
//! evicted once the list grows past the retention cap.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::archetype::{Archetype, SegmentBuilder};
use super::entity::{Entity, EntityId, palette};
use crate::tuning::Tuning;

/// Start platform placement (center, width, depth)
pub const START_PLATFORM_CENTER: Vec3 = Vec3::new(0.0, -2.0, -20.0);
pub const START_PLATFORM_WIDTH: f32 = 10.0;
pub const START_PLATFORM_DEPTH: f32 = 50.0;

/// What one generated segment looked like
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    /// 0-based segment index
    pub index: u32,
    pub archetype: Archetype,
    /// Whether a checkpoint safe zone was laid down in front of it
    pub checkpoint: Option<EntityId>,
    /// Frontier before and after
    pub start_z: f32,
    pub end_z: f32,
    /// Entities appended, checkpoint included
    pub entity_count: usize,
}

/// Result of one [`WorldGenerator::advance`] call
#[derive(Debug, Default)]
pub struct Advance {
    /// Segment generated this call, if any
    pub segment: Option<SegmentSummary>,
    /// Entity removed by eviction; the caller owns releasing it
    pub evicted: Option<Entity>,
}

/// Owns the level: entities, frontier and progression counters
#[derive(Debug, Clone)]
pub struct WorldGenerator {
    /// Run seed for reproducibility
    pub seed: u64,
    tuning: Tuning,
    rng: Pcg32,
    /// Live entities in generation order
    entities: Vec<Entity>,
    /// Forward-most generated coordinate (decreases as the world grows)
    frontier_z: f32,
    /// Non-goal segments generated so far
    segments_generated: u32,
    goal_reached: bool,
    next_id: u32,
    /// Archetype of every segment generated, in order
    history: Vec<Archetype>,
}

impl WorldGenerator {
    /// Level with a permanent start zone and the initial safe sequence
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let start_far_edge = START_PLATFORM_CENTER.z - START_PLATFORM_DEPTH / 2.0;
        let mut world = Self::with_frontier(seed, tuning, start_far_edge);

        let start = world.spawn_start_platform();
        log::debug!("Start zone {:?} placed, frontier {}", start, world.frontier_z);

        for _ in 0..world.tuning.initial_safe_segments {
            if world.goal_reached {
                break;
            }
            world.generate_segment();
        }
        log::info!(
            "World seeded ({}): {} entities, frontier {:.1}",
            seed,
            world.entities.len(),
            world.frontier_z
        );
        world
    }

    /// Empty level starting at an arbitrary frontier
    pub fn with_frontier(seed: u64, tuning: Tuning, frontier_z: f32) -> Self {
        Self {
            seed,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            entities: Vec::new(),
            frontier_z,
            segments_generated: 0,
            goal_reached: false,
            next_id: 1,
            history: Vec::new(),
        }
    }

    fn spawn_start_platform(&mut self) -> EntityId {
        let frontier = self.frontier_z;
        let mut builder =
            SegmentBuilder::new(&mut self.entities, &mut self.next_id, &mut self.rng, frontier);
        let id = builder.spawn_platform(
            START_PLATFORM_CENTER.x,
            START_PLATFORM_CENTER.y,
            START_PLATFORM_CENTER.z,
            START_PLATFORM_WIDTH,
            START_PLATFORM_DEPTH,
            palette::START,
        );
        if let Some(start) = self.entities.last_mut() {
            start.is_permanent = true;
        }
        id
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Mutable access for collision side effects (flags and colors only)
    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        super::entity::find_index(&self.entities, id).map(|i| &self.entities[i])
    }

    pub fn frontier_z(&self) -> f32 {
        self.frontier_z
    }

    pub fn segments_generated(&self) -> u32 {
        self.segments_generated
    }

    pub fn goal_reached(&self) -> bool {
        self.goal_reached
    }

    /// Archetypes generated so far, oldest first
    pub fn archetypes(&self) -> &[Archetype] {
        &self.history
    }

    /// Id the next spawned entity will get; ids only grow
    pub fn next_entity_id(&self) -> EntityId {
        EntityId(self.next_id)
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Checkpoint platforms in the full level, goal included
    pub fn total_checkpoints(&self) -> u32 {
        self.tuning.total_checkpoints()
    }

    /// Generate ahead of the player if needed, then evict
    pub fn advance(&mut self, player_z: f32) -> Advance {
        let segment = if !self.goal_reached
            && player_z < self.frontier_z + self.tuning.render_distance
        {
            Some(self.generate_segment())
        } else {
            None
        };

        let evicted = self.evict();
        Advance { segment, evicted }
    }

    /// Append exactly one segment (or the goal plaza) at the frontier
    fn generate_segment(&mut self) -> SegmentSummary {
        let index = self.segments_generated;
        let start_z = self.frontier_z;
        let archetype = self.choose_archetype();
        let insert_checkpoint =
            archetype != Archetype::Goal && index >= self.tuning.initial_safe_segments;

        let mut builder = SegmentBuilder::new(
            &mut self.entities,
            &mut self.next_id,
            &mut self.rng,
            start_z,
        );
        let checkpoint = insert_checkpoint.then(|| builder.checkpoint());
        builder.build(archetype);
        let end_z = builder.frontier_z;
        let entity_count = builder.spawned();

        self.frontier_z = end_z;
        self.history.push(archetype);
        if archetype == Archetype::Goal {
            self.goal_reached = true;
            log::info!("Goal plaza generated at z={:.1} after {} segments", end_z, index);
        } else {
            self.segments_generated += 1;
            log::debug!(
                "Segment {} {:?}: {} entities, frontier {:.1} -> {:.1}",
                index,
                archetype,
                entity_count,
                start_z,
                end_z
            );
        }

        SegmentSummary {
            index,
            archetype,
            checkpoint,
            start_z,
            end_z,
            entity_count,
        }
    }

    fn choose_archetype(&mut self) -> Archetype {
        if self.segments_generated >= self.tuning.goal_target {
            Archetype::Goal
        } else if self.segments_generated < self.tuning.easy_segments {
            Archetype::pick_easy(&mut self.rng)
        } else {
            Archetype::pick_weighted(&mut self.rng, &self.tuning.weights)
        }
    }

    /// Remove at most one entity once the retention cap is exceeded.
    ///
    /// The candidate is the oldest non-permanent entity, and it only goes if
    /// enough newer entities follow it.
    fn evict(&mut self) -> Option<Entity> {
        if self.entities.len() <= self.tuning.retention_cap {
            return None;
        }

        let index = self.entities.iter().position(|e| !e.is_permanent)?;
        let ahead = self.entities.len() - index - 1;
        if ahead < self.tuning.min_entities_ahead {
            return None;
        }

        let evicted = self.entities.remove(index);
        for entity in &mut self.entities {
            if entity.linked_beacon == Some(evicted.id) {
                entity.linked_beacon = None;
            }
        }
        log::debug!("Evicted {:?} ({:?}), {} live", evicted.id, evicted.kind, self.entities.len());
        Some(evicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;

    fn small_cap(cap: usize) -> Tuning {
        Tuning {
            retention_cap: cap,
            ..Tuning::default()
        }
    }

    /// Drive generation with the player parked at the frontier
    fn run_segments(world: &mut WorldGenerator, count: usize) -> Vec<SegmentSummary> {
        let mut out = Vec::new();
        for _ in 0..count {
            let z = world.frontier_z();
            if let Some(seg) = world.advance(z).segment {
                out.push(seg);
            }
        }
        out
    }

    #[test]
    fn test_scenario_single_advance() {
        let mut world = WorldGenerator::with_frontier(42, Tuning::default(), -10.0);
        assert!(world.entities().is_empty());

        let result = world.advance(0.0);
        let seg = result.segment.expect("frontier within render distance");
        assert_eq!(seg.index, 0);
        assert!(world.frontier_z() < -10.0);
        assert_eq!(world.entities().len(), seg.entity_count);
        assert!(seg.entity_count >= 1);
        assert!(result.evicted.is_none());
        assert_eq!(world.segments_generated(), 1);
    }

    #[test]
    fn test_no_generation_when_frontier_far_ahead() {
        let mut world = WorldGenerator::with_frontier(42, Tuning::default(), -500.0);
        assert!(world.advance(0.0).segment.is_none());
        assert!(world.entities().is_empty());
    }

    #[test]
    fn test_new_world_start_zone() {
        let world = WorldGenerator::new(7, Tuning::default());
        let start = &world.entities()[0];
        assert!(start.is_permanent);
        assert_eq!(start.position, START_PLATFORM_CENTER);
        assert_eq!(world.segments_generated(), 5);
        // Initial safe sequence carries no checkpoints
        assert!(!world.entities().iter().any(|e| e.is_checkpoint_platform));
        assert!(world.frontier_z() < -45.0);
    }

    #[test]
    fn test_determinism() {
        let mut a = WorldGenerator::new(99999, Tuning::default());
        let mut b = WorldGenerator::new(99999, Tuning::default());
        let segs_a = run_segments(&mut a, 40);
        let segs_b = run_segments(&mut b, 40);
        assert_eq!(segs_a, segs_b);
        assert_eq!(a.entities().len(), b.entities().len());
        for (ea, eb) in a.entities().iter().zip(b.entities()) {
            assert_eq!(ea.id, eb.id);
            assert_eq!(ea.position, eb.position);
            assert_eq!(ea.size, eb.size);
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = WorldGenerator::new(1, Tuning::default());
        let mut b = WorldGenerator::new(2, Tuning::default());
        run_segments(&mut a, 30);
        run_segments(&mut b, 30);
        let pa: Vec<_> = a.entities().iter().map(|e| e.position).collect();
        let pb: Vec<_> = b.entities().iter().map(|e| e.position).collect();
        assert_ne!(pa, pb);
    }

    #[test]
    fn test_opening_segments_are_easy() {
        let mut world = WorldGenerator::with_frontier(3, Tuning::default(), 0.0);
        let segs = run_segments(&mut world, 15);
        assert_eq!(segs.len(), 15);
        assert!(segs.iter().all(|s| s.archetype.is_easy()));
    }

    #[test]
    fn test_checkpoint_precedes_segments_after_safe_sequence() {
        let mut world = WorldGenerator::new(5, Tuning::default());
        let segs = run_segments(&mut world, 20);
        for seg in &segs {
            let id = seg.checkpoint.expect("checkpoint after initial sequence");
            let floor = world.entity(id).expect("checkpoint still live");
            assert!(floor.is_checkpoint_platform);
            let beacon = floor.linked_beacon.and_then(|b| world.entity(b)).unwrap();
            assert_eq!(beacon.kind, EntityKind::CheckpointBeacon);
            // Checkpoint sits at the segment start
            assert!(floor.volume.max.z <= seg.start_z + 1e-4);
            assert!(floor.volume.max.z > seg.start_z - 5.0);
        }
    }

    #[test]
    fn test_frontier_strictly_decreases() {
        let mut world = WorldGenerator::new(8, Tuning::default());
        for seg in run_segments(&mut world, 60) {
            assert!(seg.end_z < seg.start_z);
        }
    }

    #[test]
    fn test_goal_termination() {
        let mut world = WorldGenerator::with_frontier(42, Tuning::default(), 0.0);
        let segs = run_segments(&mut world, 100);
        assert_eq!(segs.len(), 100);
        assert!(segs.iter().all(|s| s.archetype != Archetype::Goal));
        assert!(!world.goal_reached());

        let goal = world.advance(world.frontier_z()).segment.unwrap();
        assert_eq!(goal.archetype, Archetype::Goal);
        assert!(goal.checkpoint.is_none());
        assert!(world.goal_reached());
        assert_eq!(world.segments_generated(), 100);

        let frontier = world.frontier_z();
        let count = world.entities().len();
        for _ in 0..50 {
            assert!(world.advance(frontier).segment.is_none());
        }
        assert_eq!(world.frontier_z(), frontier);
        assert_eq!(
            world.entities().iter().filter(|e| e.is_goal_platform).count(),
            1
        );
        assert!(world.entities().len() <= count);
    }

    #[test]
    fn test_eviction_respects_permanence() {
        let mut world = WorldGenerator::new(13, small_cap(5));
        let start_id = world.entities()[0].id;
        let mut evicted = Vec::new();

        for _ in 0..200 {
            let z = world.frontier_z();
            let result = world.advance(z);
            if let Some(e) = result.evicted {
                assert!(!e.is_permanent);
                let ahead = world.entities().iter().filter(|n| n.id > e.id).count();
                assert!(ahead >= 20);
                evicted.push(e.id);
            }
            assert_eq!(world.entities()[0].id, start_id);
        }
        assert!(!evicted.is_empty());
        // Oldest first
        assert!(evicted.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_eviction_skips_without_enough_ahead() {
        let tuning = Tuning {
            retention_cap: 5,
            min_entities_ahead: 1000,
            ..Tuning::default()
        };
        let mut world = WorldGenerator::new(13, tuning);
        for _ in 0..10 {
            let z = world.frontier_z();
            assert!(world.advance(z).evicted.is_none());
        }
    }

    #[test]
    fn test_eviction_once_per_advance_and_only_over_cap() {
        let mut world = WorldGenerator::new(21, small_cap(60));
        let mut total_spawned = world.entities().len();
        let mut total_evicted = 0;
        for _ in 0..100 {
            let z = world.frontier_z();
            let result = world.advance(z);
            total_spawned += result.segment.map_or(0, |s| s.entity_count);
            total_evicted += usize::from(result.evicted.is_some());
            assert_eq!(world.entities().len(), total_spawned - total_evicted);
        }
        assert!(total_evicted > 0);
    }

    #[test]
    fn test_beacon_eviction_clears_back_reference() {
        let tuning = Tuning {
            initial_safe_segments: 0,
            min_entities_ahead: 0,
            ..Tuning::default()
        };
        let mut world = WorldGenerator::with_frontier(4, tuning, 0.0);
        let seg = world.advance(0.0).segment.unwrap();
        let floor_id = seg.checkpoint.unwrap();
        let beacon_id = world.entity(floor_id).unwrap().linked_beacon.unwrap();

        // Pin the floor so the beacon becomes the oldest disposable entity
        world.entities_mut()[0].is_permanent = true;
        world.tuning.retention_cap = 0;

        let evicted = world.advance(1.0e6).evicted.expect("beacon evicted");
        assert_eq!(evicted.id, beacon_id);
        assert_eq!(world.entity(floor_id).unwrap().linked_beacon, None);
    }
}
