use proptest::prelude::*;
use sky_runner::Tuning;
use sky_runner::sim::{Archetype, EntityKind, WorldGenerator};

fn push_forward(world: &mut WorldGenerator, advances: usize) {
    for _ in 0..advances {
        let frontier = world.frontier_z();
        world.advance(frontier);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // Same seed, same calls: identical entity lists
    #[test]
    fn world_is_deterministic(seed in any::<u64>(), advances in 0usize..40) {
        let mut a = WorldGenerator::new(seed, Tuning::default());
        let mut b = WorldGenerator::new(seed, Tuning::default());
        push_forward(&mut a, advances);
        push_forward(&mut b, advances);

        prop_assert_eq!(a.entities().len(), b.entities().len());
        for (x, y) in a.entities().iter().zip(b.entities()) {
            prop_assert_eq!(x.id, y.id);
            prop_assert_eq!(x.kind, y.kind);
            prop_assert_eq!(x.position, y.position);
            prop_assert_eq!(x.size, y.size);
            prop_assert_eq!(x.color, y.color);
        }
        prop_assert_eq!(a.archetypes(), b.archetypes());
    }

    // Every generated segment pushes the frontier further out
    #[test]
    fn frontier_strictly_decreases(seed in any::<u64>(), advances in 1usize..60) {
        let mut world = WorldGenerator::new(seed, Tuning::default());
        let mut last = world.frontier_z();
        for _ in 0..advances {
            let result = world.advance(last);
            let segment = result.segment.expect("frontier in range always generates");
            prop_assert_eq!(segment.start_z, last);
            prop_assert!(segment.end_z < segment.start_z);
            prop_assert!(world.frontier_z() < last);
            last = world.frontier_z();
        }
    }

    // Eviction never touches permanent entities and keeps id order
    #[test]
    fn eviction_respects_permanence(
        seed in any::<u64>(),
        cap in 5usize..60,
        ahead in 0usize..25,
        goal in 1u32..30,
    ) {
        let tuning = Tuning {
            retention_cap: cap,
            min_entities_ahead: ahead,
            goal_target: goal,
            initial_safe_segments: 0,
            ..Tuning::default()
        };
        let mut world = WorldGenerator::new(seed, tuning);
        let start = world.entities()[0].id;

        for _ in 0..(goal as usize + 20) {
            let frontier = world.frontier_z();
            if let Some(entity) = world.advance(frontier).evicted {
                prop_assert!(!entity.is_permanent);
                prop_assert!(world.entity(entity.id).is_none());
                prop_assert!(world.entities().len() >= cap);
            }
        }

        prop_assert!(world.entity(start).is_some());
        prop_assert!(world.goal_reached());
        prop_assert_eq!(world.entities().iter().filter(|e| e.is_goal_platform).count(), 1);
        prop_assert!(world.entities().windows(2).all(|w| w[0].id < w[1].id));
    }

    // Exactly `goal_target` ordinary segments precede the plaza
    #[test]
    fn goal_terminates_generation(seed in any::<u64>(), goal in 1u32..40, safe in 0u32..5) {
        let tuning = Tuning {
            goal_target: goal,
            initial_safe_segments: safe.min(goal),
            ..Tuning::default()
        };
        let mut world = WorldGenerator::new(seed, tuning);
        push_forward(&mut world, goal as usize + 5);

        prop_assert!(world.goal_reached());
        prop_assert_eq!(world.segments_generated(), goal);
        prop_assert_eq!(world.archetypes().last(), Some(&Archetype::Goal));
        prop_assert_eq!(
            world.archetypes().iter().filter(|a| **a == Archetype::Goal).count(),
            1
        );

        let before = world.entities().len();
        let frontier = world.frontier_z();
        prop_assert!(world.advance(frontier).segment.is_none());
        prop_assert!(world.entities().len() <= before);
    }

    // Every live checkpoint platform points at a live beacon
    #[test]
    fn beacons_are_linked(seed in any::<u64>(), advances in 1usize..30) {
        let mut world = WorldGenerator::new(seed, Tuning::default());
        push_forward(&mut world, advances);
        for platform in world.entities().iter().filter(|e| e.is_checkpoint_platform) {
            let beacon = platform.linked_beacon.and_then(|id| world.entity(id));
            prop_assert_eq!(beacon.map(|b| b.kind), Some(EntityKind::CheckpointBeacon));
        }
    }
}
