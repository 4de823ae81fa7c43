use glam::Vec3;
use proptest::prelude::*;
use sky_runner::consts::SIM_DT;
use sky_runner::sim::{
    Avatar, Entity, EntityId, EntityKind, Hud, InputState, RunState, Volume, tick,
};
use sky_runner::{Settings, Tuning};

#[derive(Default)]
struct Progress {
    seen: Vec<u32>,
}

impl Hud for Progress {
    fn checkpoint_progress(&mut self, collected: u32, _total: u32) {
        self.seen.push(collected);
    }
    fn goal_reached(&mut self) {}
}

fn arb_input() -> impl Strategy<Value = InputState> {
    (any::<[bool; 7]>(), -20.0f32..20.0).prop_map(|(keys, pointer_dx)| InputState {
        forward: keys[0],
        backward: keys[1],
        left: keys[2],
        right: keys[3],
        sprint: keys[4],
        crouch: keys[5],
        jump: keys[6],
        pointer_dx,
    })
}

fn arb_volume() -> impl Strategy<Value = Volume> {
    (
        (-50.0f32..50.0, -50.0f32..50.0, -50.0f32..50.0),
        (0.1f32..20.0, 0.1f32..20.0, 0.1f32..20.0),
    )
        .prop_map(|((x, y, z), (w, h, d))| {
            Volume::from_center_size(Vec3::new(x, y, z), Vec3::new(w, h, d))
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    // Checkpoint count only ever goes up, one at a time
    #[test]
    fn checkpoints_are_monotonic(
        seed in any::<u64>(),
        inputs in prop::collection::vec(arb_input(), 50..400),
    ) {
        let mut state = RunState::new(seed, Tuning::default(), &Settings::default());
        let mut hud = Progress::default();
        let mut last = 0;
        for input in &inputs {
            tick(&mut state, input, SIM_DT, &mut (), &mut hud);
            prop_assert!(state.avatar.checkpoints_collected >= last);
            last = state.avatar.checkpoints_collected;
        }
        let expected: Vec<u32> = (1..=last).collect();
        prop_assert_eq!(hud.seen, expected);
    }

    // A resting avatar stays put on any floor height
    #[test]
    fn landing_is_idempotent(top in -20.0f32..20.0, ticks in 1usize..200) {
        let settings = Settings { screen_shake: false, ..Settings::default() };
        let mut avatar = Avatar::new(&Tuning::default(), &settings, 1);
        let mut floor = vec![Entity::new(
            EntityId(1),
            EntityKind::Platform,
            Vec3::new(0.0, top - 0.5, 0.0),
            Vec3::new(10.0, 1.0, 10.0),
            0x888888,
        )];
        let rest = floor[0].volume.top() + avatar.height;
        avatar.position = Vec3::new(0.0, rest, 0.0);
        avatar.on_ground = true;

        for _ in 0..ticks {
            avatar.step(SIM_DT, &InputState::default(), &mut floor);
            prop_assert!(avatar.on_ground);
            prop_assert!((avatar.position.y - rest).abs() < 1e-4);
            prop_assert_eq!(avatar.camera.position, avatar.position);
        }
    }

    // Overlap is symmetric and a volume overlaps itself
    #[test]
    fn intersection_is_symmetric(a in arb_volume(), b in arb_volume()) {
        prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        prop_assert!(a.intersects(&a));
        prop_assert!(a.contains_point(a.center()));
    }
}
