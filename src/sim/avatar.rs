//! Player avatar kinematics
//!
//! First-person body: position is the eye point, feet sit `height` below it.
//! One `step` per rendered frame integrates input, gravity and collisions.

use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::resolve_collisions;
use super::entity::Entity;
use super::state::SimEvent;
use super::volume::Volume;
use crate::approach;
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Horizontal velocity decay per second
const DAMPING: f32 = 10.0;
/// Blend rates toward input-selected targets
const HEIGHT_BLEND: f32 = 10.0;
const SPEED_BLEND: f32 = 5.0;
const FOV_BLEND: f32 = 5.0;
/// Input acceleration scale; strafing is weaker
const FORWARD_ACCEL: f32 = 50.0;
const STRAFE_ACCEL: f32 = 40.0;
/// Peak camera jitter at full sprint
const MAX_SHAKE: f32 = 0.05;

/// Spawn point, above the start platform
pub const SPAWN_POSITION: Vec3 = Vec3::new(0.0, 10.0, 0.0);
/// Respawn anchor before any checkpoint is touched
pub const INITIAL_CHECKPOINT: Vec3 = Vec3::new(0.0, 5.0, 0.0);

/// Input sampled once at the start of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    pub crouch: bool,
    /// Jump pressed since the previous tick
    pub jump: bool,
    /// Horizontal pointer movement since the previous tick (pixels)
    pub pointer_dx: f32,
}

impl InputState {
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Grounded/airborne state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AvatarPhase {
    Grounded,
    Airborne,
}

/// Camera transform derived from the avatar each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraPose {
    pub position: Vec3,
    /// Rotation about +Y (radians)
    pub yaw: f32,
    /// Vertical field of view (degrees)
    pub fov: f32,
}

/// Hand and foot offsets relative to the camera (presentation only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LimbPose {
    pub left_hand: Vec3,
    pub right_hand: Vec3,
    pub left_foot: Vec3,
    pub right_foot: Vec3,
}

impl Default for LimbPose {
    fn default() -> Self {
        Self {
            left_hand: Vec3::new(-0.4, -0.3, -0.6),
            right_hand: Vec3::new(0.4, -0.3, -0.6),
            left_foot: Vec3::new(-0.3, -1.5, -0.2),
            right_foot: Vec3::new(0.3, -1.5, -0.2),
        }
    }
}

impl LimbPose {
    /// Walk cycle while moving on the ground, idle breathing otherwise
    fn animate(&mut self, time: f32, walking: bool) {
        use std::f32::consts::PI;

        if walking {
            self.left_hand.y = -0.3 + time.sin() * 0.05;
            self.right_hand.y = -0.3 + (time + PI).sin() * 0.05;
            self.left_foot.z = -0.2 + time.sin() * 0.2;
            self.left_foot.y = -1.5 + (time.sin() * 0.1).max(0.0);
            self.right_foot.z = -0.2 + (time + PI).sin() * 0.2;
            self.right_foot.y = -1.5 + ((time + PI).sin() * 0.1).max(0.0);
        } else {
            self.left_hand.y = -0.3 + (time * 0.5).sin() * 0.02;
            self.right_hand.y = -0.3 + (time * 0.5 + 1.0).sin() * 0.02;
            let rest = Self::default();
            self.left_foot = rest.left_foot;
            self.right_foot = rest.right_foot;
        }
    }
}

/// The player's body
#[derive(Debug, Clone, Serialize)]
pub struct Avatar {
    /// Eye position
    pub position: Vec3,
    pub velocity: Vec3,
    pub on_ground: bool,
    /// Eye height above the feet (blends toward crouch/stand)
    pub height: f32,
    /// Rotation about +Y (radians); 0 faces -Z
    pub yaw: f32,
    /// Current horizontal speed scale
    pub current_speed: f32,
    /// Field of view (degrees)
    pub fov: f32,
    pub checkpoints_collected: u32,
    /// Respawn anchor (center of the last activated checkpoint)
    pub last_checkpoint: Vec3,
    pub camera: CameraPose,
    pub limbs: LimbPose,
    /// Seconds simulated
    pub elapsed: f32,
    /// Presentation-only camera jitter
    pub shake: bool,
    #[serde(skip)]
    tuning: Tuning,
    #[serde(skip)]
    pointer_sensitivity: f32,
    #[serde(skip)]
    base_fov: f32,
    #[serde(skip)]
    sprint_fov: f32,
    #[serde(skip)]
    shake_rng: Pcg32,
}

impl Avatar {
    pub fn new(tuning: &Tuning, settings: &Settings, seed: u64) -> Self {
        Self {
            position: SPAWN_POSITION,
            velocity: Vec3::ZERO,
            on_ground: false,
            height: tuning.normal_height,
            yaw: 0.0,
            current_speed: tuning.base_speed,
            fov: settings.base_fov,
            checkpoints_collected: 0,
            last_checkpoint: INITIAL_CHECKPOINT,
            camera: CameraPose {
                position: SPAWN_POSITION,
                yaw: 0.0,
                fov: settings.base_fov,
            },
            limbs: LimbPose::default(),
            elapsed: 0.0,
            shake: settings.effective_screen_shake(),
            tuning: tuning.clone(),
            pointer_sensitivity: settings.pointer_sensitivity,
            base_fov: settings.base_fov,
            sprint_fov: settings.sprint_fov,
            shake_rng: Pcg32::seed_from_u64(seed ^ 0x5eed_cafe),
        }
    }

    pub fn phase(&self) -> AvatarPhase {
        if self.on_ground {
            AvatarPhase::Grounded
        } else {
            AvatarPhase::Airborne
        }
    }

    /// Lowest point of the body
    #[inline]
    pub fn feet(&self) -> f32 {
        self.position.y - self.height
    }

    /// Collision box for the current position and height
    pub fn volume(&self) -> Volume {
        Volume::new(
            Vec3::new(
                self.position.x - AVATAR_HALF_WIDTH,
                self.feet(),
                self.position.z - AVATAR_HALF_WIDTH,
            ),
            Vec3::new(
                self.position.x + AVATAR_HALF_WIDTH,
                self.position.y + HEAD_MARGIN,
                self.position.z + AVATAR_HALF_WIDTH,
            ),
        )
    }

    /// Advance one frame against the live entity list
    pub fn step(&mut self, dt: f32, input: &InputState, entities: &mut [Entity]) -> Vec<SimEvent> {
        let mut events = Vec::new();

        self.yaw -= input.pointer_dx * self.pointer_sensitivity;
        if input.jump && self.on_ground && !input.crouch {
            self.velocity.y = self.tuning.jump_impulse;
            self.on_ground = false;
        }

        // Damping
        self.velocity.x -= self.velocity.x * DAMPING * dt;
        self.velocity.z -= self.velocity.z * DAMPING * dt;

        self.blend_toward_targets(input, dt);
        self.accelerate(input, dt);

        self.velocity.y += self.tuning.gravity * dt;
        self.position += self.velocity * dt;

        if self.position.y < self.tuning.fall_threshold {
            self.respawn();
            events.push(SimEvent::Respawned {
                at: self.position,
            });
        }

        resolve_collisions(self, entities, &mut events);

        self.update_camera(input);
        self.elapsed += dt;
        self.limbs
            .animate(self.elapsed * 10.0, input.is_moving() && self.on_ground);

        events
    }

    /// Smooth height, speed and FOV toward what the input asks for
    fn blend_toward_targets(&mut self, input: &InputState, dt: f32) {
        let target_height = if input.crouch {
            self.tuning.crouch_height
        } else {
            self.tuning.normal_height
        };
        self.height = approach(self.height, target_height, HEIGHT_BLEND, dt);

        let sprinting = input.sprint && !input.crouch;
        let target_speed = if input.crouch {
            self.tuning.crouch_speed
        } else if sprinting {
            self.tuning.sprint_speed
        } else {
            self.tuning.base_speed
        };
        self.current_speed = approach(self.current_speed, target_speed, SPEED_BLEND, dt);

        let target_fov = if sprinting { self.sprint_fov } else { self.base_fov };
        self.fov = approach(self.fov, target_fov, FOV_BLEND, dt);
    }

    /// Camera-relative input acceleration in the horizontal plane
    fn accelerate(&mut self, input: &InputState, dt: f32) {
        let mut direction = Vec3::ZERO;
        if input.forward {
            direction.z = -1.0;
        }
        if input.backward {
            direction.z = 1.0;
        }
        if input.left {
            direction.x = -1.0;
        }
        if input.right {
            direction.x = 1.0;
        }
        let direction = Quat::from_rotation_y(self.yaw) * direction.normalize_or_zero();

        if input.forward || input.backward {
            let push = direction * self.current_speed * dt * FORWARD_ACCEL;
            self.velocity.x += push.x;
            self.velocity.z += push.z;
        }
        if input.left || input.right {
            let push = direction * self.current_speed * dt * STRAFE_ACCEL;
            self.velocity.x += push.x;
            self.velocity.z += push.z;
        }
    }

    /// Fall-through recovery: drop back in above the last checkpoint
    fn respawn(&mut self) {
        self.position = self.last_checkpoint + Vec3::new(0.0, RESPAWN_DROP, 0.0);
        self.velocity = Vec3::ZERO;
        self.yaw = 0.0;
        log::info!("Fell out of the world, respawning at {:?}", self.position);
    }

    fn update_camera(&mut self, input: &InputState) {
        let mut position = self.position;

        if self.shake && input.is_moving() && self.on_ground {
            let sprint_range = self.tuning.sprint_speed - self.tuning.base_speed;
            let ratio = (self.current_speed - self.tuning.base_speed) / sprint_range;
            let amount = ratio.max(0.0) * MAX_SHAKE;
            if amount > 0.0 {
                position.x += (self.shake_rng.random::<f32>() - 0.5) * amount;
                position.y += (self.shake_rng.random::<f32>() - 0.5) * amount;
            }
        }

        self.camera = CameraPose {
            position,
            yaw: self.yaw,
            fov: self.fov,
        };
    }
}
