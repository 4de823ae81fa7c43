//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Seeded RNG only (one `Pcg32` per generator)
//! - Stable iteration order (entities are kept in id order)
//! - No rendering or platform dependencies

pub mod archetype;
pub mod avatar;
pub mod collision;
pub mod entity;
pub mod state;
pub mod tick;
pub mod volume;
pub mod world;

pub use archetype::Archetype;
pub use avatar::{Avatar, AvatarPhase, CameraPose, InputState, LimbPose};
pub use collision::{Contact, PushAxis, classify, resolve_collisions};
pub use entity::{Entity, EntityId, EntityKind};
pub use state::{RunPhase, RunState, SimEvent};
pub use tick::{Hud, RenderSink, spawn_world, tick};
pub use volume::Volume;
pub use world::{Advance, SegmentSummary, WorldGenerator};
