//! Avatar-vs-world collision resolution
//!
//! Discrete, per-frame AABB overlap against every live entity in storage
//! order. Each overlapping solid resolves either as a landing (snap onto the
//! top surface) or as a pushback along the horizontal axis of least overlap.
//! Volumes are resolved independently, so a later entity can undo an earlier
//! resolution within the same tick.
//!
//! Landing only looks at the current frame's feet height and vertical
//! velocity. A fast enough fall can pass through a thin platform between two
//! frames; that is accepted behavior.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::avatar::Avatar;
use super::entity::{Entity, find_index, palette};
use super::state::SimEvent;
use super::volume::Volume;
use crate::consts::AVATAR_HALF_WIDTH;

/// How far below a top surface the feet may be and still land on it
pub const LANDING_TOLERANCE: f32 = 0.5;
/// Minimum distance before a checkpoint becomes the new respawn anchor
pub const ANCHOR_EPSILON: f32 = 1.0;

/// Horizontal push-out axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PushAxis {
    X,
    Z,
}

/// Outcome of one overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Stand on the surface at this height
    Landing { surface: f32 },
    /// Move to `to` on `axis` and stop along it
    Push { axis: PushAxis, to: f32 },
}

/// Overlap depth on one axis: the smaller of the two face-to-face distances
#[inline]
fn axis_overlap(body_min: f32, body_max: f32, min: f32, max: f32) -> f32 {
    (body_max - min).abs().min((body_min - max).abs())
}

/// Decide between landing and pushback for an overlapping pair.
///
/// `center` is the avatar position, `feet` its lowest point.
pub fn classify(body: &Volume, center: Vec3, feet: f32, vertical_velocity: f32, volume: &Volume) -> Contact {
    let top = volume.top();
    if feet >= top - LANDING_TOLERANCE && vertical_velocity <= 0.0 {
        return Contact::Landing { surface: top };
    }

    let overlap_x = axis_overlap(body.min.x, body.max.x, volume.min.x, volume.max.x);
    let overlap_z = axis_overlap(body.min.z, body.max.z, volume.min.z, volume.max.z);

    if overlap_x < overlap_z {
        let to = if center.x < volume.min.x {
            volume.min.x - AVATAR_HALF_WIDTH
        } else {
            volume.max.x + AVATAR_HALF_WIDTH
        };
        Contact::Push { axis: PushAxis::X, to }
    } else {
        let to = if center.z < volume.min.z {
            volume.min.z - AVATAR_HALF_WIDTH
        } else {
            volume.max.z + AVATAR_HALF_WIDTH
        };
        Contact::Push { axis: PushAxis::Z, to }
    }
}

/// Apply a contact to the avatar
fn apply(avatar: &mut Avatar, contact: Contact) {
    match contact {
        Contact::Landing { surface } => {
            avatar.position.y = surface + avatar.height;
            avatar.velocity.y = 0.0;
            avatar.on_ground = true;
        }
        Contact::Push { axis: PushAxis::X, to } => {
            avatar.position.x = to;
            avatar.velocity.x = 0.0;
        }
        Contact::Push { axis: PushAxis::Z, to } => {
            avatar.position.z = to;
            avatar.velocity.z = 0.0;
        }
    }
}

/// Credit and activate a checkpoint platform at `index`
fn touch_checkpoint(avatar: &mut Avatar, entities: &mut [Entity], index: usize, events: &mut Vec<SimEvent>) {
    let platform = &mut entities[index];
    let id = platform.id;

    if !platform.is_collected {
        platform.is_collected = true;
        avatar.checkpoints_collected += 1;
        events.push(SimEvent::CheckpointCollected {
            platform: id,
            collected: avatar.checkpoints_collected,
        });
    }

    // Respawn anchor refresh, repeated on every revisit
    if avatar.last_checkpoint.distance(platform.position) > ANCHOR_EPSILON {
        avatar.last_checkpoint = platform.position;
        platform.emissive = Some(palette::FLOOR_ACTIVE_GLOW);
        let beacon = platform.linked_beacon;

        if let Some(i) = beacon.and_then(|b| find_index(entities, b)) {
            entities[i].color = palette::BEACON_ACTIVE;
            entities[i].emissive = Some(palette::BEACON_ACTIVE);
        }
        log::trace!("Checkpoint {:?} activated at {:?}", id, avatar.last_checkpoint);
        events.push(SimEvent::CheckpointActivated { platform: id, beacon });
    }
}

/// Resolve the avatar against every entity, in order, once
pub fn resolve_collisions(avatar: &mut Avatar, entities: &mut [Entity], events: &mut Vec<SimEvent>) {
    avatar.on_ground = false;

    for index in 0..entities.len() {
        let body = avatar.volume();
        let volume = entities[index].volume;
        if !volume.intersects(&body) {
            continue;
        }

        if entities[index].is_checkpoint_platform {
            touch_checkpoint(avatar, entities, index, events);
        }

        let entity = &entities[index];
        if !entity.is_solid() {
            continue;
        }
        if entity.is_goal_platform {
            events.push(SimEvent::GoalReached { platform: entity.id });
        }

        let contact = classify(
            &body,
            avatar.position,
            avatar.feet(),
            avatar.velocity.y,
            &volume,
        );
        apply(avatar, contact);
    }
}
