//! Per-frame driver
//!
//! One call advances the world around the player, steps the avatar and
//! forwards what happened to the renderer and the HUD.

use super::avatar::InputState;
use super::entity::Entity;
use super::state::{RunPhase, RunState, SimEvent};
use crate::consts::MAX_FRAME_DT;

/// Receives entity lifetimes. Every spawned entity is released at most once.
pub trait RenderSink {
    fn spawn(&mut self, entity: &Entity);
    fn release(&mut self, entity: Entity);
}

/// Receives progression updates
pub trait Hud {
    fn checkpoint_progress(&mut self, collected: u32, total: u32);
    fn goal_reached(&mut self);
}

impl RenderSink for () {
    fn spawn(&mut self, _entity: &Entity) {}
    fn release(&mut self, _entity: Entity) {}
}

impl Hud for () {
    fn checkpoint_progress(&mut self, _collected: u32, _total: u32) {}
    fn goal_reached(&mut self) {}
}

/// Announce every entity currently alive (used once when a run starts)
pub fn spawn_world(state: &RunState, render: &mut impl RenderSink) {
    for entity in state.world.entities() {
        render.spawn(entity);
    }
}

/// Advance the run by one frame
pub fn tick(
    state: &mut RunState,
    input: &InputState,
    dt: f32,
    render: &mut impl RenderSink,
    hud: &mut impl Hud,
) {
    if state.phase == RunPhase::Complete {
        return;
    }
    let dt = dt.min(MAX_FRAME_DT);

    // World streaming
    let first_new = state.world.next_entity_id();
    let advance = state.world.advance(state.avatar.position.z);
    if advance.segment.is_some() {
        for entity in state.world.entities().iter().filter(|e| e.id >= first_new) {
            render.spawn(entity);
        }
    }
    if let Some(evicted) = advance.evicted {
        if evicted.id >= first_new {
            // Generated and evicted in the same call
            render.spawn(&evicted);
        }
        render.release(evicted);
    }

    // Avatar
    let events = state
        .avatar
        .step(dt, input, state.world.entities_mut());
    state.time_ticks += 1;

    let total = state.world.total_checkpoints();
    for event in events {
        match event {
            SimEvent::CheckpointCollected { collected, .. } => {
                hud.checkpoint_progress(collected, total);
            }
            SimEvent::GoalReached { platform } => {
                if state.phase == RunPhase::Running {
                    state.phase = RunPhase::Complete;
                    log::info!(
                        "Goal {:?} reached after {} ticks ({}/{} checkpoints)",
                        platform,
                        state.time_ticks,
                        state.avatar.checkpoints_collected,
                        total
                    );
                    hud.goal_reached();
                }
            }
            SimEvent::CheckpointActivated { .. } | SimEvent::Respawned { .. } => {}
        }
    }
}
