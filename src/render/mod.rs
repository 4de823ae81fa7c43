//! Renderer-facing draw list
//!
//! The simulation announces entity lifetimes through [`RenderSink`]; the draw
//! list mirrors them as GPU-ready instances in id order.

mod instance;

use std::collections::BTreeMap;

pub use instance::{BoxInstance, hex_to_rgba};

use crate::sim::{Entity, EntityId, RenderSink};

/// Live box instances keyed by entity
#[derive(Debug, Default)]
pub struct DrawList {
    instances: BTreeMap<EntityId, BoxInstance>,
    spawned_total: u64,
    released_total: u64,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.instances.contains_key(&id)
    }

    /// Entities announced / released since creation
    pub fn totals(&self) -> (u64, u64) {
        (self.spawned_total, self.released_total)
    }

    /// Refresh colors of live instances (checkpoint activation recolors boxes)
    pub fn sync(&mut self, entities: &[Entity]) {
        for entity in entities {
            if let Some(instance) = self.instances.get_mut(&entity.id) {
                *instance = BoxInstance::from_entity(entity);
            }
        }
    }

    /// Instance buffer contents, in id order
    pub fn instances(&self) -> Vec<BoxInstance> {
        self.instances.values().copied().collect()
    }

    /// Raw bytes for upload
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.instances()).to_vec()
    }
}

impl RenderSink for DrawList {
    fn spawn(&mut self, entity: &Entity) {
        let previous = self
            .instances
            .insert(entity.id, BoxInstance::from_entity(entity));
        if previous.is_some() {
            log::warn!("{:?} announced twice", entity.id);
        }
        self.spawned_total += 1;
    }

    fn release(&mut self, entity: Entity) {
        if self.instances.remove(&entity.id).is_none() {
            log::warn!("Release of unknown {:?}", entity.id);
        }
        self.released_total += 1;
    }
}
