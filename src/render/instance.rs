//! Per-box instance data for a GPU draw

use bytemuck::{Pod, Zeroable};

use crate::sim::Entity;

/// One box instance: center, extents, base color and emissive glow
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BoxInstance {
    pub center: [f32; 3],
    pub _pad0: f32,
    pub size: [f32; 3],
    pub _pad1: f32,
    pub color: [f32; 4],
    /// Zero alpha means no glow
    pub emissive: [f32; 4],
}

impl BoxInstance {
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            center: entity.position.to_array(),
            _pad0: 0.0,
            size: entity.size.to_array(),
            _pad1: 0.0,
            color: hex_to_rgba(entity.color),
            emissive: entity.emissive.map(hex_to_rgba).unwrap_or([0.0; 4]),
        }
    }
}

/// 0xRRGGBB to linear-ish RGBA floats (alpha 1)
pub fn hex_to_rgba(hex: u32) -> [f32; 4] {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}
