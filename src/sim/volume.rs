//! Axis-aligned collision volumes
//!
//! Every solid thing in the level is a box aligned to the world axes:
//! - min/max corners in world space
//! - overlap test is closed (touching faces count as overlapping)

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Volume {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centered on `center` with full extents `size`
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Top surface height
    #[inline]
    pub fn top(&self) -> f32 {
        self.max.y
    }

    /// Center point of the box
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full extents
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Does self overlap `other`? Faces that touch count as overlap.
    pub fn intersects(&self, other: &Volume) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y
            || other.max.z < self.min.z
            || other.min.z > self.max.z)
    }

    /// Does self contain the point (inclusive)?
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}
