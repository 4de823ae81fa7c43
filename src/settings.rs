//! Presentation settings and preferences
//!
//! Kept apart from [`crate::Tuning`]: nothing here changes where the avatar
//! ends up, only how the camera presents it.

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};

use crate::consts::{BASE_FOV, SPRINT_FOV};

/// Radians of yaw per pixel of pointer movement
pub const DEFAULT_POINTER_SENSITIVITY: f32 = 0.002;

/// Player-facing preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Camera ===
    /// Sprint camera jitter
    pub screen_shake: bool,
    /// Pointer look sensitivity (radians per pixel)
    pub pointer_sensitivity: f32,
    /// Field of view while walking (degrees)
    pub base_fov: f32,
    /// Field of view while sprinting (degrees)
    pub sprint_fov: f32,

    // === Accessibility ===
    /// Reduced motion (disables jitter regardless of `screen_shake`)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_shake: true,
            pointer_sensitivity: DEFAULT_POINTER_SENSITIVITY,
            base_fov: BASE_FOV,
            sprint_fov: SPRINT_FOV,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse a (possibly partial) JSON settings document
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let settings: Settings = serde_json::from_str(json).context("invalid settings JSON")?;
        ensure!(
            settings.pointer_sensitivity >= 0.0,
            "pointer_sensitivity must not be negative"
        );
        ensure!(
            (1.0..180.0).contains(&settings.base_fov) && (1.0..180.0).contains(&settings.sprint_fov),
            "field of view must be between 1 and 180 degrees"
        );
        Ok(settings)
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }
}
