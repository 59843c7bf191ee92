//! Simulation tunables
//!
//! Loaded from an optional JSON file; everything defaults to the values in
//! [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};

/// Physics feel presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PhysicsPreset {
    /// Light friction, mass = r^(3/2)
    #[default]
    Balanced,
    /// Heavier friction, mass = r^(5/4)
    Classic,
}

impl PhysicsPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhysicsPreset::Balanced => "Balanced",
            PhysicsPreset::Classic => "Classic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "balanced" => Some(PhysicsPreset::Balanced),
            "classic" => Some(PhysicsPreset::Classic),
            _ => None,
        }
    }

    pub fn friction(&self) -> f64 {
        match self {
            PhysicsPreset::Balanced => FRICTION,
            PhysicsPreset::Classic => 0.1,
        }
    }

    pub fn mass_exponent(&self) -> f64 {
        match self {
            PhysicsPreset::Balanced => MASS_EXPONENT,
            PhysicsPreset::Classic => 1.25,
        }
    }
}

/// How collision candidates are gathered each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BroadPhase {
    /// 3x3 neighborhood lookup in the spatial grid
    #[default]
    Grid,
    /// Every unordered pair (O(n^2))
    BruteForce,
}

/// Viewport size in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: (VIEWPORT_ASPECT * VIEWPORT_HEIGHT).floor(),
            height: VIEWPORT_HEIGHT,
        }
    }
}

/// All simulation tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub preset: PhysicsPreset,

    // === Integration ===
    /// Fraction of velocity removed per tick (0-1)
    pub friction: f64,
    /// Bodies slower than this are stopped
    pub rest_speed: f64,

    // === Contacts ===
    /// 0 = inelastic, 1 = elastic, >1 superelastic, <0 pass-through
    pub restitution: f64,
    /// Fraction of penetration resolved per tick
    pub repel_speed_percentage: f64,
    /// mass = radius ^ mass_exponent
    pub mass_exponent: f64,
    pub broad_phase: BroadPhase,

    // === Controller ===
    pub controller_radius: f64,
    pub controller_speed: f64,

    // === Camera ===
    pub camera_smoothing: f64,
    pub viewport: ViewportSize,

    // === Spawning ===
    pub charge_rate: f64,
    pub min_spawn_radius: f64,
    /// Seed for spawn colors
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            preset: PhysicsPreset::Balanced,

            friction: FRICTION,
            rest_speed: REST_SPEED,

            restitution: RESTITUTION,
            repel_speed_percentage: REPEL_SPEED_PERCENTAGE,
            mass_exponent: MASS_EXPONENT,
            broad_phase: BroadPhase::Grid,

            controller_radius: CONTROLLER_RADIUS,
            controller_speed: CONTROLLER_SPEED,

            camera_smoothing: CAMERA_SMOOTHING,
            viewport: ViewportSize::default(),

            charge_rate: CHARGE_RATE,
            min_spawn_radius: MIN_SPAWN_RADIUS,
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Create a config from a preset (applies preset defaults)
    pub fn from_preset(preset: PhysicsPreset) -> Self {
        let mut config = Self::default();
        config.apply_preset(preset);
        config
    }

    /// Apply a preset (updates friction and mass law)
    pub fn apply_preset(&mut self, preset: PhysicsPreset) {
        self.preset = preset;
        self.friction = preset.friction();
        self.mass_exponent = preset.mass_exponent();
    }

    /// Reject values that would break the simulation invariants.
    ///
    /// Restitution is deliberately unchecked: negative values let bodies pass
    /// through each other and values above 1 are superelastic.
    pub fn validate(&self) -> SimResult<()> {
        if !(0.0..=1.0).contains(&self.friction) {
            return Err(SimError::InvalidConfig("friction must be within [0, 1]"));
        }
        if !(self.rest_speed >= 0.0) {
            return Err(SimError::InvalidConfig("rest_speed must be non-negative"));
        }
        if !(self.mass_exponent > 0.0 && self.mass_exponent.is_finite()) {
            return Err(SimError::InvalidConfig("mass_exponent must be positive"));
        }
        if !(self.controller_radius > 0.0 && self.controller_radius.is_finite()) {
            return Err(SimError::InvalidConfig("controller_radius must be positive"));
        }
        if !(self.camera_smoothing > 0.0 && self.camera_smoothing <= 1.0) {
            return Err(SimError::InvalidConfig("camera_smoothing must be within (0, 1]"));
        }
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(SimError::InvalidConfig("viewport must have positive size"));
        }
        if !(self.charge_rate >= 0.0) {
            return Err(SimError::InvalidConfig("charge_rate must be non-negative"));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> SimResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Config saved to {}", path.as_ref().display());
        Ok(())
    }
}
