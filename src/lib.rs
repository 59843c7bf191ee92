//! Ballpit - a 2D ball sandbox
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, spatial grid, collisions, tick loop)
//! - `settings`: Data-driven physics tunables
//! - `error`: Error types shared by the simulation and config loading

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{SimError, SimResult};
pub use settings::{BroadPhase, PhysicsPreset, SimConfig};

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;

    /// Linear friction applied to velocity every tick
    pub const FRICTION: f64 = 0.05;
    /// Speed below which a body is snapped to rest
    pub const REST_SPEED: f64 = 0.1;
    /// Bounciness of body-body contacts
    pub const RESTITUTION: f64 = 0.7;
    /// Fraction of the penetration depth corrected per tick
    pub const REPEL_SPEED_PERCENTAGE: f64 = 0.1;
    /// mass = radius ^ MASS_EXPONENT
    pub const MASS_EXPONENT: f64 = 1.5;

    /// Player-controlled body defaults
    pub const CONTROLLER_RADIUS: f64 = 25.0;
    pub const CONTROLLER_SPEED: f64 = 1.0;

    /// Camera follows the controller with this exponential smoothing factor
    pub const CAMERA_SMOOTHING: f64 = 0.1;

    /// Spawn gesture: radius growth per tick while held
    pub const CHARGE_RATE: f64 = 2.0;
    /// Released charges at or below this radius are discarded
    pub const MIN_SPAWN_RADIUS: f64 = 0.1;

    /// Internal viewport height in world units (width follows aspect ratio)
    pub const VIEWPORT_HEIGHT: f64 = 392.0;
    pub const VIEWPORT_ASPECT: f64 = 16.0 / 9.0;
}
