//! Deterministic simulation module
//!
//! All physics lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Fixed tick only
//! - Seeded RNG only
//! - Pair order decided by body ID, never by memory address

pub mod body;
pub mod camera;
pub mod collision;
pub mod controller;
pub mod grid;
pub mod state;
pub mod tick;
pub mod vector;

pub use body::{Body, BodyId, Color};
pub use camera::Camera;
pub use collision::{Contact, ContactParams, overlaps, resolve};
pub use controller::{Controller, Direction};
pub use grid::{CellCoord, GridLines, SpatialGrid, WorldRect};
pub use state::{Charge, World};
pub use tick::{Frame, RenderBody, TickInput, tick};
pub use vector::{Vector2, VectorExt};
