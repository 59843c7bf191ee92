//! World state and the events that change the body count
//!
//! The world owns every body, the grid, the controller and the camera. The
//! grid is rehashed whenever the body list changes, so it never holds slots
//! for bodies that no longer exist.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::{Body, BodyId, Color};
use super::camera::Camera;
use super::controller::Controller;
use super::grid::SpatialGrid;
use super::vector::Vector2;
use crate::error::SimResult;
use crate::settings::SimConfig;

/// Initial bodies besides the controller: (x, y, radius, color)
const SEED_SCENE: [(f64, f64, f64, Color); 5] = [
    (0.0, 0.0, 10.0, Color(100, 100, 200)),
    (35.0, 0.0, 25.0, Color(0, 150, 255)),
    (110.0, 0.0, 50.0, Color(255, 0, 255)),
    (260.0, 0.0, 100.0, Color(100, 255, 100)),
    (485.0, 0.0, 125.0, Color(215, 200, 255)),
];

/// Where the controller body starts in the seed scene
pub const CONTROLLER_START: Vector2 = Vector2::new(0.0, 50.0);

/// Pending spawn while the spawn gesture is held
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Charge {
    pub radius: f64,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub config: SimConfig,
    /// Live bodies; slot order is stable between body-count changes
    pub(crate) bodies: Vec<Body>,
    /// Indexes `bodies` by slot; rehashed on every body-count change
    pub(crate) grid: SpatialGrid,
    pub controller: Controller,
    pub camera: Camera,
    /// Active spawn gesture, if any
    pub charge: Option<Charge>,
    /// Simulation tick counter
    pub time_ticks: u64,
    rng: Pcg32,
    next_id: u32,
}

impl World {
    /// World holding only the controller body at `controller_pos`
    pub fn new(config: SimConfig, controller_pos: Vector2) -> SimResult<Self> {
        config.validate()?;

        let id = BodyId(1);
        let controller_body = Body::new(
            id,
            controller_pos,
            config.controller_radius,
            Color::RED,
            config.mass_exponent,
        )?;
        // Scroll starts at the origin and eases toward the controller
        let camera = Camera::new(
            Vector2::new(config.viewport.width, config.viewport.height),
            config.camera_smoothing,
        );

        let mut world = Self {
            grid: SpatialGrid::new(controller_body.diameter()),
            controller: Controller::new(id, config.controller_speed),
            camera,
            charge: None,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(config.seed),
            next_id: id.0 + 1,
            bodies: vec![controller_body],
            config,
        };
        world.grid.rehash_all(&mut world.bodies);
        Ok(world)
    }

    /// Controller plus the five demo balls along the x axis
    pub fn with_seed_scene(config: SimConfig) -> SimResult<Self> {
        let mut world = Self::new(config, CONTROLLER_START)?;
        for (x, y, radius, color) in SEED_SCENE {
            world.spawn(Vector2::new(x, y), radius, color)?;
        }
        log::info!(
            "Seed scene ready: {} bodies, cell size {}",
            world.bodies.len(),
            world.grid.cell_size()
        );
        Ok(world)
    }

    /// Add a body. Grows the grid if this is the largest body yet, and
    /// rehashes so the next query sees it.
    ///
    /// A rejected spawn leaves the world untouched, including the ID counter.
    pub fn spawn(&mut self, pos: Vector2, radius: f64, color: Color) -> SimResult<BodyId> {
        let id = BodyId(self.next_id);
        let body = Body::new(id, pos, radius, color, self.config.mass_exponent)
            .inspect_err(|e| log::warn!("Ignoring spawn: {}", e))?;
        self.next_id += 1;

        self.grid.grow_to(body.diameter());
        self.bodies.push(body);
        self.grid.rehash_all(&mut self.bodies);

        log::debug!("Spawned {:?} r={} at ({:.1}, {:.1})", id, radius, pos.x, pos.y);
        Ok(id)
    }

    /// Spawn with a random color
    pub fn spawn_random_color(&mut self, pos: Vector2, radius: f64) -> SimResult<BodyId> {
        let color = Color(self.rng.random(), self.rng.random(), self.rng.random());
        self.spawn(pos, radius, color)
    }

    /// Remove every body except the controller's and shrink the grid back to
    /// the controller's diameter.
    pub fn clear(&mut self) {
        let keep = self.controller.body;
        let removed = self.bodies.len();
        self.bodies.retain(|b| b.id == keep);

        let diameter = self
            .bodies
            .first()
            .map(Body::diameter)
            .unwrap_or(2.0 * self.config.controller_radius);
        self.grid.reset_cell_size(diameter);
        self.grid.rehash_all(&mut self.bodies);

        log::info!("Cleared {} bodies", removed.saturating_sub(self.bodies.len()));
    }

    /// Start growing a pending spawn
    pub fn begin_charge(&mut self) {
        if self.charge.is_none() {
            self.charge = Some(Charge { radius: 0.0 });
        }
    }

    /// Grow the pending spawn by one tick's worth
    pub fn grow_charge(&mut self) {
        if let Some(charge) = self.charge.as_mut() {
            charge.radius += self.config.charge_rate;
        }
    }

    /// Finish the spawn gesture at `world_pos`. Spawns only if the charge
    /// grew past `min_spawn_radius`.
    pub fn release_charge(&mut self, world_pos: Vector2) -> Option<BodyId> {
        let charge = self.charge.take()?;
        if charge.radius > self.config.min_spawn_radius {
            self.spawn_random_color(world_pos, charge.radius).ok()
        } else {
            None
        }
    }

    /// Live bodies in slot order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// The broad-phase grid, always in sync with [`World::bodies`]
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Slot of a body by ID
    pub fn slot_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|b| b.id == id)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    /// The controller's body
    pub fn controller_body(&self) -> Option<&Body> {
        self.body(self.controller.body)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
