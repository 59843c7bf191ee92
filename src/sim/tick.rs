//! Fixed-rate simulation tick
//!
//! Order within a tick:
//! 1. integrate every body
//! 2. broad phase + narrow phase on the previous tick's grid
//! 3. rehash for the new positions
//! 4. controller intent
//! 5. camera follow
//! 6. cull to the viewport and build the render feed
//! 7. spawn / clear events
//!
//! Step 2 reads a grid that is one tick stale. Bodies move a bounded
//! distance per tick under friction and the 3x3 lookup absorbs it.

use serde::{Deserialize, Serialize};

use super::body::{BodyId, Color};
use super::collision::{ContactParams, collide_slots, overlaps};
use super::controller::Direction;
use super::grid::{CellCoord, GridLines};
use super::state::World;
use super::vector::Vector2;
use crate::settings::BroadPhase;

/// One-shot input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Direction press (true) / release (false) events
    pub directions: Vec<(Direction, bool)>,
    /// Spawn gesture started
    pub begin_charge: bool,
    /// Spawn gesture finished at this world position
    pub release_charge: Option<Vector2>,
    /// Remove every body except the controller
    pub clear: bool,
}

/// Body snapshot for drawing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderBody {
    pub id: BodyId,
    pub pos: Vector2,
    pub radius: f64,
    pub color: Color,
    pub vel: Vector2,
}

/// Everything the renderer needs for one tick
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub tick: u64,
    /// World position of the viewport's top-left corner
    pub scroll: Vector2,
    /// Bodies whose cells overlap the viewport
    pub visible: Vec<RenderBody>,
    /// Cells occupied by any body (debug overlay)
    pub occupied_cells: Vec<CellCoord>,
    pub cell_size: f64,
    pub grid_lines: GridLines,
    /// Radius of the pending spawn preview
    pub charge_radius: Option<f64>,
    /// Total live bodies
    pub body_count: usize,
    /// Contacts resolved this tick
    pub contacts: usize,
}

/// Advance the world by one tick and return the render feed
pub fn tick(world: &mut World, input: &TickInput) -> Frame {
    for &(direction, held) in &input.directions {
        world.controller.set(direction, held);
    }

    world.time_ticks += 1;
    let friction = world.config.friction;
    let rest_speed = world.config.rest_speed;

    // 1. Integrate
    for body in world.bodies.iter_mut() {
        body.integrate(friction, rest_speed);
    }

    // 2. Collisions
    let contacts = resolve_contacts(world);

    // 3. Rehash for the positions we just produced
    world.grid.rehash_all(&mut world.bodies);

    // 4. Controller
    let controller = &world.controller;
    if let Some(body) = world.bodies.iter_mut().find(|b| b.id == controller.body) {
        controller.apply(body, friction);
    }

    // 5. Camera
    if let Some(target) = world.controller_body().map(|b| b.pos) {
        world.camera.follow(target);
    }

    // 6. Cull against the grid built in step 3
    let frame = build_frame(world, contacts);

    // 7. Body-count changes
    if input.begin_charge {
        world.begin_charge();
    }
    if let Some(pos) = input.release_charge {
        world.release_charge(pos);
    }
    // No-op once released
    world.grow_charge();
    if input.clear {
        world.clear();
    }

    if world.time_ticks % u64::from(crate::consts::TICK_RATE) == 0 {
        log::debug!(
            "tick {}: {} bodies, {} visible, {} contacts, cell {}",
            world.time_ticks,
            frame.body_count,
            frame.visible.len(),
            contacts,
            frame.cell_size
        );
    }

    frame
}

/// Unordered candidate pairs `(i, j)` for this tick, each pair once.
///
/// Pairs are canonicalised by body ID so the same pair seen from both sides
/// is kept only once.
pub fn candidate_pairs(world: &World) -> Vec<(usize, usize)> {
    let bodies = &world.bodies;
    let mut pairs = Vec::new();
    match world.config.broad_phase {
        BroadPhase::Grid => {
            for i in 0..bodies.len() {
                for j in world.grid.neighbors(i, bodies) {
                    if bodies[i].id < bodies[j].id {
                        pairs.push((i, j));
                    }
                }
            }
        }
        BroadPhase::BruteForce => {
            for i in 0..bodies.len() {
                for j in (i + 1)..bodies.len() {
                    pairs.push((i, j));
                }
            }
        }
    }
    pairs
}

fn resolve_contacts(world: &mut World) -> usize {
    let params = ContactParams {
        restitution: world.config.restitution,
        repel_speed_percentage: world.config.repel_speed_percentage,
    };
    let pairs = candidate_pairs(world);

    let mut contacts = 0;
    for (i, j) in pairs {
        if collide_slots(&mut world.bodies, i, j, params).is_some() {
            contacts += 1;
        }
    }
    contacts
}

fn build_frame(world: &World, contacts: usize) -> Frame {
    let rect = world.camera.visible_rect();
    let visible = world
        .grid
        .query_rect(rect)
        .into_iter()
        .map(|slot| {
            let b = &world.bodies[slot];
            RenderBody {
                id: b.id,
                pos: b.pos,
                radius: b.radius(),
                color: b.color,
                vel: b.vel,
            }
        })
        .collect();

    let mut occupied_cells: Vec<CellCoord> = world.grid.occupied().collect();
    occupied_cells.sort_unstable();

    Frame {
        tick: world.time_ticks,
        scroll: world.camera.scroll,
        visible,
        occupied_cells,
        cell_size: world.grid.cell_size(),
        grid_lines: world.grid.grid_lines(rect),
        charge_radius: world.charge.map(|c| c.radius),
        body_count: world.bodies.len(),
        contacts,
    }
}

/// Overlapping pairs by exhaustive search (reference for the grid)
pub fn overlapping_pairs(world: &World) -> Vec<(BodyId, BodyId)> {
    let bodies = &world.bodies;
    let mut pairs = Vec::new();
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            if overlaps(&bodies[i], &bodies[j]) {
                let (a, b) = (bodies[i].id, bodies[j].id);
                pairs.push((a.min(b), a.max(b)));
            }
        }
    }
    pairs.sort_unstable();
    pairs
}
