//! Circular rigid bodies

use serde::{Deserialize, Serialize};

use super::grid::CellCoord;
use super::vector::{Vector2, VectorExt};
use crate::error::{SimError, SimResult};

/// Stable body handle, assigned monotonically by the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// RGB color tag (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const RED: Color = Color(255, 0, 0);
    pub const WHITE: Color = Color(255, 255, 255);
}

/// A ball
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub pos: Vector2,
    pub vel: Vector2,
    radius: f64,
    mass: f64,
    pub color: Color,
    /// Cells covered by the bounding square, as of the last rehash
    pub(crate) cells: Vec<CellCoord>,
}

impl Body {
    /// Create a body at rest. Mass is `radius ^ mass_exponent`.
    ///
    /// The radius must be positive with a finite diameter and mass, and the
    /// position must be finite.
    pub fn new(
        id: BodyId,
        pos: Vector2,
        radius: f64,
        color: Color,
        mass_exponent: f64,
    ) -> SimResult<Self> {
        let mass = radius.powf(mass_exponent);
        if !(radius > 0.0 && (2.0 * radius).is_finite() && mass > 0.0 && mass.is_finite()) {
            return Err(SimError::InvalidRadius(radius));
        }
        if !pos.is_finite() {
            return Err(SimError::InvalidPosition(pos.x, pos.y));
        }
        Ok(Self {
            id,
            pos,
            vel: Vector2::ZERO,
            radius,
            mass,
            color,
            cells: Vec::new(),
        })
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn diameter(&self) -> f64 {
        2.0 * self.radius
    }

    /// Cells recorded by the most recent rehash
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Apply linear friction, snapping to rest below `rest_speed`
    pub fn apply_friction(&mut self, friction: f64, rest_speed: f64) {
        if self.vel.length() > 0.0 {
            self.vel -= self.vel * friction;
            if self.vel.length() < rest_speed {
                self.vel = Vector2::ZERO;
            }
        }
    }

    /// One explicit Euler step: friction, then advance position
    pub fn integrate(&mut self, friction: f64, rest_speed: f64) {
        self.apply_friction(friction, rest_speed);
        self.pos += self.vel;
    }

    /// Every cell touched by the circle's bounding square (inclusive).
    ///
    /// Corner cells the circle itself misses may be included.
    pub fn occupied_cells(&self, cell_size: f64) -> Vec<CellCoord> {
        let min = CellCoord::containing(self.pos - Vector2::splat(self.radius), cell_size);
        let max = CellCoord::containing(self.pos + Vector2::splat(self.radius), cell_size);

        // Coordinates saturate far from the origin
        let span = |lo: i64, hi: i64| hi.saturating_sub(lo).saturating_add(1).max(0) as usize;
        let mut cells = Vec::with_capacity(span(min.x, max.x).saturating_mul(span(min.y, max.y)));
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                cells.push(CellCoord { x, y });
            }
        }
        cells
    }

    /// Velocity debug line, scaled by `length`
    pub fn velocity_segment(&self, length: f64) -> (Vector2, Vector2) {
        self.vel.draw_segment(self.pos, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(x: f64, y: f64, r: f64) -> Body {
        Body::new(BodyId(1), Vector2::new(x, y), r, Color::WHITE, 1.5).unwrap()
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        for r in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let result = Body::new(BodyId(1), Vector2::ZERO, r, Color::WHITE, 1.5);
            assert!(matches!(result, Err(SimError::InvalidRadius(_))));
        }
    }

    #[test]
    fn test_rejects_radius_with_infinite_diameter_or_mass() {
        // Finite radius, but 2r overflows
        let result = Body::new(BodyId(1), Vector2::ZERO, 1e308, Color::WHITE, 1.5);
        assert!(matches!(result, Err(SimError::InvalidRadius(_))));

        // Finite diameter, but r^1.5 overflows
        let result = Body::new(BodyId(1), Vector2::ZERO, 1e250, Color::WHITE, 1.5);
        assert!(matches!(result, Err(SimError::InvalidRadius(_))));
    }

    #[test]
    fn test_rejects_non_finite_position() {
        let result = Body::new(BodyId(1), Vector2::new(f64::NAN, 0.0), 5.0, Color::WHITE, 1.5);
        assert!(matches!(result, Err(SimError::InvalidPosition(..))));
        let result = Body::new(BodyId(1), Vector2::new(0.0, f64::INFINITY), 5.0, Color::WHITE, 1.5);
        assert!(matches!(result, Err(SimError::InvalidPosition(..))));
    }

    #[test]
    fn test_occupied_cells_far_from_origin() {
        // Cell coordinates saturate at i64::MAX
        let b = body(1e300, 0.0, 10.0);
        let cells = b.occupied_cells(50.0);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].x, i64::MAX);
    }

    #[test]
    fn test_mass_law() {
        let b = body(0.0, 0.0, 16.0);
        assert!((b.mass() - 64.0).abs() < 1e-9);
        let b = Body::new(BodyId(2), Vector2::ZERO, 16.0, Color::WHITE, 1.25).unwrap();
        assert!((b.mass() - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_friction_slows_then_stops() {
        let mut b = body(0.0, 0.0, 10.0);
        b.vel = Vector2::new(2.0, 0.0);
        b.integrate(0.05, 0.1);
        assert!((b.vel.x - 1.9).abs() < 1e-12);
        assert!((b.pos.x - 1.9).abs() < 1e-12);

        b.vel = Vector2::new(0.1, 0.0);
        b.integrate(0.05, 0.1);
        assert_eq!(b.vel, Vector2::ZERO);
    }

    #[test]
    fn test_at_rest_stays_put() {
        let mut b = body(5.0, 7.0, 10.0);
        b.vel = Vector2::new(0.05, 0.0);
        b.integrate(0.05, 0.1);
        for _ in 0..10 {
            b.integrate(0.05, 0.1);
        }
        assert_eq!(b.pos, Vector2::new(5.0, 7.0));
    }

    #[test]
    fn test_occupied_cells_single() {
        let b = body(25.0, 25.0, 10.0);
        assert_eq!(b.occupied_cells(50.0), vec![CellCoord { x: 0, y: 0 }]);
    }

    #[test]
    fn test_occupied_cells_spans_negative() {
        // Bounding square [-10, 10] x [-10, 10] straddles the origin
        let b = body(0.0, 0.0, 10.0);
        let cells = b.occupied_cells(50.0);
        assert_eq!(cells.len(), 4);
        for c in [
            CellCoord { x: -1, y: -1 },
            CellCoord { x: -1, y: 0 },
            CellCoord { x: 0, y: -1 },
            CellCoord { x: 0, y: 0 },
        ] {
            assert!(cells.contains(&c));
        }
    }
}
