//! 2D vector helpers
//!
//! `Vector2` is glam's f64 vector; it is `Copy`, so every operation already
//! yields a fresh value.

pub use glam::DVec2 as Vector2;

/// Extra operations on [`Vector2`]
pub trait VectorExt {
    /// Unit vector in the same direction. The zero vector maps to itself.
    fn unit(self) -> Vector2;

    /// Debug-draw projection: line from `origin` to `origin + self * length`
    fn draw_segment(self, origin: Vector2, length: f64) -> (Vector2, Vector2);
}

impl VectorExt for Vector2 {
    #[inline]
    fn unit(self) -> Vector2 {
        let magnitude = self.length();
        if magnitude == 0.0 {
            Vector2::ZERO
        } else {
            self / magnitude
        }
    }

    #[inline]
    fn draw_segment(self, origin: Vector2, length: f64) -> (Vector2, Vector2) {
        (origin, origin + self * length)
    }
}
