//! Scrolling camera that eases toward a target

use super::grid::WorldRect;
use super::vector::Vector2;

#[derive(Debug, Clone)]
pub struct Camera {
    /// World position of the viewport's top-left corner
    pub scroll: Vector2,
    /// Viewport size in world units
    pub viewport: Vector2,
    /// Fraction of the remaining distance covered per tick
    pub smoothing: f64,
}

impl Camera {
    pub fn new(viewport: Vector2, smoothing: f64) -> Self {
        Self {
            scroll: Vector2::ZERO,
            viewport,
            smoothing,
        }
    }

    /// `scroll += (target - viewport / 2 - scroll) * smoothing`
    pub fn follow(&mut self, target: Vector2) {
        let desired = target - self.viewport / 2.0;
        self.scroll += (desired - self.scroll) * self.smoothing;
    }

    pub fn visible_rect(&self) -> WorldRect {
        WorldRect::from_origin_size(self.scroll, self.viewport)
    }

    pub fn world_to_screen(&self, p: Vector2) -> Vector2 {
        p - self.scroll
    }

    pub fn screen_to_world(&self, p: Vector2) -> Vector2 {
        p + self.scroll
    }
}
