//! Player-driven body

use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId};
use super::vector::{Vector2, VectorExt};

/// Directional intent from the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Held-direction flags steering one body
#[derive(Debug, Clone)]
pub struct Controller {
    pub body: BodyId,
    pub speed: f64,
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl Controller {
    pub fn new(body: BodyId, speed: f64) -> Self {
        Self {
            body,
            speed,
            up: false,
            down: false,
            left: false,
            right: false,
        }
    }

    /// Set or clear one direction (press / release)
    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn release_all(&mut self) {
        self.up = false;
        self.down = false;
        self.left = false;
        self.right = false;
    }

    /// Intent vector of length `speed`, or zero. Screen coordinates: up is -y.
    pub fn intent(&self) -> Vector2 {
        let mut dir = Vector2::ZERO;
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        dir.unit() * self.speed
    }

    /// Blend intent into the body's velocity, then damp by `friction`
    pub fn apply(&self, body: &mut Body, friction: f64) {
        body.vel = (body.vel + self.intent()) * (1.0 - friction);
    }
}
