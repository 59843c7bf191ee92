//! Circle-circle narrow phase and impulse response
//!
//! Overlap correction is spread over several ticks (`repel_speed_percentage`)
//! and split by mass ratio so heavy bodies barely move. Velocity response is
//! a standard restitution impulse along the contact normal.

use super::body::Body;
use super::vector::{Vector2, VectorExt};

/// Contact parameters taken from the config
#[derive(Debug, Clone, Copy)]
pub struct ContactParams {
    pub restitution: f64,
    pub repel_speed_percentage: f64,
}

/// Result of resolving one contact
#[derive(Debug, Clone)]
pub struct Contact {
    /// Unit normal from `b` toward `a` (zero for coincident centers)
    pub normal: Vector2,
    /// Penetration depth before correction
    pub depth: f64,
    /// Impulse magnitude applied (0 if the pair was already separating)
    pub impulse: f64,
}

/// True if the circles touch or overlap. Tangency counts as contact.
#[inline]
pub fn overlaps(a: &Body, b: &Body) -> bool {
    a.radius() + b.radius() >= (b.pos - a.pos).length()
}

/// Push `a` and `b` apart and exchange momentum along the contact normal.
pub fn resolve(a: &mut Body, b: &mut Body, params: ContactParams) -> Contact {
    let offset = a.pos - b.pos;
    let normal = offset.unit();
    let depth = a.radius() + b.radius() - offset.length();

    // Each body moves by the other's share of the total mass
    let mass_ratio = a.mass() / (a.mass() + b.mass());
    a.pos += normal * (depth * (1.0 - mass_ratio) * params.repel_speed_percentage);
    b.pos -= normal * (depth * mass_ratio * params.repel_speed_percentage);

    let relative_vel = a.vel - b.vel;
    let vel_along_normal = relative_vel.dot(normal);

    // Already separating
    if vel_along_normal > 0.0 {
        return Contact {
            normal,
            depth,
            impulse: 0.0,
        };
    }

    let j = -(1.0 + params.restitution) * vel_along_normal / (1.0 / a.mass() + 1.0 / b.mass());
    let impulse = normal * j;
    a.vel += impulse / a.mass();
    b.vel -= impulse / b.mass();

    Contact {
        normal,
        depth,
        impulse: j,
    }
}

/// Mutable access to two distinct slots. `None` if `i == j`.
pub fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> Option<(&mut Body, &mut Body)> {
    use std::cmp::Ordering;
    match i.cmp(&j) {
        Ordering::Equal => None,
        Ordering::Less => {
            let (head, tail) = bodies.split_at_mut(j);
            Some((&mut head[i], &mut tail[0]))
        }
        Ordering::Greater => {
            let (head, tail) = bodies.split_at_mut(i);
            Some((&mut tail[0], &mut head[j]))
        }
    }
}

/// Test and resolve slots `i` and `j`. Returns the contact if they touched.
///
/// A body never collides with itself.
pub fn collide_slots(
    bodies: &mut [Body],
    i: usize,
    j: usize,
    params: ContactParams,
) -> Option<Contact> {
    let (a, b) = pair_mut(bodies, i, j)?;
    if overlaps(a, b) {
        Some(resolve(a, b, params))
    } else {
        None
    }
}
