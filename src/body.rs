//! A single celestial body and its own integration step.

use bevy::color::Color;
use bevy::math::DVec2;

use crate::types::{BodyId, BodySpec};

/// Physical state of one body in the world.
///
/// Bodies are plain values; the world owns them and hands out copies as
/// snapshots, so nothing outside the world can mutate a live body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub id: BodyId,
    /// Position in world units.
    pub pos: DVec2,
    /// Velocity in world units per simulated time unit.
    pub vel: DVec2,
    /// Acceleration from the last gravity pass.
    pub acc: DVec2,
    /// Always positive.
    pub mass: f64,
    /// Never negative.
    pub radius: f64,
    /// Display only.
    pub color: Color,
}

impl Body {
    /// Build a body from an already validated spec.
    pub(crate) fn from_spec(id: BodyId, spec: &BodySpec) -> Self {
        Self {
            id,
            pos: spec.pos,
            vel: spec.vel,
            acc: DVec2::ZERO,
            mass: spec.mass,
            radius: spec.radius,
            color: spec.color,
        }
    }

    /// Newtonian acceleration this body feels from every other body in `others`.
    ///
    /// Sums `F = G·m1·m2/r²` along each connecting vector and divides by this
    /// body's mass. The body itself (matched by id) and coincident bodies are
    /// skipped.
    pub fn gravity_from(&self, others: &[Body], g: f64) -> DVec2 {
        let mut force = DVec2::ZERO;

        for other in others {
            if other.id == self.id {
                continue;
            }
            let delta = other.pos - self.pos;
            let r_squared = delta.length_squared();
            if r_squared == 0.0 {
                continue;
            }
            let magnitude = g * self.mass * other.mass / r_squared;
            force += delta / r_squared.sqrt() * magnitude;
        }

        force / self.mass
    }

    /// Store the acceleration computed from `others`.
    pub fn apply_gravity(&mut self, others: &[Body], g: f64) {
        self.acc = self.gravity_from(others, g);
    }

    /// Semi-implicit Euler: velocity first, then position with the new velocity.
    pub fn integrate(&mut self, dt: f64) {
        self.vel += self.acc * dt;
        self.pos += self.vel * dt;
    }

    /// True when the two discs touch or overlap.
    pub fn is_colliding(&self, other: &Body) -> bool {
        self.pos.distance(other.pos) <= self.radius + other.radius
    }
}
