//! Core physics types and constants for the sun-and-planets simulation.

use bevy::color::Color;
use bevy::math::DVec2;

// Units are abstract: distances in world units, time in ticks, masses in
// arbitrary units.

/// Gravitational constant in simulation units.
pub const G: f64 = 1.0;

/// Default fixed timestep (simulated units per tick).
pub const DEFAULT_TIMESTEP: f64 = 1.0;

/// Width of the default world bounds.
pub const WORLD_WIDTH: f64 = 1000.0;

/// Height of the default world bounds.
pub const WORLD_HEIGHT: f64 = 700.0;

/// Sun defaults.
pub const SUN_MASS: f64 = 2000.0;
pub const SUN_RADIUS: f64 = 20.0;

/// Palette used by the sandbox brush and the default bodies.
pub mod palette {
    use bevy::color::Color;

    pub const YELLOW: Color = Color::srgb(1.0, 1.0, 0.0);
    pub const BLUE: Color = Color::srgb(100.0 / 255.0, 149.0 / 255.0, 237.0 / 255.0);
    pub const RED: Color = Color::srgb(200.0 / 255.0, 0.0, 0.0);
    pub const GREEN: Color = Color::srgb(0.0, 200.0 / 255.0, 0.0);
    pub const WHITE: Color = Color::srgb(1.0, 1.0, 1.0);

    /// Colors the sandbox brush cycles through, in order.
    pub const BRUSH: [Color; 4] = [BLUE, RED, GREEN, WHITE];
}

/// Stable identifier of a body within one [`SimulationWorld`](crate::world::SimulationWorld).
///
/// Ids are handed out monotonically and never reused, so a removed body's id
/// cannot alias a later one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u64);

/// Creation parameters for a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySpec {
    pub pos: DVec2,
    pub vel: DVec2,
    pub mass: f64,
    pub radius: f64,
    pub color: Color,
}

impl BodySpec {
    /// A body at rest.
    pub fn at_rest(pos: DVec2, mass: f64, radius: f64, color: Color) -> Self {
        Self {
            pos,
            vel: DVec2::ZERO,
            mass,
            radius,
            color,
        }
    }

    /// Same spec with a launch velocity.
    pub fn with_velocity(mut self, vel: DVec2) -> Self {
        self.vel = vel;
        self
    }
}

/// Axis-aligned world bounds. Edges are inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            min: DVec2::ZERO,
            max: DVec2::new(width, height),
        }
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, pos: DVec2) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(WORLD_WIDTH, WORLD_HEIGHT)
    }
}

/// Tangent of `v` in the orbital sense used throughout the crate: (y, −x).
#[inline]
pub fn tangent(v: DVec2) -> DVec2 {
    DVec2::new(v.y, -v.x)
}
