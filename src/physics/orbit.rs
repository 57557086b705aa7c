//! Circular-orbit launch velocity.

use bevy::math::DVec2;

use crate::types::tangent;

/// Velocity that puts a satellite on a circular orbit around a primary.
///
/// `offset` is the satellite's position relative to the primary. Speed is
/// `sqrt(G·M / r)`; direction is the (dy, −dx) tangent, so every body placed
/// this way orbits in the same sense. The primary is treated as stationary.
///
/// `offset` must be non-zero: a satellite sitting on the primary has no
/// defined orbit and the result is NaN.
pub fn circular_velocity(g: f64, primary_mass: f64, offset: DVec2) -> DVec2 {
    let radius = offset.length();
    let speed = (g * primary_mass / radius).sqrt();
    tangent(offset) / radius * speed
}

/// Orbital period of a circular orbit of the given radius.
pub fn circular_period(g: f64, primary_mass: f64, radius: f64) -> f64 {
    std::f64::consts::TAU * (radius.powi(3) / (g * primary_mass)).sqrt()
}
