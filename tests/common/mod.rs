//! Common test utilities for integration tests.

#![allow(dead_code)]

use bevy::math::DVec2;
use stellarsim::body::Body;
use stellarsim::config::WorldConfig;
use stellarsim::types::{BodySpec, palette};
use stellarsim::world::SimulationWorld;

/// Default world (sun at the centre of a 1000×700 field).
pub fn default_world() -> SimulationWorld {
    SimulationWorld::new(WorldConfig::default()).expect("default world config is valid")
}

/// A planet spec at rest.
pub fn planet(pos: DVec2) -> BodySpec {
    BodySpec::at_rest(pos, 1.0, 5.0, palette::BLUE)
}

/// Mass-weighted centre of the bodies.
pub fn center_of_mass(bodies: &[Body]) -> DVec2 {
    let total: f64 = bodies.iter().map(|b| b.mass).sum();
    bodies.iter().map(|b| b.pos * b.mass).sum::<DVec2>() / total
}

/// Total linear momentum.
pub fn momentum(bodies: &[Body]) -> DVec2 {
    bodies.iter().map(|b| b.vel * b.mass).sum()
}

/// Distance between two bodies of the world, looked up by position in the
/// collection.
pub fn separation(world: &SimulationWorld, a: usize, b: usize) -> f64 {
    let bodies = world.bodies();
    bodies[a].pos.distance(bodies[b].pos)
}
