//! StellarSim - Sun and Planets Simulator
//!
//! A library crate with a small Newtonian n-body world (gravity, collisions,
//! circular-orbit launches) and a tabular Q-learning loop that learns to
//! launch planets into surviving orbits.

pub mod agent;
pub mod body;
pub mod config;
pub mod episode;
pub mod physics;
pub mod plugin;
pub mod sandbox;
pub mod types;
pub mod world;

#[cfg(test)]
pub mod test_utils;
