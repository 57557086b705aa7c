//! Physics pipeline for the sun-and-planets world.
//!
//! One tick reads every body to compute gravity, then integrates, then checks
//! collisions on the moved bodies. The pieces are split so each phase stays a
//! plain function over a body slice:
//! - [`gravity`]: pairwise accelerations (read phase, then write phase)
//! - [`collision`]: overlap detection and removal selection
//! - [`orbit`]: circular-orbit launch velocity

pub mod collision;
pub mod gravity;
pub mod orbit;

#[cfg(test)]
mod proptest_physics;

pub use collision::{find_removals, prune};
pub use gravity::{accumulate_accelerations, compute_accelerations};
pub use orbit::circular_velocity;
