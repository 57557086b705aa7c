//! Gravity field over a body collection.
//!
//! Direct O(n²) pairwise sum. All accelerations are computed from the
//! unmoved snapshot before any of them is written back, so the result does
//! not depend on body order.

use bevy::math::DVec2;

use crate::body::Body;

/// Acceleration of every body in `bodies`, in the same order.
///
/// Pure function of the snapshot.
pub fn compute_accelerations(bodies: &[Body], g: f64) -> Vec<DVec2> {
    bodies.iter().map(|body| body.gravity_from(bodies, g)).collect()
}

/// Compute and store each body's acceleration.
pub fn accumulate_accelerations(bodies: &mut [Body], g: f64) {
    let accelerations = compute_accelerations(bodies, g);
    for (body, acc) in bodies.iter_mut().zip(accelerations) {
        body.acc = acc;
    }
}
