//! Test utilities for the simulation's unit tests.
//!
//! Provides body fixtures and assertions for physical invariants like
//! momentum conservation and orbit radius bands.

use bevy::math::DVec2;

use crate::body::Body;
use crate::types::{BodyId, BodySpec, palette};

/// Fixtures for building bodies and small systems.
pub mod fixtures {
    use super::*;
    use crate::physics::circular_velocity;

    /// A body at rest.
    pub fn body(id: u64, pos: DVec2, mass: f64, radius: f64) -> Body {
        Body::from_spec(
            BodyId(id),
            &BodySpec::at_rest(pos, mass, radius, palette::WHITE),
        )
    }

    /// Sun at the origin and a satellite on a circular orbit at `distance`
    /// along +x.
    pub fn sun_and_satellite(sun_mass: f64, distance: f64) -> Vec<Body> {
        let offset = DVec2::new(distance, 0.0);
        let sun = body(0, DVec2::ZERO, sun_mass, 20.0);
        let mut satellite = body(1, offset, 1.0, 5.0);
        satellite.vel = circular_velocity(1.0, sun_mass, offset);
        vec![sun, satellite]
    }
}

/// Assertions for verifying physical invariants.
pub mod assertions {
    use super::*;

    /// Total linear momentum.
    pub fn momentum(bodies: &[Body]) -> DVec2 {
        bodies.iter().map(|b| b.vel * b.mass).sum()
    }

    /// Mass-weighted centre of the bodies.
    pub fn center_of_mass(bodies: &[Body]) -> DVec2 {
        let total: f64 = bodies.iter().map(|b| b.mass).sum();
        bodies.iter().map(|b| b.pos * b.mass).sum::<DVec2>() / total
    }

    /// Assert that `value` stays within `tolerance` (relative) of `expected`.
    ///
    /// # Panics
    /// Panics with the observed drift when outside the band.
    pub fn assert_within_band(value: f64, expected: f64, tolerance: f64) {
        let drift = ((value - expected) / expected).abs();
        assert!(
            drift <= tolerance,
            "Value {value:.6} drifted {:.4}% from {expected:.6} (tolerance {:.4}%)",
            drift * 100.0,
            tolerance * 100.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_satellite_fixture_is_tangential() {
        let bodies = fixtures::sun_and_satellite(2000.0, 150.0);
        let satellite = bodies[1];
        assert_relative_eq!(satellite.vel.dot(satellite.pos), 0.0, epsilon = 1e-9);
        assert_relative_eq!(satellite.vel.length(), (2000.0_f64 / 150.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_center_of_mass_weighting() {
        let bodies = [
            fixtures::body(0, DVec2::ZERO, 3.0, 1.0),
            fixtures::body(1, DVec2::new(4.0, 0.0), 1.0, 1.0),
        ];
        assert_eq!(assertions::center_of_mass(&bodies), DVec2::new(1.0, 0.0));
    }

    #[test]
    #[should_panic(expected = "drifted")]
    fn test_band_assertion_fails_outside() {
        assertions::assert_within_band(110.0, 100.0, 0.05);
    }
}
