//! Typed configuration for the world, the agent and the episode loop.
//!
//! Every struct has defaults matching the classic setup (a 2000-mass sun in
//! the middle of a 1000×700 field, planets launched 300 units out) and a
//! `validate()` that rejects values the physics or the learner cannot use.

use std::f64::consts::TAU;

use bevy::color::Color;
use bevy::math::DVec2;

use crate::types::{BodySpec, Bounds, DEFAULT_TIMESTEP, G, SUN_MASS, SUN_RADIUS, palette};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid body mass: {0} (must be positive and finite)")]
    InvalidMass(f64),

    #[error("invalid body radius: {0} (must be non-negative and finite)")]
    InvalidRadius(f64),

    #[error("invalid timestep: {0} (must be positive and finite)")]
    InvalidTimestep(f64),

    #[error("invalid gravitational constant: {0} (must be finite)")]
    InvalidGravity(f64),

    #[error("{name} needs at least 2 bins, got {got}")]
    TooFewBins { name: &'static str, got: usize },

    #[error("invalid {name} range [{min}, {max}]")]
    InvalidRange {
        name: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{name} = {value} outside allowed interval {interval}")]
    OutOfInterval {
        name: &'static str,
        value: f64,
        interval: &'static str,
    },

    #[error("minimum exploration rate {min} exceeds initial rate {initial}")]
    EpsilonFloorAboveStart { min: f64, initial: f64 },

    #[error("invalid world bounds: {min:?} .. {max:?}")]
    InvalidBounds { min: DVec2, max: DVec2 },
}

/// Check that a body's mass and radius are usable.
pub fn validate_body(spec: &BodySpec) -> Result<(), ConfigError> {
    if !(spec.mass.is_finite() && spec.mass > 0.0) {
        return Err(ConfigError::InvalidMass(spec.mass));
    }
    if !(spec.radius.is_finite() && spec.radius >= 0.0) {
        return Err(ConfigError::InvalidRadius(spec.radius));
    }
    Ok(())
}

/// Check that a timestep is usable.
pub fn validate_timestep(dt: f64) -> Result<(), ConfigError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTimestep(dt))
    }
}

fn check_interval(
    name: &'static str,
    value: f64,
    ok: bool,
    interval: &'static str,
) -> Result<(), ConfigError> {
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfInterval {
            name,
            value,
            interval,
        })
    }
}

/// Inclusive `[min, max]` range sampled by a set of bins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BinRange {
    pub bins: usize,
    pub min: f64,
    pub max: f64,
}

impl BinRange {
    pub const fn new(bins: usize, min: f64, max: f64) -> Self {
        Self { bins, min, max }
    }

    fn validate(&self, name: &'static str, strict: bool) -> Result<(), ConfigError> {
        if self.bins <= 1 {
            return Err(ConfigError::TooFewBins {
                name,
                got: self.bins,
            });
        }
        let ordered = if strict {
            self.min < self.max
        } else {
            self.min <= self.max
        };
        if !(self.min.is_finite() && self.max.is_finite() && ordered) {
            return Err(ConfigError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Physics world configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Gravitational constant.
    pub gravity: f64,
    /// Fixed integration step.
    pub timestep: f64,
    /// Region the episode loop treats as "in bounds".
    pub bounds: Bounds,
    /// The primary every reset starts from.
    pub sun: BodySpec,
}

impl Default for WorldConfig {
    fn default() -> Self {
        let bounds = Bounds::default();
        Self {
            gravity: G,
            timestep: DEFAULT_TIMESTEP,
            bounds,
            sun: BodySpec::at_rest(bounds.center(), SUN_MASS, SUN_RADIUS, palette::YELLOW),
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity.is_finite() {
            return Err(ConfigError::InvalidGravity(self.gravity));
        }
        validate_timestep(self.timestep)?;
        let Bounds { min, max } = self.bounds;
        if !(min.is_finite() && max.is_finite() && min.x < max.x && min.y < max.y) {
            return Err(ConfigError::InvalidBounds { min, max });
        }
        validate_body(&self.sun)
    }
}

/// Q-learning agent configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentConfig {
    /// Launch offset from the sun, per axis.
    pub position: BinRange,
    /// Launch speed.
    pub velocity: BinRange,
    /// Launch angle in radians.
    pub angle: BinRange,
    pub learning_rate: f64,
    pub discount: f64,
    pub epsilon: f64,
    pub epsilon_decay: f64,
    pub min_epsilon: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            position: BinRange::new(10, -300.0, 300.0),
            velocity: BinRange::new(10, 0.5, 5.0),
            angle: BinRange::new(12, 0.0, TAU),
            learning_rate: 0.1,
            discount: 0.95,
            epsilon: 1.0,
            epsilon_decay: 0.995,
            min_epsilon: 0.01,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.position.validate("position", true)?;
        self.velocity.validate("velocity", false)?;
        self.angle.validate("angle", false)?;

        let alpha = self.learning_rate;
        check_interval("learning_rate", alpha, alpha > 0.0 && alpha <= 1.0, "(0, 1]")?;
        let gamma = self.discount;
        check_interval("discount", gamma, (0.0..1.0).contains(&gamma), "[0, 1)")?;
        let eps = self.epsilon;
        check_interval("epsilon", eps, (0.0..=1.0).contains(&eps), "[0, 1]")?;
        let floor = self.min_epsilon;
        check_interval("min_epsilon", floor, (0.0..=1.0).contains(&floor), "[0, 1]")?;
        let decay = self.epsilon_decay;
        check_interval("epsilon_decay", decay, decay > 0.0 && decay <= 1.0, "(0, 1]")?;

        if floor > eps {
            return Err(ConfigError::EpsilonFloorAboveStart {
                min: floor,
                initial: eps,
            });
        }
        Ok(())
    }
}

/// Episode loop configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeConfig {
    /// Simulated seconds an orbit has to survive to count as a success.
    pub time_budget_secs: f64,
    /// Frame cadence the budget is expressed in.
    pub ticks_per_second: f64,
    /// Distance from the sun at which planets are launched.
    pub launch_radius: f64,
    /// Fixed launch angle around the sun; random each episode when `None`.
    pub launch_angle: Option<f64>,
    pub planet_mass: f64,
    pub planet_radius: f64,
    pub planet_color: Color,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            time_budget_secs: 20.0,
            ticks_per_second: 60.0,
            launch_radius: 300.0,
            launch_angle: None,
            planet_mass: 1.0,
            planet_radius: 5.0,
            planet_color: palette::BLUE,
        }
    }
}

impl EpisodeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let budget = self.time_budget_secs;
        check_interval("time_budget_secs", budget, budget > 0.0, "(0, inf)")?;
        let tps = self.ticks_per_second;
        check_interval("ticks_per_second", tps, tps > 0.0, "(0, inf)")?;
        let r = self.launch_radius;
        check_interval("launch_radius", r, r > 0.0, "(0, inf)")?;
        if let Some(angle) = self.launch_angle {
            check_interval("launch_angle", angle, true, "finite")?;
        }
        validate_body(&self.planet_spec(DVec2::ZERO))
    }

    /// Maximum ticks for one episode at the given timestep.
    ///
    /// Keeps the simulated-time budget constant when the timestep changes.
    pub fn max_ticks(&self, timestep: f64) -> u64 {
        let ticks = self.time_budget_secs / timestep * self.ticks_per_second;
        (ticks.round() as u64).max(1)
    }

    /// Planet template placed at `pos`, at rest.
    pub fn planet_spec(&self, pos: DVec2) -> BodySpec {
        BodySpec::at_rest(pos, self.planet_mass, self.planet_radius, self.planet_color)
    }
}

/// Sandbox brush: parameters for the next planet placed by the user.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyParams {
    pub mass: f64,
    pub radius: f64,
    pub color: Color,
}

impl Default for BodyParams {
    fn default() -> Self {
        Self {
            mass: 1.0,
            radius: 5.0,
            color: palette::BLUE,
        }
    }
}

/// Full configuration surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationConfig {
    pub world: WorldConfig,
    pub agent: AgentConfig,
    pub episode: EpisodeConfig,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.agent.validate()?;
        self.episode.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_default_episode_is_1200_ticks() {
        let episode = EpisodeConfig::default();
        assert_eq!(episode.max_ticks(1.0), 1200);
        assert_eq!(episode.max_ticks(2.0), 600);
        assert_eq!(episode.max_ticks(0.5), 2400);
    }

    #[test]
    fn test_single_bin_rejected() {
        let mut agent = AgentConfig::default();
        agent.velocity.bins = 1;
        assert_eq!(
            agent.validate(),
            Err(ConfigError::TooFewBins {
                name: "velocity",
                got: 1
            })
        );
    }

    #[test]
    fn test_inverted_position_range_rejected() {
        let mut agent = AgentConfig::default();
        agent.position = BinRange::new(10, 300.0, 300.0);
        assert!(matches!(
            agent.validate(),
            Err(ConfigError::InvalidRange { name: "position", .. })
        ));
    }

    #[test]
    fn test_epsilon_floor_above_start_rejected() {
        let agent = AgentConfig {
            epsilon: 0.005,
            ..AgentConfig::default()
        };
        assert!(matches!(
            agent.validate(),
            Err(ConfigError::EpsilonFloorAboveStart { .. })
        ));
    }

    #[test]
    fn test_bad_timestep_rejected() {
        assert_eq!(validate_timestep(0.0), Err(ConfigError::InvalidTimestep(0.0)));
        assert!(validate_timestep(-1.0).is_err());
        assert!(validate_timestep(f64::NAN).is_err());
        let world = WorldConfig {
            timestep: -0.5,
            ..WorldConfig::default()
        };
        assert!(world.validate().is_err());
    }

    #[test]
    fn test_bad_body_rejected() {
        let mut spec = BodySpec::at_rest(DVec2::ZERO, 0.0, 1.0, palette::BLUE);
        assert_eq!(validate_body(&spec), Err(ConfigError::InvalidMass(0.0)));
        spec.mass = 1.0;
        spec.radius = -1.0;
        assert_eq!(validate_body(&spec), Err(ConfigError::InvalidRadius(-1.0)));
    }

    fn out_of_interval(result: Result<(), ConfigError>) -> (&'static str, f64) {
        match result {
            Err(ConfigError::OutOfInterval { name, value, .. }) => (name, value),
            other => panic!("expected OutOfInterval, got {other:?}"),
        }
    }

    #[test]
    fn test_learning_rate_interval() {
        for alpha in [0.0, -0.1, 1.5, f64::NAN] {
            let agent = AgentConfig {
                learning_rate: alpha,
                ..AgentConfig::default()
            };
            assert_eq!(out_of_interval(agent.validate()).0, "learning_rate");
        }
        let agent = AgentConfig {
            learning_rate: 1.0,
            ..AgentConfig::default()
        };
        assert_eq!(agent.validate(), Ok(()));
    }

    #[test]
    fn test_discount_interval() {
        for gamma in [1.0, -0.01, f64::INFINITY] {
            let agent = AgentConfig {
                discount: gamma,
                ..AgentConfig::default()
            };
            assert_eq!(out_of_interval(agent.validate()).0, "discount");
        }
        let agent = AgentConfig {
            discount: 0.0,
            ..AgentConfig::default()
        };
        assert_eq!(agent.validate(), Ok(()));
    }

    #[test]
    fn test_epsilon_decay_interval() {
        for decay in [0.0, 1.01, f64::NAN] {
            let agent = AgentConfig {
                epsilon_decay: decay,
                ..AgentConfig::default()
            };
            assert_eq!(out_of_interval(agent.validate()).0, "epsilon_decay");
        }
    }

    #[test]
    fn test_epsilon_bounds() {
        let agent = AgentConfig {
            min_epsilon: -0.1,
            ..AgentConfig::default()
        };
        assert_eq!(out_of_interval(agent.validate()), ("min_epsilon", -0.1));

        let agent = AgentConfig {
            epsilon: 1.5,
            min_epsilon: 1.2,
            ..AgentConfig::default()
        };
        assert_eq!(out_of_interval(agent.validate()), ("epsilon", 1.5));
    }

    #[test]
    fn test_non_finite_gravity_rejected() {
        let world = WorldConfig {
            gravity: f64::NAN,
            ..WorldConfig::default()
        };
        assert!(matches!(world.validate(), Err(ConfigError::InvalidGravity(g)) if g.is_nan()));

        let world = WorldConfig {
            gravity: f64::INFINITY,
            ..WorldConfig::default()
        };
        assert_eq!(world.validate(), Err(ConfigError::InvalidGravity(f64::INFINITY)));
    }

    #[test]
    fn test_degenerate_bounds_rejected() {
        let flat = Bounds {
            min: DVec2::ZERO,
            max: DVec2::new(1000.0, 0.0),
        };
        let world = WorldConfig {
            bounds: flat,
            ..WorldConfig::default()
        };
        assert_eq!(
            world.validate(),
            Err(ConfigError::InvalidBounds {
                min: flat.min,
                max: flat.max
            })
        );

        let inverted = WorldConfig {
            bounds: Bounds {
                min: DVec2::new(10.0, 10.0),
                max: DVec2::ZERO,
            },
            ..WorldConfig::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_episode_positive_fields() {
        let episode = EpisodeConfig {
            time_budget_secs: 0.0,
            ..EpisodeConfig::default()
        };
        assert_eq!(out_of_interval(episode.validate()), ("time_budget_secs", 0.0));

        let episode = EpisodeConfig {
            ticks_per_second: -60.0,
            ..EpisodeConfig::default()
        };
        assert_eq!(out_of_interval(episode.validate()), ("ticks_per_second", -60.0));

        let episode = EpisodeConfig {
            launch_radius: 0.0,
            ..EpisodeConfig::default()
        };
        assert_eq!(out_of_interval(episode.validate()), ("launch_radius", 0.0));
    }

    #[test]
    fn test_launch_angle_must_be_finite() {
        let episode = EpisodeConfig {
            launch_angle: Some(f64::INFINITY),
            ..EpisodeConfig::default()
        };
        assert_eq!(out_of_interval(episode.validate()).0, "launch_angle");

        let episode = EpisodeConfig {
            launch_angle: Some(-1.0),
            ..EpisodeConfig::default()
        };
        assert_eq!(episode.validate(), Ok(()));
    }
}
