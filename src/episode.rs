//! Episode loop: turns the world into a reward-bearing environment.
//!
//! Each episode resets the world to the sun, launches one planet at a fixed
//! distance with a velocity chosen by the policy, and runs until the planet
//! hits the sun, leaves the bounds, or survives the time budget.

use std::fmt;

use bevy::log::{debug, error, info};
use bevy::math::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::agent::Policy;
use crate::config::{ConfigError, EpisodeConfig, WorldConfig};
use crate::types::BodyId;
use crate::world::SimulationWorld;

/// Reward for an orbit that survives the whole budget.
pub const SUCCESS_REWARD: f64 = 1.0;

/// Reward for a collision or an escape.
pub const FAILURE_REWARD: f64 = -1.0;

/// Why an episode failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureCause {
    /// The planet touched the sun (or was removed by a collision).
    Collision,
    /// The planet left the world bounds.
    OutOfBounds,
}

/// Terminal result of one episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpisodeOutcome {
    Success,
    Failure(FailureCause),
}

impl EpisodeOutcome {
    pub fn reward(&self) -> f64 {
        match self {
            EpisodeOutcome::Success => SUCCESS_REWARD,
            EpisodeOutcome::Failure(_) => FAILURE_REWARD,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, EpisodeOutcome::Success)
    }
}

impl fmt::Display for EpisodeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeOutcome::Success => write!(f, "stable orbit"),
            EpisodeOutcome::Failure(FailureCause::Collision) => write!(f, "collision"),
            EpisodeOutcome::Failure(FailureCause::OutOfBounds) => write!(f, "out of bounds"),
        }
    }
}

/// Result of one call to [`EpisodeController::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpisodeStep {
    /// Episode this step belonged to.
    pub episode: u64,
    /// Ticks elapsed in that episode, including this one.
    pub ticks: u64,
    /// Set when the episode ended on this step.
    pub outcome: Option<EpisodeOutcome>,
}

/// Drives repeated launch trials of a [`Policy`] in a [`SimulationWorld`].
#[derive(Debug)]
pub struct EpisodeController<P> {
    world: SimulationWorld,
    policy: P,
    config: EpisodeConfig,
    rng: StdRng,
    episode: u64,
    ticks: u64,
    max_ticks: u64,
    satellite: Option<BodyId>,
}

impl<P: Policy> EpisodeController<P> {
    /// Build the controller and start the first episode.
    pub fn new(world: WorldConfig, config: EpisodeConfig, policy: P) -> Result<Self, ConfigError> {
        Self::with_rng(world, config, policy, StdRng::from_entropy())
    }

    /// Same as [`EpisodeController::new`] with reproducible launch positions.
    pub fn with_seed(
        world: WorldConfig,
        config: EpisodeConfig,
        policy: P,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(world, config, policy, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        world: WorldConfig,
        config: EpisodeConfig,
        policy: P,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let world = SimulationWorld::new(world)?;
        let max_ticks = config.max_ticks(world.timestep());
        let mut controller = Self {
            world,
            policy,
            config,
            rng,
            episode: 0,
            ticks: 0,
            max_ticks,
            satellite: None,
        };
        controller.reset_episode()?;
        Ok(controller)
    }

    /// Start a new episode: sun only, then one planet launched by the policy.
    fn reset_episode(&mut self) -> Result<(), ConfigError> {
        self.world.reset();
        self.ticks = 0;
        self.episode += 1;

        let Some(sun_pos) = self.world.primary().map(|sun| sun.pos) else {
            self.satellite = None;
            return Ok(());
        };

        let angle = match self.config.launch_angle {
            Some(angle) => angle,
            None => self.rng.gen_range(0.0..std::f64::consts::TAU),
        };
        let offset = DVec2::from_angle(angle) * self.config.launch_radius;
        let launch = self.policy.act(offset);

        let spec = self
            .config
            .planet_spec(sun_pos + offset)
            .with_velocity(launch.velocity());
        self.satellite = Some(self.world.add_body(spec)?);

        debug!(
            "Episode {}: launch at ({:.1}, {:.1}) speed {:.2} angle {:.2}",
            self.episode, offset.x, offset.y, launch.speed, launch.angle
        );
        Ok(())
    }

    /// Advance the running episode by one tick.
    ///
    /// When the episode ends, the policy receives its reward and the next
    /// episode is set up before returning. Does nothing while the world is
    /// paused.
    pub fn step(&mut self) -> EpisodeStep {
        if self.world.is_paused() {
            return EpisodeStep {
                episode: self.episode,
                ticks: self.ticks,
                outcome: None,
            };
        }

        self.world.tick();
        self.ticks += 1;

        let outcome = self.check_termination();
        let step = EpisodeStep {
            episode: self.episode,
            ticks: self.ticks,
            outcome,
        };

        if let Some(outcome) = outcome {
            let reward = outcome.reward();
            info!(
                "Episode {} ended after {} ticks: {} (reward {})",
                self.episode, self.ticks, outcome, reward
            );
            self.policy.reward(reward);
            if let Err(err) = self.reset_episode() {
                error!("Failed to start episode {}: {}", self.episode, err);
            }
        }

        step
    }

    fn check_termination(&self) -> Option<EpisodeOutcome> {
        let satellite = self.satellite.and_then(|id| self.world.body(id));
        let Some(satellite) = satellite else {
            return Some(EpisodeOutcome::Failure(FailureCause::Collision));
        };

        if let Some(sun) = self.world.primary()
            && satellite.is_colliding(sun)
        {
            return Some(EpisodeOutcome::Failure(FailureCause::Collision));
        }
        if !self.world.in_bounds(satellite.pos) {
            return Some(EpisodeOutcome::Failure(FailureCause::OutOfBounds));
        }
        if self.ticks >= self.max_ticks {
            return Some(EpisodeOutcome::Success);
        }
        None
    }

    /// Change the timestep and rescale the episode length to keep the
    /// simulated-time budget.
    pub fn set_timestep(&mut self, dt: f64) -> Result<(), ConfigError> {
        self.world.set_timestep(dt)?;
        self.max_ticks = self.config.max_ticks(dt);
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.world.toggle_pause()
    }

    /// Current (1-based) episode index.
    pub fn episode(&self) -> u64 {
        self.episode
    }

    /// Ticks elapsed in the current episode.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    pub fn satellite(&self) -> Option<BodyId> {
        self.satellite
    }

    pub fn world(&self) -> &SimulationWorld {
        &self.world
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn config(&self) -> &EpisodeConfig {
        &self.config
    }
}
