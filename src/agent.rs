//! Tabular Q-learning launcher.
//!
//! The state is the launch offset from the sun, binned per axis; the action
//! is a (speed, angle) pair, binned per dimension. The table therefore has
//! `pos × pos × vel × angle` entries, all starting at zero.
//!
//! Each episode is a single decision, so the agent remembers only the last
//! (state, action) pair and updates it when the episode's reward arrives.

use bevy::log::{debug, warn};
use bevy::math::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{AgentConfig, BinRange, ConfigError};

/// Discretized launch position: (x bin, y bin).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub px: usize,
    pub py: usize,
}

/// Discretized launch action: (speed bin, angle bin).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActionKey {
    pub velocity: usize,
    pub angle: usize,
}

/// Continuous launch decoded from an [`ActionKey`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaunchAction {
    pub speed: f64,
    /// Radians, measured from +x.
    pub angle: f64,
}

impl LaunchAction {
    /// Launch velocity vector.
    pub fn velocity(&self) -> DVec2 {
        DVec2::from_angle(self.angle) * self.speed
    }
}

/// Anything that picks a launch for a given offset and learns from the
/// episode's reward.
pub trait Policy {
    /// Choose a launch for a planet placed at `offset` from the sun.
    fn act(&mut self, offset: DVec2) -> LaunchAction;

    /// Terminal reward for the launch chosen by the last `act`.
    fn reward(&mut self, reward: f64);
}

/// Linear interpolation over a bin range.
///
/// Written as `min·(1−t) + max·t` so the end bins decode to the range
/// bounds exactly.
fn decode_bin(range: &BinRange, bin: usize) -> f64 {
    let t = bin as f64 / (range.bins - 1) as f64;
    range.min * (1.0 - t) + range.max * t
}

/// Bin index of `value`, clamped to the range.
fn discretize(range: &BinRange, value: f64) -> usize {
    let bin_size = (range.max - range.min) / range.bins as f64;
    let bin = ((value - range.min) / bin_size).floor();
    if bin.is_nan() || bin < 0.0 {
        0
    } else {
        (bin as usize).min(range.bins - 1)
    }
}

/// Q-learning agent with epsilon-greedy exploration.
#[derive(Clone, Debug)]
pub struct QAgent {
    config: AgentConfig,
    table: Vec<f64>,
    epsilon: f64,
    last: Option<(StateKey, ActionKey)>,
    rng: StdRng,
}

impl QAgent {
    /// Create an agent seeded from system entropy.
    pub fn new(config: AgentConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an agent with a reproducible exploration sequence.
    pub fn with_seed(config: AgentConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: AgentConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let size = config.position.bins
            * config.position.bins
            * config.velocity.bins
            * config.angle.bins;
        Ok(Self {
            epsilon: config.epsilon,
            table: vec![0.0; size],
            config,
            last: None,
            rng,
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// The (state, action) pair the next update applies to.
    pub fn last_choice(&self) -> Option<(StateKey, ActionKey)> {
        self.last
    }

    /// Bin a launch offset, clamping anything outside the position range.
    pub fn discretize_position(&self, offset: DVec2) -> StateKey {
        StateKey {
            px: discretize(&self.config.position, offset.x),
            py: discretize(&self.config.position, offset.y),
        }
    }

    /// Continuous launch for an action bin.
    pub fn decode_action(&self, action: ActionKey) -> LaunchAction {
        LaunchAction {
            speed: decode_bin(&self.config.velocity, action.velocity),
            angle: decode_bin(&self.config.angle, action.angle),
        }
    }

    fn index(&self, state: StateKey, action: ActionKey) -> usize {
        let pos = self.config.position.bins;
        let vel = self.config.velocity.bins;
        let ang = self.config.angle.bins;
        ((state.px * pos + state.py) * vel + action.velocity) * ang + action.angle
    }

    fn row(&self, state: StateKey) -> &[f64] {
        let start = self.index(state, ActionKey { velocity: 0, angle: 0 });
        let len = self.config.velocity.bins * self.config.angle.bins;
        &self.table[start..start + len]
    }

    /// Stored value of one entry.
    pub fn q_value(&self, state: StateKey, action: ActionKey) -> f64 {
        self.table[self.index(state, action)]
    }

    /// Highest-valued action for `state`; ties go to the first in scan order.
    pub fn best_action(&self, state: StateKey) -> ActionKey {
        let angle_bins = self.config.angle.bins;
        let mut best = 0;
        let mut best_value = f64::NEG_INFINITY;
        for (i, &value) in self.row(state).iter().enumerate() {
            if value > best_value {
                best = i;
                best_value = value;
            }
        }
        ActionKey {
            velocity: best / angle_bins,
            angle: best % angle_bins,
        }
    }

    fn max_value(&self, state: StateKey) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Pick an action for the launch offset and remember it for the next update.
    ///
    /// With probability ε the action is uniform random, otherwise greedy.
    pub fn select_action(&mut self, offset: DVec2) -> LaunchAction {
        let state = self.discretize_position(offset);

        let action = if self.rng.gen_bool(self.epsilon) {
            ActionKey {
                velocity: self.rng.gen_range(0..self.config.velocity.bins),
                angle: self.rng.gen_range(0..self.config.angle.bins),
            }
        } else {
            self.best_action(state)
        };

        self.last = Some((state, action));
        self.decode_action(action)
    }

    /// One-step Q-learning update of the last chosen pair, then decay ε.
    ///
    /// `Q ← (1−α)·Q + α·(reward + γ·max_a' Q(state, a'))`. The pair is kept,
    /// so repeated updates keep refining the same entry. Returns the new
    /// value, or `None` if no action was ever selected.
    pub fn update(&mut self, reward: f64) -> Option<f64> {
        let Some((state, action)) = self.last else {
            warn!("Q-update with reward {} before any action was selected", reward);
            return None;
        };

        let alpha = self.config.learning_rate;
        let gamma = self.config.discount;
        let index = self.index(state, action);
        let current = self.table[index];
        let max_future = self.max_value(state);

        let updated = (1.0 - alpha) * current + alpha * (reward + gamma * max_future);
        self.table[index] = updated;

        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.min_epsilon);
        debug!(
            "Q{:?}{:?}: {:.4} -> {:.4}, epsilon {:.4}",
            state, action, current, updated, self.epsilon
        );
        Some(updated)
    }
}

impl Policy for QAgent {
    fn act(&mut self, offset: DVec2) -> LaunchAction {
        self.select_action(offset)
    }

    fn reward(&mut self, reward: f64) {
        self.update(reward);
    }
}
