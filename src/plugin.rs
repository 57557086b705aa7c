//! Bevy wiring for the sandbox and training modes.
//!
//! The plugin only adds systems; the caller inserts either a [`Sandbox`] or a
//! [`Training`] resource to pick the mode. Queued [`UserCommand`]s are drained
//! into whichever mode is running before its tick. Both run once per frame in
//! `Update`, which is the fixed cadence the tick counts are expressed in.

use bevy::prelude::*;

use crate::agent::QAgent;
use crate::episode::{EpisodeController, EpisodeOutcome, FailureCause};
use crate::sandbox::{Sandbox, UserCommand, stepped_timestep};

/// Commands produced by an input source, drained once per frame.
#[derive(Resource, Default, Debug)]
pub struct PendingCommands(pub Vec<UserCommand>);

impl PendingCommands {
    pub fn push(&mut self, command: UserCommand) {
        self.0.push(command);
    }
}

/// Training mode: the episode loop around a Q-learning agent.
#[derive(Resource, Debug)]
pub struct Training(pub EpisodeController<QAgent>);

/// Running totals over finished episodes, for a HUD to display.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct EpisodeStats {
    pub episodes: u64,
    pub successes: u64,
    pub collisions: u64,
    pub escapes: u64,
    pub last_outcome: Option<EpisodeOutcome>,
    pub last_ticks: u64,
}

impl EpisodeStats {
    pub fn record(&mut self, outcome: EpisodeOutcome, ticks: u64) {
        self.episodes += 1;
        match outcome {
            EpisodeOutcome::Success => self.successes += 1,
            EpisodeOutcome::Failure(FailureCause::Collision) => self.collisions += 1,
            EpisodeOutcome::Failure(FailureCause::OutOfBounds) => self.escapes += 1,
        }
        self.last_outcome = Some(outcome);
        self.last_ticks = ticks;
    }

    /// Fraction of finished episodes that ended in a stable orbit.
    pub fn success_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.successes as f64 / self.episodes as f64
        }
    }
}

/// Plugin driving whichever mode resource is present.
pub struct StellarSimPlugin;

impl Plugin for StellarSimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingCommands>()
            .init_resource::<EpisodeStats>()
            .add_systems(
                Update,
                (apply_user_commands, sandbox_tick)
                    .chain()
                    .run_if(resource_exists::<Sandbox>),
            )
            .add_systems(
                Update,
                (apply_training_commands, training_step)
                    .chain()
                    .run_if(resource_exists::<Training>),
            );
    }
}

/// Apply queued input before the frame's tick.
fn apply_user_commands(mut pending: ResMut<PendingCommands>, mut sandbox: ResMut<Sandbox>) {
    for command in pending.0.drain(..) {
        sandbox.apply(command);
    }
}

fn sandbox_tick(mut sandbox: ResMut<Sandbox>) {
    sandbox.tick();
}

/// Training only honours pause and speed; everything else is dropped.
fn apply_training_commands(mut pending: ResMut<PendingCommands>, mut training: ResMut<Training>) {
    for command in pending.0.drain(..) {
        match command {
            UserCommand::TogglePause => {
                training.0.toggle_pause();
            }
            UserCommand::SpeedUp | UserCommand::SlowDown => {
                let current = training.0.world().timestep();
                if let Some(dt) = stepped_timestep(current, command)
                    && let Err(err) = training.0.set_timestep(dt)
                {
                    warn!("Ignoring timestep change: {}", err);
                }
            }
            other => debug!("Ignoring {:?} in training mode", other),
        }
    }
}

fn training_step(mut training: ResMut<Training>, mut stats: ResMut<EpisodeStats>) {
    let step = training.0.step();
    if let Some(outcome) = step.outcome {
        stats.record(outcome, step.ticks);
        if stats.episodes % 100 == 0 {
            info!(
                "{} episodes, success rate {:.1}%, epsilon {:.3}",
                stats.episodes,
                stats.success_rate() * 100.0,
                training.0.policy().epsilon()
            );
        }
    }
}
