//! StellarSim - headless orbit-launch trainer
//!
//! Runs the Q-learning episode loop at 60 frames per second and logs each
//! episode's outcome.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use stellarsim::agent::QAgent;
use stellarsim::config::{ConfigError, SimulationConfig};
use stellarsim::episode::EpisodeController;
use stellarsim::plugin::{StellarSimPlugin, Training};

const FRAME_RATE: f64 = 60.0;

fn main() -> Result<(), ConfigError> {
    let config = SimulationConfig::default();
    config.validate()?;

    let agent = QAgent::new(config.agent)?;
    let controller = EpisodeController::new(config.world, config.episode, agent)?;

    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / FRAME_RATE,
            ))),
        )
        .add_plugins(LogPlugin::default())
        .insert_resource(Training(controller))
        .add_plugins(StellarSimPlugin)
        .run();

    Ok(())
}
