//! Interactive sandbox: applies discrete user commands to a world.
//!
//! Key and mouse mapping belongs to whatever input source produces the
//! commands; this module only defines what each command does.

use bevy::log::{info, warn};
use bevy::math::DVec2;
use bevy::prelude::Resource;

use crate::config::{BodyParams, ConfigError, WorldConfig};
use crate::physics::circular_velocity;
use crate::types::{BodyId, BodySpec, palette};
use crate::world::SimulationWorld;

/// Step applied by [`UserCommand::SpeedUp`] and [`UserCommand::SlowDown`].
pub const TIMESTEP_STEP: f64 = 0.2;

/// Timestep after a speed command, rounded to two decimals.
///
/// `None` for commands that do not change speed, and for `SlowDown` once the
/// timestep is no longer above [`TIMESTEP_STEP`].
pub fn stepped_timestep(current: f64, command: UserCommand) -> Option<f64> {
    let next = match command {
        UserCommand::SpeedUp => current + TIMESTEP_STEP,
        UserCommand::SlowDown if current > TIMESTEP_STEP => current - TIMESTEP_STEP,
        _ => return None,
    };
    Some((next * 100.0).round() / 100.0)
}

/// Kind of body the next click places.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BodyKind {
    Star,
    #[default]
    Planet,
}

/// One discrete command from the input source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UserCommand {
    SelectKind(BodyKind),
    /// Change the brush mass by the given amount; mass stays ≥ 1.
    AdjustMass(f64),
    /// Change the brush radius by the given amount; radius stays ≥ 1.
    AdjustRadius(f64),
    /// Move through the palette: `true` forward, `false` back.
    CycleColor(bool),
    TogglePause,
    Reset,
    SpeedUp,
    SlowDown,
    /// Place the selected kind of body at a world position.
    Place(DVec2),
}

/// World plus the user's brush state.
#[derive(Resource, Clone, Debug)]
pub struct Sandbox {
    world: SimulationWorld,
    kind: BodyKind,
    params: BodyParams,
    color_index: usize,
}

impl Sandbox {
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            world: SimulationWorld::new(config)?,
            kind: BodyKind::default(),
            params: BodyParams::default(),
            color_index: 0,
        })
    }

    pub fn world(&self) -> &SimulationWorld {
        &self.world
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn params(&self) -> BodyParams {
        self.params
    }

    /// Apply one command. Returns the id of a placed body, if any.
    pub fn apply(&mut self, command: UserCommand) -> Option<BodyId> {
        match command {
            UserCommand::SelectKind(kind) => {
                self.kind = kind;
                info!("Selected type: {:?}", kind);
            }
            UserCommand::AdjustMass(delta) => {
                self.params.mass = (self.params.mass + delta).max(1.0);
                info!("Mass: {}", self.params.mass);
            }
            UserCommand::AdjustRadius(delta) => {
                self.params.radius = (self.params.radius + delta).max(1.0);
                info!("Radius: {}", self.params.radius);
            }
            UserCommand::CycleColor(forward) => {
                let len = palette::BRUSH.len();
                self.color_index = if forward {
                    (self.color_index + 1) % len
                } else {
                    (self.color_index + len - 1) % len
                };
                self.params.color = palette::BRUSH[self.color_index];
            }
            UserCommand::TogglePause => {
                self.world.toggle_pause();
            }
            UserCommand::Reset => {
                self.world.reset();
                info!("Simulation reset");
            }
            UserCommand::SpeedUp | UserCommand::SlowDown => {
                if let Some(dt) = stepped_timestep(self.world.timestep(), command)
                    && let Err(err) = self.world.set_timestep(dt)
                {
                    warn!("Ignoring timestep change: {}", err);
                }
            }
            UserCommand::Place(pos) => return self.place(pos),
        }
        None
    }

    fn place(&mut self, pos: DVec2) -> Option<BodyId> {
        let spec = match self.kind {
            BodyKind::Star => BodySpec {
                pos,
                ..self.world.config().sun
            }
            .with_velocity(DVec2::ZERO),
            BodyKind::Planet => {
                let planet =
                    BodySpec::at_rest(pos, self.params.mass, self.params.radius, self.params.color);
                match self.world.primary() {
                    Some(sun) if sun.pos != pos => planet.with_velocity(circular_velocity(
                        self.world.gravity(),
                        sun.mass,
                        pos - sun.pos,
                    )),
                    _ => planet,
                }
            }
        };

        match self.world.add_body(spec) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!("Could not place body: {}", err);
                None
            }
        }
    }

    /// Advance the world by one tick.
    pub fn tick(&mut self) {
        self.world.tick();
    }
}
