//! The simulation world: owns the bodies and drives fixed-step ticks.

use bevy::log::{debug, info};
use bevy::math::DVec2;

use crate::body::Body;
use crate::config::{ConfigError, WorldConfig, validate_body, validate_timestep};
use crate::physics::{accumulate_accelerations, find_removals, prune};
use crate::types::{BodyId, BodySpec};

/// What happened during one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Bodies removed by collisions this tick, in collection order.
    pub removed: Vec<BodyId>,
}

/// Owns the body collection, the timestep and the pause flag.
///
/// The collection is only mutated between ticks; renderers and controllers
/// read copies through [`SimulationWorld::snapshot`] or shared borrows.
#[derive(Clone, Debug)]
pub struct SimulationWorld {
    config: WorldConfig,
    bodies: Vec<Body>,
    timestep: f64,
    paused: bool,
    primary: Option<BodyId>,
    next_id: u64,
    ticks: u64,
}

impl SimulationWorld {
    /// Create a world holding only the configured sun.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut world = Self {
            timestep: config.timestep,
            config,
            bodies: Vec::new(),
            paused: false,
            primary: None,
            next_id: 0,
            ticks: 0,
        };
        world.reset();
        Ok(world)
    }

    /// Replace every body with a fresh sun.
    ///
    /// Ids keep counting, so ids from before the reset never come back.
    pub fn reset(&mut self) {
        self.bodies.clear();
        let sun = self.config.sun;
        let id = self.insert(&sun);
        self.primary = Some(id);
        self.ticks = 0;
    }

    /// Add a body at the end of the collection.
    pub fn add_body(&mut self, spec: BodySpec) -> Result<BodyId, ConfigError> {
        validate_body(&spec)?;
        Ok(self.insert(&spec))
    }

    fn insert(&mut self, spec: &BodySpec) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.push(Body::from_spec(id, spec));
        debug!("Added {:?} at ({:.1}, {:.1})", id, spec.pos.x, spec.pos.y);
        id
    }

    /// Advance one tick with the configured timestep.
    ///
    /// Does nothing while paused.
    pub fn tick(&mut self) -> TickReport {
        self.advance(self.timestep)
    }

    /// Advance one tick with an explicit timestep.
    pub fn tick_with(&mut self, dt: f64) -> Result<TickReport, ConfigError> {
        validate_timestep(dt)?;
        Ok(self.advance(dt))
    }

    fn advance(&mut self, dt: f64) -> TickReport {
        if self.paused {
            return TickReport::default();
        }

        // Read phase: every acceleration from the unmoved snapshot.
        accumulate_accelerations(&mut self.bodies, self.config.gravity);

        // Write phase.
        for body in &mut self.bodies {
            body.integrate(dt);
        }

        let removals = find_removals(&self.bodies);
        let removed: Vec<BodyId> = prune(&mut self.bodies, &removals)
            .into_iter()
            .map(|body| body.id)
            .collect();

        if let Some(primary) = self.primary
            && removed.contains(&primary)
        {
            self.primary = None;
        }

        self.ticks += 1;
        TickReport { removed }
    }

    /// Copies of all live bodies, in collection order.
    pub fn snapshot(&self) -> Vec<Body> {
        self.bodies.clone()
    }

    /// Shared view of the live bodies.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|body| body.id == id)
    }

    /// The sun placed by the last reset, if it is still alive.
    pub fn primary(&self) -> Option<&Body> {
        self.primary.and_then(|id| self.body(id))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    /// Change the timestep used by subsequent ticks.
    pub fn set_timestep(&mut self, dt: f64) -> Result<(), ConfigError> {
        validate_timestep(dt)?;
        self.timestep = dt;
        info!("Simulation speed: {}", dt);
        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Toggle pause and return the new state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        info!("{}", if self.paused { "Paused" } else { "Resumed" });
        self.paused
    }

    /// Ticks since the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn gravity(&self) -> f64 {
        self.config.gravity
    }

    pub fn in_bounds(&self, pos: DVec2) -> bool {
        self.config.bounds.contains(pos)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }
}
