#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn engine for the Flashpoint rescue simulation.
//!
//! [`Simulation`] owns the world, the policy, the hazard and spawning systems
//! and the single seeded generator shared by all of them. Each call to
//! [`Simulation::advance`] plays one firefighter's full turn followed by the
//! end-of-turn effects. [`Session`] wraps a simulation behind the
//! initialize/advance/reset boundary used by clients.

mod config;
mod error;
mod session;

use flashpoint_core::{Action, AgentId, Command, Event, Role, Snapshot};
use flashpoint_system_hazard::Hazard;
use flashpoint_system_policy::{AgentPolicy, Policy};
use flashpoint_system_spawning::{Config as SpawningConfig, Spawning};
use flashpoint_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

pub use config::{
    ConfigError, GameConfig, DEFAULT_AGENT_COUNT, DEFAULT_ENTRY_POINT, DEFAULT_INITIAL_FIRES,
    DEFAULT_MAX_ACTIVE_POIS, DEFAULT_SEED,
};
pub use error::EngineError;
pub use session::Session;

/// A single game in progress.
#[derive(Debug)]
pub struct Simulation {
    config: GameConfig,
    world: World,
    policy: Policy,
    hazard: Hazard,
    spawning: Spawning,
    rng: ChaCha8Rng,
}

impl Simulation {
    /// Sets up a new game seeded from the configuration.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }

    /// Sets up a new game driven by the provided generator.
    ///
    /// The configuration is clamped first. The opening fires are lit before
    /// the victim markers are placed.
    pub fn with_rng(config: GameConfig, rng: ChaCha8Rng) -> Result<Self, ConfigError> {
        let config = config.clamped();
        let grid = config.grid()?;
        let assigns_roles = config.policy.assigns_roles();
        let roster = config
            .starting_positions
            .iter()
            .take(config.agent_count)
            .enumerate()
            .map(|(index, cell)| (*cell, assigns_roles.then(|| Role::for_index(index))));
        let world = World::new(grid, roster);
        config.validate(&world)?;

        let mut simulation = Self {
            policy: Policy::new(config.policy, config.entry_point),
            hazard: Hazard::new(),
            spawning: Spawning::new(SpawningConfig::new(
                config.max_active_pois,
                config.initial_fires,
            )),
            world,
            rng,
            config,
        };

        let mut events = Vec::new();
        let mut commands = Vec::new();
        simulation
            .spawning
            .ignite_initial(&simulation.world, &mut simulation.rng, &mut commands);
        simulation.execute(&mut commands, &mut events);
        simulation
            .spawning
            .replenish(&simulation.world, &mut simulation.rng, &mut commands);
        simulation.execute(&mut commands, &mut events);

        info!(
            agents = simulation.config.agent_count,
            max_active_pois = simulation.config.max_active_pois,
            policy = %simulation.policy.kind(),
            seed = simulation.config.seed,
            "simulation initialized"
        );
        Ok(simulation)
    }

    /// Plays one firefighter's full turn plus the end-of-turn effects.
    ///
    /// Returns every event produced during the step. Once the game is over
    /// the call is a no-op and returns no events.
    pub fn advance(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if !query::is_running(&self.world) {
            return events;
        }
        let Some(agent) = query::current_agent(&self.world) else {
            return events;
        };

        world::apply(&mut self.world, Command::BeginTurn { agent }, &mut events);
        self.play_turn(agent, &mut events);

        let mut commands = Vec::new();
        self.hazard.handle(&self.world, &mut self.rng, &mut commands);
        self.execute(&mut commands, &mut events);
        self.spawning.replenish(&self.world, &mut self.rng, &mut commands);
        self.execute(&mut commands, &mut events);

        world::apply(&mut self.world, Command::EndTurn, &mut events);
        debug!(
            agent = agent.get(),
            step = query::step(&self.world),
            events = events.len(),
            "turn complete"
        );
        events
    }

    /// Advances until the game ends or `max_turns` turns have been played.
    ///
    /// Returns the number of turns actually played.
    pub fn run(&mut self, max_turns: u64) -> u64 {
        let mut played = 0;
        while played < max_turns && self.is_running() {
            let _ = self.advance();
            played += 1;
        }
        played
    }

    /// Captures the serialisable view of the game.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        query::snapshot(&self.world)
    }

    /// Whether the game is still in progress.
    #[must_use]
    pub fn is_running(&self) -> bool {
        query::is_running(&self.world)
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Effective, clamped configuration of the game.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn play_turn(&mut self, agent: AgentId, events: &mut Vec<Event>) {
        loop {
            let action = self.policy.next_action(&self.world, agent, &mut self.rng);
            if action == Action::Wait || !self.perform(agent, action, events) {
                break;
            }
            if action == Action::DeliverVictim {
                break;
            }
            if matches!(action, Action::Move { .. }) {
                if let Some(follow_up) = self.policy.post_move(&self.world, agent) {
                    if !self.perform(agent, follow_up, events)
                        || follow_up == Action::DeliverVictim
                    {
                        break;
                    }
                }
            }
            let remaining =
                query::agent(&self.world, agent).map_or(0, |agent| agent.action_points());
            if remaining == 0 {
                break;
            }
        }
    }

    /// Applies a single action and reports whether the world accepted it.
    fn perform(&mut self, agent: AgentId, action: Action, events: &mut Vec<Event>) -> bool {
        let start = events.len();
        world::apply(&mut self.world, Command::Perform { agent, action }, events);
        !events[start..]
            .iter()
            .any(|event| matches!(event, Event::ActionRejected { .. }))
    }

    fn execute(&mut self, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }
}
