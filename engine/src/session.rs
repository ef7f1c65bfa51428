//! Boundary-facing handle exposing initialize, advance and reset.

use flashpoint_core::Snapshot;

use crate::{EngineError, GameConfig, Simulation};

/// Owns at most one game and serves snapshots of it.
///
/// Every operation takes `&mut self`; callers sharing a session across
/// threads wrap it in a mutex so requests are applied one at a time.
#[derive(Debug, Default)]
pub struct Session {
    base: GameConfig,
    simulation: Option<Simulation>,
}

impl Session {
    /// Creates an uninitialised session whose games start from `base`.
    #[must_use]
    pub fn new(base: GameConfig) -> Self {
        Self {
            base,
            simulation: None,
        }
    }

    /// Starts a fresh game, replacing any game in progress.
    ///
    /// `agents` and `max_pois` override the base configuration and are
    /// clamped into range rather than refused.
    pub fn initialize(
        &mut self,
        agents: Option<usize>,
        max_pois: Option<usize>,
    ) -> Result<Snapshot, EngineError> {
        let mut config = self.base.clone();
        if let Some(agents) = agents {
            config.agent_count = agents;
        }
        if let Some(max_pois) = max_pois {
            config.max_active_pois = max_pois;
        }

        let simulation = Simulation::new(config)?;
        let snapshot = simulation.snapshot();
        self.simulation = Some(simulation);
        Ok(snapshot)
    }

    /// Plays one full turn; a finished game returns its frozen snapshot.
    pub fn advance(&mut self) -> Result<Snapshot, EngineError> {
        let simulation = self
            .simulation
            .as_mut()
            .ok_or(EngineError::NotInitialized)?;
        let _ = simulation.advance();
        Ok(simulation.snapshot())
    }

    /// Starts a fresh game with the base configuration.
    pub fn reset(&mut self) -> Result<Snapshot, EngineError> {
        self.initialize(None, None)
    }

    /// Snapshot of the current game.
    pub fn snapshot(&self) -> Result<Snapshot, EngineError> {
        self.simulation
            .as_ref()
            .map(Simulation::snapshot)
            .ok_or(EngineError::NotInitialized)
    }

    /// The game in progress, if any.
    #[must_use]
    pub fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }
}
