//! Game configuration loadable from TOML.

use std::{fs, path::Path};

use flashpoint_core::{CellCoord, TileKind};
use flashpoint_system_policy::PolicyKind;
use flashpoint_world::{
    query, LayoutError, TileGrid, World, DEFAULT_LAYOUT, DEFAULT_STARTING_POSITIONS,
};
use serde::{Deserialize, Serialize};

/// Seed used when no seed is configured.
pub const DEFAULT_SEED: u64 = 0x5eed_f1a5;

/// Firefighters placed when no count is requested.
pub const DEFAULT_AGENT_COUNT: usize = 6;

/// Victim markers kept in play when no cap is requested.
pub const DEFAULT_MAX_ACTIVE_POIS: usize = 3;

/// Fires burning on the opening board.
pub const DEFAULT_INITIAL_FIRES: usize = 3;

/// Street tile next to the front door where rescued victims are delivered.
pub const DEFAULT_ENTRY_POINT: CellCoord = CellCoord::new(0, 5);

/// Reasons a configuration may be refused.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML for [`GameConfig`].
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
    /// The custom layout could not be parsed.
    #[error("invalid layout")]
    Layout(#[from] LayoutError),
    /// No starting positions were configured.
    #[error("at least one starting position is required")]
    NoStartingPositions,
    /// A starting position lies off the board or on a tile nobody can stand on.
    #[error("starting position ({}, {}) is not an enterable tile", .0.column(), .0.row())]
    InvalidStartingPosition(CellCoord),
    /// The entry point is not a street tile.
    #[error("entry point ({}, {}) is not an outside tile", .0.column(), .0.row())]
    InvalidEntryPoint(CellCoord),
}

/// Parameters of a single game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Number of firefighters, one per starting position.
    pub agent_count: usize,
    /// Cap on victims on the board plus victims being carried.
    pub max_active_pois: usize,
    /// Policy driving every firefighter.
    pub policy: PolicyKind,
    /// Seed of the game's random generator.
    pub seed: u64,
    /// Fires set before the first turn.
    pub initial_fires: usize,
    /// Delivery tile for rescued victims.
    pub entry_point: CellCoord,
    /// Starting cells in firefighter id order.
    pub starting_positions: Vec<CellCoord>,
    /// Custom layout rows using the `F`/`M`/`C`/`D` legend.
    pub layout: Option<Vec<String>>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            agent_count: DEFAULT_AGENT_COUNT,
            max_active_pois: DEFAULT_MAX_ACTIVE_POIS,
            policy: PolicyKind::default(),
            seed: DEFAULT_SEED,
            initial_fires: DEFAULT_INITIAL_FIRES,
            entry_point: DEFAULT_ENTRY_POINT,
            starting_positions: DEFAULT_STARTING_POSITIONS.to_vec(),
            layout: None,
        }
    }
}

impl GameConfig {
    /// Parses a configuration from TOML; missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Normalises out-of-range counts instead of failing.
    ///
    /// The agent count is limited to `1..=starting_positions.len()` and at
    /// least one victim marker is always kept in play.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        let capacity = self.starting_positions.len().max(1);
        self.agent_count = self.agent_count.clamp(1, capacity);
        self.max_active_pois = self.max_active_pois.max(1);
        self
    }

    /// Builds the board described by the configuration.
    pub fn grid(&self) -> Result<TileGrid, ConfigError> {
        let grid = match &self.layout {
            Some(rows) => TileGrid::from_rows(rows)?,
            None => TileGrid::parse(DEFAULT_LAYOUT)?,
        };
        Ok(grid)
    }

    /// Checks the starting positions and entry point against the board.
    pub(crate) fn validate(&self, world: &World) -> Result<(), ConfigError> {
        if self.starting_positions.is_empty() {
            return Err(ConfigError::NoStartingPositions);
        }
        let grid = query::grid(world);
        for &cell in self.starting_positions.iter().take(self.agent_count) {
            let enterable = grid
                .tile_at(cell)
                .is_some_and(|tile| tile.kind().is_enterable());
            if !enterable {
                return Err(ConfigError::InvalidStartingPosition(cell));
            }
        }
        let entry = grid.tile_at(self.entry_point).map(|tile| tile.kind());
        if entry != Some(TileKind::Outside) {
            return Err(ConfigError::InvalidEntryPoint(self.entry_point));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = GameConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn toml_overrides_selected_fields() {
        let config = GameConfig::from_toml_str(
            r#"
            agent_count = 2
            policy = "random"
            seed = 99
            entry_point = { column = 0, row = 4 }
            "#,
        )
        .expect("config parses");

        assert_eq!(config.agent_count, 2);
        assert_eq!(config.policy, PolicyKind::Random);
        assert_eq!(config.seed, 99);
        assert_eq!(config.entry_point, CellCoord::new(0, 4));
        assert_eq!(config.max_active_pois, DEFAULT_MAX_ACTIVE_POIS);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = GameConfig::from_toml_str("agents = 3").expect_err("unknown key");
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn clamping_keeps_counts_in_range() {
        let config = GameConfig {
            agent_count: 0,
            max_active_pois: 0,
            ..GameConfig::default()
        }
        .clamped();
        assert_eq!(config.agent_count, 1);
        assert_eq!(config.max_active_pois, 1);

        let config = GameConfig {
            agent_count: 40,
            ..GameConfig::default()
        }
        .clamped();
        assert_eq!(config.agent_count, DEFAULT_STARTING_POSITIONS.len());
    }

    #[test]
    fn custom_layouts_are_parsed() {
        let config = GameConfig {
            layout: Some(vec!["FCC".to_owned(), "FCM".to_owned()]),
            ..GameConfig::default()
        };
        let grid = config.grid().expect("layout parses");
        assert_eq!((grid.width(), grid.height()), (3, 2));

        let ragged = GameConfig {
            layout: Some(vec!["FCC".to_owned(), "F".to_owned()]),
            ..GameConfig::default()
        };
        assert!(matches!(ragged.grid(), Err(ConfigError::Layout(_))));
    }
}
