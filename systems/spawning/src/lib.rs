#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system responsible for victim replenishment and the opening fires.

use flashpoint_core::{CellCoord, Command, TileKind};
use flashpoint_world::{query, World};
use rand::{seq::SliceRandom, Rng};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    max_active_pois: usize,
    initial_fires: usize,
}

impl Config {
    /// Creates a new configuration using the provided victim cap and opening fire count.
    #[must_use]
    pub const fn new(max_active_pois: usize, initial_fires: usize) -> Self {
        Self {
            max_active_pois,
            initial_fires,
        }
    }
}

/// Pure system that emits victim placement and ignition commands.
#[derive(Debug)]
pub struct Spawning {
    max_active_pois: usize,
    initial_fires: usize,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            max_active_pois: config.max_active_pois,
            initial_fires: config.initial_fires,
        }
    }

    /// Maximum number of victims on the board or being carried.
    #[must_use]
    pub const fn max_active_pois(&self) -> usize {
        self.max_active_pois
    }

    /// Emits ignition commands for distinct random floor tiles.
    pub fn ignite_initial<R>(&self, world: &World, rng: &mut R, out: &mut Vec<Command>)
    where
        R: Rng + ?Sized,
    {
        let candidates: Vec<CellCoord> = query::grid(world)
            .cells()
            .filter(|(_, tile)| tile.kind() == TileKind::Cell && !tile.has_hazard())
            .map(|(cell, _)| cell)
            .collect();

        for &cell in candidates.choose_multiple(rng, self.initial_fires) {
            out.push(Command::IgniteFire { cell });
        }
    }

    /// Emits victim placements until the active victim count reaches the cap.
    ///
    /// Victims already on the board and victims being carried both count
    /// towards the cap. Sites are open floor without a victim, hazard or
    /// firefighter; fewer victims are placed when sites run out.
    pub fn replenish<R>(&self, world: &World, rng: &mut R, out: &mut Vec<Command>)
    where
        R: Rng + ?Sized,
    {
        let missing = self
            .max_active_pois
            .saturating_sub(query::victims_in_play(world));
        if missing == 0 {
            return;
        }

        for &cell in victim_sites(world).choose_multiple(rng, missing) {
            out.push(Command::PlaceVictim { cell });
        }
    }
}

/// Tiles a new victim may be placed on, in row-major order.
#[must_use]
pub fn victim_sites(world: &World) -> Vec<CellCoord> {
    query::grid(world)
        .cells()
        .filter(|(cell, tile)| {
            tile.kind() == TileKind::Cell
                && !tile.has_victim()
                && !tile.has_hazard()
                && !query::is_occupied(world, *cell)
        })
        .map(|(cell, _)| cell)
        .collect()
}
