#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Hazard system that escalates smoke and fire once per completed turn.

use flashpoint_core::{CellCoord, Command, TileKind};
use flashpoint_world::{query, World};
use rand::{seq::SliceRandom, Rng};

/// Pure system that picks the floor tile whose hazard level rises next.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hazard;

impl Hazard {
    /// Creates a new hazard system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits a single `AdvanceHazard` command for a random eligible tile.
    ///
    /// Eligible tiles are open floor without a victim marker. Nothing is
    /// emitted when the board has no such tile.
    pub fn handle<R>(&mut self, world: &World, rng: &mut R, out: &mut Vec<Command>)
    where
        R: Rng + ?Sized,
    {
        let candidates = eligible_cells(world);
        if let Some(&cell) = candidates.choose(rng) {
            out.push(Command::AdvanceHazard { cell });
        }
    }
}

/// Floor tiles the hazard may land on, in row-major order.
#[must_use]
pub fn eligible_cells(world: &World) -> Vec<CellCoord> {
    query::grid(world)
        .cells()
        .filter(|(_, tile)| tile.kind() == TileKind::Cell && !tile.has_victim())
        .map(|(cell, _)| cell)
        .collect()
}
