#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the Flashpoint rescue engine.

mod grid;
pub mod navigation;
mod roster;
mod snapshot;

use flashpoint_core::{
    Action, ActionError, AgentId, CellCoord, Command, Event, GameResult, Role, Stats, TileKind,
    EXPLOSION_WALL_DAMAGE, WALL_DESTROY_THRESHOLD, WALL_HIT_DAMAGE,
};
use tracing::{debug, info, warn};

pub use grid::{LayoutError, Tile, TileGrid, DEFAULT_LAYOUT};
pub use roster::{Firefighter, DEFAULT_STARTING_POSITIONS};

/// Represents the authoritative state of a single rescue game.
#[derive(Clone, Debug)]
pub struct World {
    grid: TileGrid,
    agents: Vec<Firefighter>,
    pois: Vec<CellCoord>,
    stats: Stats,
    step: u64,
    turn_cursor: usize,
    result: Option<GameResult>,
}

impl World {
    /// Creates a world over the provided grid with one firefighter per roster entry.
    ///
    /// Firefighters are numbered from zero in roster order and start with a
    /// full action point budget.
    #[must_use]
    pub fn new<I>(grid: TileGrid, roster: I) -> Self
    where
        I: IntoIterator<Item = (CellCoord, Option<Role>)>,
    {
        Self {
            grid,
            agents: roster::build(roster),
            pois: Vec::new(),
            stats: Stats::default(),
            step: 0,
            turn_cursor: 0,
            result: None,
        }
    }

    fn agent_index(&self, agent: AgentId) -> Option<usize> {
        self.agents.iter().position(|candidate| candidate.id == agent)
    }

    fn is_occupied(&self, cell: CellCoord) -> bool {
        self.agents.iter().any(|agent| agent.cell == cell)
    }

    fn remove_poi(&mut self, cell: CellCoord) {
        self.pois.retain(|poi| *poi != cell);
        if let Some(tile) = self.grid.tile_mut(cell) {
            tile.has_victim = false;
        }
    }

    /// Applies wall damage and reports the resulting event.
    fn damage_wall(&mut self, cell: CellCoord, amount: u32, out_events: &mut Vec<Event>) {
        let Some(tile) = self.grid.tile_mut(cell) else {
            return;
        };
        if tile.kind != TileKind::Wall {
            return;
        }

        tile.wall_damage = tile.wall_damage.saturating_add(amount);
        self.stats.building_damage = self.stats.building_damage.saturating_add(amount);
        if tile.wall_damage >= WALL_DESTROY_THRESHOLD {
            tile.kind = TileKind::Cell;
            self.stats.walls_broken += 1;
            out_events.push(Event::WallDestroyed { cell });
        } else {
            out_events.push(Event::WallDamaged {
                cell,
                damage: tile.wall_damage,
            });
        }
    }

    fn perform(
        &mut self,
        agent: AgentId,
        action: Action,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        if self.result.is_some() {
            return Err(ActionError::GameOver);
        }
        let index = self.agent_index(agent).ok_or(ActionError::UnknownAgent)?;
        let (position, carrying, available) = {
            let firefighter = &self.agents[index];
            (
                firefighter.cell,
                firefighter.carrying_victim,
                firefighter.action_points,
            )
        };
        let required = action.cost(carrying);
        if required > available {
            return Err(ActionError::InsufficientActionPoints {
                required,
                available,
            });
        }

        match action {
            Action::Move { to } => {
                if !position.is_adjacent(to) {
                    return Err(ActionError::OutOfReach);
                }
                let tile = self.grid.tile_at(to).ok_or(ActionError::OutOfReach)?;
                if !tile.kind().is_enterable() || tile.fire() {
                    return Err(ActionError::Blocked);
                }
                self.agents[index].cell = to;
                out_events.push(Event::AgentMoved {
                    agent,
                    from: position,
                    to,
                });
            }
            Action::ExtinguishSmoke { at } => {
                ensure_within_reach(position, at)?;
                let tile = self.grid.tile_mut(at).ok_or(ActionError::OutOfReach)?;
                if !tile.smoke {
                    return Err(ActionError::InvalidTarget);
                }
                tile.smoke = false;
                self.stats.smokes_removed += 1;
                out_events.push(Event::SmokeCleared { cell: at });
            }
            Action::ExtinguishFire { at } => {
                ensure_within_reach(position, at)?;
                let tile = self.grid.tile_mut(at).ok_or(ActionError::OutOfReach)?;
                if !tile.fire {
                    return Err(ActionError::InvalidTarget);
                }
                tile.fire = false;
                tile.smoke = true;
                self.stats.fires_extinguished += 1;
                out_events.push(Event::FireExtinguished { cell: at });
            }
            Action::BreakWall { at } => {
                if !position.is_adjacent(at) {
                    return Err(ActionError::OutOfReach);
                }
                let kind = self.grid.tile_at(at).map(Tile::kind);
                if kind != Some(TileKind::Wall) {
                    return Err(ActionError::InvalidTarget);
                }
                self.damage_wall(at, WALL_HIT_DAMAGE, out_events);
            }
            Action::OpenDoor { at } => {
                if !position.is_adjacent(at) {
                    return Err(ActionError::OutOfReach);
                }
                let tile = self.grid.tile_mut(at).ok_or(ActionError::OutOfReach)?;
                if tile.kind != TileKind::Door {
                    return Err(ActionError::InvalidTarget);
                }
                tile.kind = TileKind::DoorOpen;
                self.stats.doors_opened += 1;
                out_events.push(Event::DoorOpened { cell: at });
            }
            Action::PickUpVictim => {
                if carrying {
                    return Err(ActionError::AlreadyCarrying);
                }
                if !self.grid.tile_at(position).is_some_and(Tile::has_victim) {
                    return Err(ActionError::NoVictim);
                }
                self.remove_poi(position);
                self.agents[index].carrying_victim = true;
                out_events.push(Event::VictimPickedUp {
                    agent,
                    cell: position,
                });
            }
            Action::DeliverVictim => {
                if !carrying {
                    return Err(ActionError::NotCarrying);
                }
                let kind = self.grid.tile_at(position).map(Tile::kind);
                if kind != Some(TileKind::Outside) {
                    return Err(ActionError::NotOutside);
                }
                self.agents[index].carrying_victim = false;
                self.stats.victims_rescued += 1;
                out_events.push(Event::VictimRescued {
                    agent,
                    cell: position,
                });
            }
            Action::Wait => {}
        }

        self.agents[index].spend(required);
        debug!(
            agent = agent.get(),
            ?action,
            remaining = self.agents[index].action_points,
            "action applied"
        );
        Ok(())
    }

    fn advance_hazard(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let Some(tile) = self.grid.tile_mut(cell) else {
            warn!(?cell, "hazard targeted a cell outside the board");
            return;
        };

        if tile.fire {
            self.explode(cell, out_events);
        } else if tile.smoke {
            tile.smoke = false;
            tile.fire = true;
            debug!(?cell, "smoke ignited");
            out_events.push(Event::FireIgnited { cell });
        } else {
            tile.smoke = true;
            debug!(?cell, "smoke appeared");
            out_events.push(Event::SmokeAppeared { cell });
        }
    }

    fn explode(&mut self, center: CellCoord, out_events: &mut Vec<Event>) {
        self.stats.explosions += 1;
        info!(?center, "explosion");
        out_events.push(Event::ExplosionTriggered { center });

        let mut affected = Vec::with_capacity(5);
        affected.push(center);
        affected.extend(self.grid.neighbors4(center));

        for &cell in &affected {
            self.damage_wall(cell, EXPLOSION_WALL_DAMAGE, out_events);
            if self.grid.tile_at(cell).is_some_and(Tile::has_victim) {
                self.remove_poi(cell);
                self.stats.victims_lost += 1;
                out_events.push(Event::VictimLost { cell });
            }
        }

        let caught: Vec<usize> = self
            .agents
            .iter()
            .enumerate()
            .filter(|(_, agent)| affected.contains(&agent.cell))
            .map(|(index, _)| index)
            .collect();

        for index in caught {
            let from = self.agents[index].cell;
            let agent = self.agents[index].id;
            if self.agents[index].carrying_victim {
                self.agents[index].carrying_victim = false;
                self.stats.victims_lost += 1;
                out_events.push(Event::VictimLost { cell: from });
            }
            match self.grid.nearest_of_kind(from, TileKind::Outside) {
                Some(to) if to == from => {}
                Some(to) => {
                    self.agents[index].cell = to;
                    out_events.push(Event::AgentEvacuated { agent, from, to });
                }
                None => warn!(agent = agent.get(), "no outside tile to evacuate to"),
            }
        }
    }

    fn ignite(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let Some(tile) = self.grid.tile_mut(cell) else {
            return;
        };
        if tile.kind != TileKind::Cell {
            warn!(?cell, kind = ?tile.kind, "only floor tiles can be ignited");
            return;
        }
        tile.smoke = false;
        tile.fire = true;
        out_events.push(Event::FireIgnited { cell });
    }

    fn place_victim(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let occupied = self.is_occupied(cell);
        let Some(tile) = self.grid.tile_mut(cell) else {
            return;
        };
        if tile.kind != TileKind::Cell || tile.has_victim || tile.has_hazard() || occupied {
            warn!(?cell, "victim placement refused");
            return;
        }
        tile.has_victim = true;
        self.pois.push(cell);
        out_events.push(Event::VictimPlaced { cell });
    }

    fn end_turn(&mut self, out_events: &mut Vec<Event>) {
        if self.result.is_some() {
            return;
        }

        if let Some(result) = GameResult::evaluate(&self.stats) {
            self.result = Some(result);
            info!(?result, step = self.step, "game over");
            out_events.push(Event::GameOver { result });
        }

        self.step = self.step.saturating_add(1);
        let Some(agent) = self.agents.get(self.turn_cursor).map(Firefighter::id) else {
            return;
        };
        self.turn_cursor = (self.turn_cursor + 1) % self.agents.len();
        out_events.push(Event::TurnEnded {
            agent,
            step: self.step,
        });
    }
}

fn ensure_within_reach(position: CellCoord, target: CellCoord) -> Result<(), ActionError> {
    if position == target || position.is_adjacent(target) {
        Ok(())
    } else {
        Err(ActionError::OutOfReach)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::BeginTurn { agent } => {
            if world.result.is_some() {
                return;
            }
            if let Some(index) = world.agent_index(agent) {
                world.agents[index].refill();
                out_events.push(Event::TurnStarted { agent });
            }
        }
        Command::Perform { agent, action } => {
            if let Err(reason) = world.perform(agent, action, out_events) {
                warn!(agent = agent.get(), ?action, %reason, "action rejected");
                out_events.push(Event::ActionRejected {
                    agent,
                    action,
                    reason,
                });
            }
        }
        Command::AdvanceHazard { cell } => {
            if world.result.is_none() {
                world.advance_hazard(cell, out_events);
            }
        }
        Command::IgniteFire { cell } => world.ignite(cell, out_events),
        Command::PlaceVictim { cell } => world.place_victim(cell, out_events),
        Command::EndTurn => world.end_turn(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use flashpoint_core::{AgentId, CellCoord, GameResult, Snapshot, Stats, TileKind};

    use super::{navigation, Firefighter, TileGrid, World};

    /// Provides read-only access to the board.
    #[must_use]
    pub fn grid(world: &World) -> &TileGrid {
        &world.grid
    }

    /// Every firefighter in roster order.
    #[must_use]
    pub fn agents(world: &World) -> &[Firefighter] {
        &world.agents
    }

    /// Looks up a single firefighter.
    #[must_use]
    pub fn agent(world: &World, agent: AgentId) -> Option<&Firefighter> {
        world.agents.iter().find(|candidate| candidate.id == agent)
    }

    /// Firefighter whose turn comes next, or `None` for an empty roster.
    #[must_use]
    pub fn current_agent(world: &World) -> Option<AgentId> {
        world.agents.get(world.turn_cursor).map(Firefighter::id)
    }

    /// Victim markers still lying on the board, in placement order.
    #[must_use]
    pub fn pois(world: &World) -> &[CellCoord] {
        &world.pois
    }

    /// Victims on the board plus victims being carried.
    #[must_use]
    pub fn victims_in_play(world: &World) -> usize {
        let carried = world
            .agents
            .iter()
            .filter(|agent| agent.carrying_victim)
            .count();
        world.pois.len() + carried
    }

    /// Cumulative game counters.
    #[must_use]
    pub fn stats(world: &World) -> Stats {
        world.stats
    }

    /// Number of completed turns.
    #[must_use]
    pub fn step(world: &World) -> u64 {
        world.step
    }

    /// Final outcome, once one has been reached.
    #[must_use]
    pub fn result(world: &World) -> Option<GameResult> {
        world.result
    }

    /// Whether the game is still in progress.
    #[must_use]
    pub fn is_running(world: &World) -> bool {
        world.result.is_none()
    }

    /// Reports whether any firefighter stands on the cell.
    #[must_use]
    pub fn is_occupied(world: &World, cell: CellCoord) -> bool {
        world.is_occupied(cell)
    }

    /// Manhattan-nearest street tile to the provided cell.
    #[must_use]
    pub fn nearest_outside(world: &World, from: CellCoord) -> Option<CellCoord> {
        world.grid.nearest_of_kind(from, TileKind::Outside)
    }

    /// Cheapest route across the board in its current state.
    #[must_use]
    pub fn find_path(world: &World, start: CellCoord, goal: CellCoord) -> Option<Vec<CellCoord>> {
        navigation::find_path(&world.grid, start, goal)
    }

    /// Captures the serialisable view handed to clients.
    #[must_use]
    pub fn snapshot(world: &World) -> Snapshot {
        crate::snapshot::capture(world)
    }
}
