//! Goal-directed behaviour driven by firefighter roles.

use flashpoint_core::{Action, AgentId, CellCoord, Role, TileKind};
use flashpoint_world::{query, Firefighter, World};
use rand::Rng;

use crate::AgentPolicy;

/// Walks A* routes towards a role-specific target, one step per decision.
#[derive(Clone, Debug)]
pub struct RoleDirectedPolicy {
    entry_point: CellCoord,
}

impl RoleDirectedPolicy {
    /// Creates a policy that delivers rescued victims at `entry_point`.
    #[must_use]
    pub const fn new(entry_point: CellCoord) -> Self {
        Self { entry_point }
    }

    fn target(&self, world: &World, firefighter: &Firefighter) -> Option<CellCoord> {
        let from = firefighter.cell();
        if firefighter.carrying_victim() {
            return Some(self.entry_point);
        }
        match firefighter.role().unwrap_or(Role::Wildcard) {
            Role::Extinguisher => {
                nearest_hazard(world, from).or_else(|| nearest_victim(world, from))
            }
            Role::Rescuer => nearest_victim(world, from),
            Role::Wildcard => nearest_entity(world, from),
        }
    }

    fn act_in_place(&self, world: &World, firefighter: &Firefighter) -> Action {
        let position = firefighter.cell();
        let Some(tile) = query::grid(world).tile_at(position) else {
            return Action::Wait;
        };
        if firefighter.carrying_victim() {
            if position == self.entry_point && tile.kind() == TileKind::Outside {
                return Action::DeliverVictim;
            }
            return Action::Wait;
        }
        if tile.fire() {
            Action::ExtinguishFire { at: position }
        } else if tile.smoke() {
            Action::ExtinguishSmoke { at: position }
        } else if tile.has_victim() {
            Action::PickUpVictim
        } else {
            Action::Wait
        }
    }
}

impl AgentPolicy for RoleDirectedPolicy {
    fn next_action<R>(&mut self, world: &World, agent: AgentId, _rng: &mut R) -> Action
    where
        R: Rng + ?Sized,
    {
        let Some(firefighter) = query::agent(world, agent) else {
            return Action::Wait;
        };
        let Some(target) = self.target(world, firefighter) else {
            return Action::Wait;
        };

        let position = firefighter.cell();
        let action = if target == position {
            self.act_in_place(world, firefighter)
        } else {
            let Some(path) = query::find_path(world, position, target) else {
                return Action::Wait;
            };
            let Some(&next) = path.get(1) else {
                return Action::Wait;
            };
            let Some(tile) = query::grid(world).tile_at(next) else {
                return Action::Wait;
            };
            match tile.kind() {
                TileKind::Wall => Action::BreakWall { at: next },
                TileKind::Door => Action::OpenDoor { at: next },
                _ if tile.fire() => Action::ExtinguishFire { at: next },
                _ if tile.smoke() => Action::ExtinguishSmoke { at: next },
                _ => Action::Move { to: next },
            }
        };

        if action.cost(firefighter.carrying_victim()) > firefighter.action_points() {
            return Action::Wait;
        }
        action
    }

    fn post_move(&mut self, world: &World, agent: AgentId) -> Option<Action> {
        let firefighter = query::agent(world, agent)?;
        let position = firefighter.cell();
        let tile = query::grid(world).tile_at(position)?;

        if firefighter.carrying_victim() {
            let delivers = position == self.entry_point && tile.kind() == TileKind::Outside;
            return delivers.then_some(Action::DeliverVictim);
        }
        let affordable = Action::PickUpVictim.cost(false) <= firefighter.action_points();
        (tile.has_victim() && affordable).then_some(Action::PickUpVictim)
    }
}

/// Manhattan-nearest smoky or burning tile; ties resolve to the first in row-major order.
#[must_use]
pub fn nearest_hazard(world: &World, from: CellCoord) -> Option<CellCoord> {
    query::grid(world)
        .cells()
        .filter(|(_, tile)| tile.has_hazard())
        .map(|(cell, _)| cell)
        .min_by_key(|cell| cell.manhattan_distance(from))
}

/// Manhattan-nearest victim marker; ties resolve to the earliest placed.
#[must_use]
pub fn nearest_victim(world: &World, from: CellCoord) -> Option<CellCoord> {
    query::pois(world)
        .iter()
        .copied()
        .min_by_key(|cell| cell.manhattan_distance(from))
}

fn nearest_entity(world: &World, from: CellCoord) -> Option<CellCoord> {
    let hazards = query::grid(world)
        .cells()
        .filter(|(_, tile)| tile.has_hazard())
        .map(|(cell, _)| cell);
    query::pois(world)
        .iter()
        .copied()
        .chain(hazards)
        .min_by_key(|cell| cell.manhattan_distance(from))
}
