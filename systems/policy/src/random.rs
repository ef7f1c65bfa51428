//! Uniformly random firefighter behaviour.

use std::mem::{discriminant, Discriminant};

use flashpoint_core::{Action, AgentId, TileKind};
use flashpoint_world::{query, World};
use rand::{seq::SliceRandom, Rng};

use crate::AgentPolicy;

/// Picks uniformly among the kinds of legal, affordable action, then uniformly
/// among the targets of the chosen kind. Never pathfinds.
///
/// A firefighter carrying a victim on an outside tile always delivers it.
#[derive(Clone, Debug, Default)]
pub struct RandomPolicy;

impl RandomPolicy {
    /// Creates a new random policy.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl AgentPolicy for RandomPolicy {
    fn next_action<R>(&mut self, world: &World, agent: AgentId, rng: &mut R) -> Action
    where
        R: Rng + ?Sized,
    {
        let actions = legal_actions(world, agent);
        if actions.contains(&Action::DeliverVictim) {
            return Action::DeliverVictim;
        }

        let mut kinds: Vec<Discriminant<Action>> = Vec::new();
        for action in &actions {
            let kind = discriminant(action);
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        let Some(kind) = kinds.choose(rng).copied() else {
            return Action::Wait;
        };
        let targets: Vec<Action> = actions
            .into_iter()
            .filter(|action| discriminant(action) == kind)
            .collect();
        targets.choose(rng).copied().unwrap_or(Action::Wait)
    }
}

/// Enumerates the actions the agent may legally take with its remaining points.
///
/// Moves target unoccupied, enterable tiles that are not burning.
/// Extinguishing considers the agent's own tile before its neighbours.
#[must_use]
pub fn legal_actions(world: &World, agent: AgentId) -> Vec<Action> {
    let Some(firefighter) = query::agent(world, agent) else {
        return Vec::new();
    };
    let grid = query::grid(world);
    let position = firefighter.cell();
    let carrying = firefighter.carrying_victim();
    let budget = firefighter.action_points();

    let mut actions = Vec::new();
    let Some(own) = grid.tile_at(position) else {
        return actions;
    };

    for at in std::iter::once(position).chain(grid.neighbors4(position)) {
        let Some(tile) = grid.tile_at(at) else {
            continue;
        };
        if tile.smoke() {
            actions.push(Action::ExtinguishSmoke { at });
        }
        if tile.fire() {
            actions.push(Action::ExtinguishFire { at });
        }
    }

    for at in grid.neighbors4(position) {
        let Some(tile) = grid.tile_at(at) else {
            continue;
        };
        match tile.kind() {
            TileKind::Wall => actions.push(Action::BreakWall { at }),
            TileKind::Door => actions.push(Action::OpenDoor { at }),
            kind if kind.is_enterable() && !tile.fire() && !query::is_occupied(world, at) => {
                actions.push(Action::Move { to: at });
            }
            _ => {}
        }
    }

    if !carrying && own.has_victim() {
        actions.push(Action::PickUpVictim);
    }
    if carrying && own.kind() == TileKind::Outside {
        actions.push(Action::DeliverVictim);
    }

    actions.retain(|action| action.cost(carrying) <= budget);
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashpoint_core::{CellCoord, Command, Event};
    use flashpoint_world::{self as world, TileGrid};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn world(rows: &[&str], agents: &[CellCoord]) -> World {
        let grid = TileGrid::from_rows(rows).expect("layout parses");
        World::new(grid, agents.iter().map(|cell| (*cell, None)))
    }

    #[test]
    fn enumerates_structural_actions_around_the_agent() {
        let world = world(&["FMC", "CCD", "CCC"], &[CellCoord::new(1, 1)]);
        let actions = legal_actions(&world, AgentId::new(0));
        assert_eq!(
            actions,
            vec![
                Action::Move {
                    to: CellCoord::new(1, 2)
                },
                Action::BreakWall {
                    at: CellCoord::new(1, 0)
                },
                Action::OpenDoor {
                    at: CellCoord::new(2, 1)
                },
                Action::Move {
                    to: CellCoord::new(0, 1)
                },
            ]
        );
    }

    #[test]
    fn skips_occupied_and_burning_destinations() {
        let mut world = world(&["CCC"], &[CellCoord::new(1, 0), CellCoord::new(2, 0)]);
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::IgniteFire {
                cell: CellCoord::new(0, 0),
            },
            &mut events,
        );

        let actions = legal_actions(&world, AgentId::new(0));
        assert_eq!(
            actions,
            vec![Action::ExtinguishFire {
                at: CellCoord::new(0, 0)
            }]
        );
    }

    #[test]
    fn draws_action_kinds_uniformly_before_targets() {
        let world = world(&["MMM", "MCM", "MCM"], &[CellCoord::new(1, 1)]);
        let mut policy = RandomPolicy::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let draws = 10_000;
        let mut breaks = 0;
        for _ in 0..draws {
            match policy.next_action(&world, AgentId::new(0), &mut rng) {
                Action::BreakWall { .. } => breaks += 1,
                Action::Move { to } => assert_eq!(to, CellCoord::new(1, 2)),
                other => panic!("unexpected action {other:?}"),
            }
        }
        let share = f64::from(breaks) / f64::from(draws);
        assert!((0.45..0.55).contains(&share), "break-wall share {share}");
    }

    #[test]
    fn carried_victims_are_delivered_on_outside_tiles() {
        let mut world = world(&["FC"], &[CellCoord::new(1, 0)]);
        let agent = AgentId::new(0);
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::PlaceVictim {
                cell: CellCoord::new(1, 0),
            },
            &mut events,
        );
        for action in [
            Action::PickUpVictim,
            Action::Move {
                to: CellCoord::new(0, 0),
            },
        ] {
            world::apply(&mut world, Command::Perform { agent, action }, &mut events);
        }
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::ActionRejected { .. })));

        let mut policy = RandomPolicy::new();
        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            assert_eq!(
                policy.next_action(&world, agent, &mut rng),
                Action::DeliverVictim
            );
        }
    }

    #[test]
    fn unknown_agents_have_no_actions() {
        let world = world(&["CC"], &[]);
        assert!(legal_actions(&world, AgentId::new(3)).is_empty());
    }
}
