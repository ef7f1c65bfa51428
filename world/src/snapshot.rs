//! Immutable rendering snapshots sourced from the authoritative world state.

use crate::World;
use flashpoint_core::{AgentSnapshot, CellSnapshot, PoiSnapshot, Snapshot};

/// Captures the full serialisable view of the world.
pub(crate) fn capture(world: &World) -> Snapshot {
    Snapshot {
        step: world.step,
        running: world.result.is_none(),
        result: world.result,
        width: world.grid.width(),
        height: world.grid.height(),
        current_agent: current_agent(world),
        cells: cells(world),
        agents: agents(world),
        pois: world
            .pois
            .iter()
            .map(|cell| PoiSnapshot {
                x: cell.column(),
                y: cell.row(),
            })
            .collect(),
        stats: world.stats,
    }
}

fn current_agent(world: &World) -> i64 {
    world
        .agents
        .get(world.turn_cursor)
        .map_or(-1, |agent| i64::from(agent.id.get()))
}

fn cells(world: &World) -> Vec<CellSnapshot> {
    world
        .grid
        .cells()
        .map(|(cell, tile)| CellSnapshot {
            x: cell.column(),
            y: cell.row(),
            state: tile.kind().render_code(tile.smoke(), tile.fire()),
            damage: tile.wall_damage(),
        })
        .collect()
}

fn agents(world: &World) -> Vec<AgentSnapshot> {
    world
        .agents
        .iter()
        .map(|agent| AgentSnapshot {
            id: agent.id.get(),
            x: agent.cell.column(),
            y: agent.cell.row(),
            carrying_victim: agent.carrying_victim,
            ap_remaining: agent.action_points,
            role: agent.role.map(|role| role.name().to_owned()),
        })
        .collect()
}
