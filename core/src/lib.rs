#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Flashpoint rescue engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems and agent policies submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing exactly what changed. Nothing outside the world mutates state.

use serde::{Deserialize, Serialize};

/// Action points granted to a firefighter at the start of each of its turns.
pub const ACTION_POINTS_PER_TURN: u8 = 4;

/// Cumulative damage at which a wall collapses into open floor.
pub const WALL_DESTROY_THRESHOLD: u32 = 2;

/// Damage a single firefighter hit deals to a wall.
pub const WALL_HIT_DAMAGE: u32 = 2;

/// Damage an explosion deals to each wall in its blast.
pub const EXPLOSION_WALL_DAMAGE: u32 = 1;

/// Rescued victims required to win the game.
pub const VICTIMS_TO_WIN: u32 = 7;

/// Building damage at which the structure collapses.
pub const COLLAPSE_DAMAGE: u32 = 24;

/// Lost victims at which the game is lost.
pub const VICTIMS_LOST_LIMIT: u32 = 4;

/// Location of a single grid cell expressed as column (x) and row (y).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index (x) of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index (y) of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Reports whether the two cells share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }
}

/// Unique identifier assigned to a firefighter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Structural type of a board tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Street surrounding the building; rescued victims are delivered here.
    Outside,
    /// Intact wall that blocks movement until destroyed.
    Wall,
    /// Open floor inside the building.
    Cell,
    /// Closed door that must be opened before passing.
    Door,
    /// Door that has been opened and no longer blocks movement.
    DoorOpen,
}

impl TileKind {
    /// Decodes a layout legend character (`F`, `M`, `C`, `D`).
    #[must_use]
    pub const fn from_legend(symbol: char) -> Option<Self> {
        match symbol {
            'F' => Some(Self::Outside),
            'M' => Some(Self::Wall),
            'C' => Some(Self::Cell),
            'D' => Some(Self::Door),
            _ => None,
        }
    }

    /// Reports whether the kind is open floor an agent may stand on inside the building.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Cell | Self::DoorOpen)
    }

    /// Reports whether an agent may step onto a tile of this kind.
    ///
    /// Outside tiles are enterable but are not walkable floor: they never host
    /// hazards or victims.
    #[must_use]
    pub const fn is_enterable(self) -> bool {
        matches!(self, Self::Cell | Self::DoorOpen | Self::Outside)
    }

    /// Rendering code for the tile, letting hazards override the structure.
    ///
    /// `0=Outside, 1=Wall, 2=Cell, 3=Door, 4=Smoke, 5=Fire`. Open doors render
    /// as floor.
    #[must_use]
    pub const fn render_code(self, smoke: bool, fire: bool) -> u8 {
        if fire {
            return 5;
        }
        if smoke {
            return 4;
        }
        match self {
            Self::Outside => 0,
            Self::Wall => 1,
            Self::Cell | Self::DoorOpen => 2,
            Self::Door => 3,
        }
    }
}

/// Specialisation that drives a role-directed firefighter's target choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Hunts the nearest smoke or fire, falling back to victims.
    Extinguisher,
    /// Hunts the nearest victim.
    Rescuer,
    /// Hunts whichever victim or hazard is nearest.
    Wildcard,
}

impl Role {
    const ROTATION: [Role; 3] = [Role::Extinguisher, Role::Rescuer, Role::Wildcard];

    /// Role assigned to the firefighter at the provided roster index.
    #[must_use]
    pub const fn for_index(index: usize) -> Self {
        Self::ROTATION[index % Self::ROTATION.len()]
    }

    /// Stable display name used in snapshots.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Extinguisher => "Extinguisher",
            Self::Rescuer => "Rescuer",
            Self::Wildcard => "Wildcard",
        }
    }
}

/// Single unit of work a firefighter can attempt during its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Step onto an adjacent tile.
    Move {
        /// Destination cell.
        to: CellCoord,
    },
    /// Clear smoke from the agent's tile or an adjacent one.
    ExtinguishSmoke {
        /// Cell holding the smoke.
        at: CellCoord,
    },
    /// Knock fire down to smoke on the agent's tile or an adjacent one.
    ExtinguishFire {
        /// Cell holding the fire.
        at: CellCoord,
    },
    /// Strike an adjacent wall.
    BreakWall {
        /// Wall being struck.
        at: CellCoord,
    },
    /// Open an adjacent closed door.
    OpenDoor {
        /// Door being opened.
        at: CellCoord,
    },
    /// Pick up the victim lying on the agent's tile.
    PickUpVictim,
    /// Hand a carried victim over while standing outside.
    DeliverVictim,
    /// End the turn without acting.
    Wait,
}

impl Action {
    /// Action points the action consumes for an agent in the given carry state.
    #[must_use]
    pub const fn cost(self, carrying: bool) -> u8 {
        match self {
            Self::Move { .. } => {
                if carrying {
                    2
                } else {
                    1
                }
            }
            Self::ExtinguishSmoke { .. } => 1,
            Self::ExtinguishFire { .. } => 2,
            Self::BreakWall { .. } => 2,
            Self::OpenDoor { .. } => 1,
            Self::PickUpVictim => 1,
            Self::DeliverVictim | Self::Wait => 0,
        }
    }
}

/// Reasons the world may refuse an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ActionError {
    /// The game already ended.
    #[error("the game is over")]
    GameOver,
    /// No firefighter with the given identifier exists.
    #[error("unknown firefighter")]
    UnknownAgent,
    /// The agent lacks the action points the action requires.
    #[error("action needs {required} action points but only {available} remain")]
    InsufficientActionPoints {
        /// Points the action costs.
        required: u8,
        /// Points the agent still holds.
        available: u8,
    },
    /// The targeted cell is neither the agent's tile nor adjacent to it as required.
    #[error("target cell is out of reach")]
    OutOfReach,
    /// The targeted cell does not hold what the action expects.
    #[error("target cell does not match the action")]
    InvalidTarget,
    /// The destination is occupied or cannot be entered.
    #[error("destination cannot be entered")]
    Blocked,
    /// The agent already carries a victim.
    #[error("firefighter is already carrying a victim")]
    AlreadyCarrying,
    /// The agent is not carrying a victim.
    #[error("firefighter is not carrying a victim")]
    NotCarrying,
    /// There is no victim on the agent's tile.
    #[error("no victim on this tile")]
    NoVictim,
    /// Victims may only be delivered outside the building.
    #[error("victims can only be delivered outside")]
    NotOutside,
}

/// Outcome recorded once the game reaches a terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// Enough victims were rescued.
    Win,
    /// The building collapsed.
    LoseCollapse,
    /// Too many victims were lost.
    LoseVictims,
}

impl GameResult {
    /// Evaluates the end conditions in priority order.
    #[must_use]
    pub fn evaluate(stats: &Stats) -> Option<Self> {
        if stats.victims_rescued >= VICTIMS_TO_WIN {
            Some(Self::Win)
        } else if stats.building_damage >= COLLAPSE_DAMAGE {
            Some(Self::LoseCollapse)
        } else if stats.victims_lost >= VICTIMS_LOST_LIMIT {
            Some(Self::LoseVictims)
        } else {
            None
        }
    }
}

/// Cumulative counters describing the progress of a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Victims delivered outside.
    pub victims_rescued: u32,
    /// Victims killed by explosions or dropped by evacuated firefighters.
    pub victims_lost: u32,
    /// Fires knocked down to smoke.
    pub fires_extinguished: u32,
    /// Smoke tiles cleared.
    pub smokes_removed: u32,
    /// Explosions triggered.
    pub explosions: u32,
    /// Structural damage accumulated by walls.
    pub building_damage: u32,
    /// Doors opened.
    pub doors_opened: u32,
    /// Walls destroyed.
    pub walls_broken: u32,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Starts the given firefighter's turn, refilling its action points.
    BeginTurn {
        /// Firefighter whose turn begins.
        agent: AgentId,
    },
    /// Asks the world to perform a single action for a firefighter.
    Perform {
        /// Acting firefighter.
        agent: AgentId,
        /// Action to resolve.
        action: Action,
    },
    /// Advances the hazard level of a tile: clear to smoke, smoke to fire, fire to explosion.
    AdvanceHazard {
        /// Tile selected by the hazard system.
        cell: CellCoord,
    },
    /// Sets a tile on fire outright; used to seed the opening board.
    IgniteFire {
        /// Tile to ignite.
        cell: CellCoord,
    },
    /// Places a victim marker on an empty floor tile.
    PlaceVictim {
        /// Tile receiving the victim.
        cell: CellCoord,
    },
    /// Closes the active turn: evaluates end conditions and rotates the turn order.
    EndTurn,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// A firefighter's turn began with a full action point budget.
    TurnStarted {
        /// Firefighter whose turn began.
        agent: AgentId,
    },
    /// A firefighter moved between two cells.
    AgentMoved {
        /// Firefighter that moved.
        agent: AgentId,
        /// Cell left behind.
        from: CellCoord,
        /// Cell entered.
        to: CellCoord,
    },
    /// Smoke was cleared from a tile.
    SmokeCleared {
        /// Cell that was cleared.
        cell: CellCoord,
    },
    /// Fire on a tile was knocked down to smoke.
    FireExtinguished {
        /// Cell that stopped burning.
        cell: CellCoord,
    },
    /// A wall absorbed damage without collapsing.
    WallDamaged {
        /// Wall that was hit.
        cell: CellCoord,
        /// Cumulative damage after the hit.
        damage: u32,
    },
    /// A wall collapsed into open floor.
    WallDestroyed {
        /// Former wall cell.
        cell: CellCoord,
    },
    /// A door was opened.
    DoorOpened {
        /// Door cell.
        cell: CellCoord,
    },
    /// A firefighter picked up a victim.
    VictimPickedUp {
        /// Firefighter now carrying the victim.
        agent: AgentId,
        /// Cell the victim was lifted from.
        cell: CellCoord,
    },
    /// A firefighter delivered a victim outside.
    VictimRescued {
        /// Firefighter that delivered the victim.
        agent: AgentId,
        /// Delivery cell.
        cell: CellCoord,
    },
    /// A victim died.
    VictimLost {
        /// Cell where the victim was lost.
        cell: CellCoord,
    },
    /// Smoke settled on a previously clear tile.
    SmokeAppeared {
        /// Smoky cell.
        cell: CellCoord,
    },
    /// A tile caught fire.
    FireIgnited {
        /// Burning cell.
        cell: CellCoord,
    },
    /// Fire reached an already burning tile and exploded.
    ExplosionTriggered {
        /// Centre of the blast.
        center: CellCoord,
    },
    /// A firefighter caught in a blast was carried outside.
    AgentEvacuated {
        /// Evacuated firefighter.
        agent: AgentId,
        /// Cell the firefighter was caught on.
        from: CellCoord,
        /// Outside cell the firefighter was moved to.
        to: CellCoord,
    },
    /// A victim marker appeared.
    VictimPlaced {
        /// Cell holding the new victim.
        cell: CellCoord,
    },
    /// The world refused a command.
    ActionRejected {
        /// Firefighter whose action was refused.
        agent: AgentId,
        /// Refused action.
        action: Action,
        /// Specific reason the action failed.
        reason: ActionError,
    },
    /// A turn finished and the turn order advanced.
    TurnEnded {
        /// Firefighter whose turn ended.
        agent: AgentId,
        /// Step counter after the turn.
        step: u64,
    },
    /// The game reached a terminal state.
    GameOver {
        /// Final outcome.
        result: GameResult,
    },
}

/// Serialisable view of the whole world handed to rendering clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Number of completed turns.
    pub step: u64,
    /// Whether the game is still in progress.
    pub running: bool,
    /// Final outcome once the game ended.
    pub result: Option<GameResult>,
    /// Board width in tiles.
    pub width: u32,
    /// Board height in tiles.
    pub height: u32,
    /// Identifier of the firefighter that acts next, or `-1` without agents.
    pub current_agent: i64,
    /// Every tile in row-major order.
    pub cells: Vec<CellSnapshot>,
    /// Every firefighter in roster order.
    pub agents: Vec<AgentSnapshot>,
    /// Victim markers in placement order.
    pub pois: Vec<PoiSnapshot>,
    /// Cumulative counters.
    pub stats: Stats,
}

/// Rendering view of a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    /// Column of the tile.
    pub x: u32,
    /// Row of the tile.
    pub y: u32,
    /// Render code, see [`TileKind::render_code`].
    pub state: u8,
    /// Wall damage accumulated by the tile.
    pub damage: u32,
}

/// Rendering view of a single firefighter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSnapshot {
    /// Firefighter identifier.
    pub id: u32,
    /// Column currently occupied.
    pub x: u32,
    /// Row currently occupied.
    pub y: u32,
    /// Whether the firefighter carries a victim.
    pub carrying_victim: bool,
    /// Action points left from the firefighter's latest turn.
    pub ap_remaining: u8,
    /// Role name for role-directed firefighters.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<String>,
}

/// Rendering view of a victim marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiSnapshot {
    /// Column of the victim.
    pub x: u32,
    /// Row of the victim.
    pub y: u32,
}

#[cfg(test)]
mod tests {
    use super::{Action, CellCoord, GameResult, Role, Snapshot, Stats, TileKind};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
        assert!(origin.is_adjacent(CellCoord::new(1, 2)));
        assert!(!origin.is_adjacent(origin));
    }

    #[test]
    fn hazards_override_structure_when_rendering() {
        assert_eq!(TileKind::Outside.render_code(false, false), 0);
        assert_eq!(TileKind::Wall.render_code(false, false), 1);
        assert_eq!(TileKind::Door.render_code(false, false), 3);
        assert_eq!(TileKind::DoorOpen.render_code(false, false), 2);
        assert_eq!(TileKind::Cell.render_code(true, false), 4);
        assert_eq!(TileKind::Cell.render_code(false, true), 5);
    }

    #[test]
    fn carrying_doubles_movement_cost_only() {
        let step = Action::Move {
            to: CellCoord::new(0, 0),
        };
        assert_eq!(step.cost(false), 1);
        assert_eq!(step.cost(true), 2);
        assert_eq!(Action::PickUpVictim.cost(true), 1);
        assert_eq!(Action::DeliverVictim.cost(true), 0);
    }

    #[test]
    fn end_conditions_follow_priority_order() {
        let mut stats = Stats::default();
        assert_eq!(GameResult::evaluate(&stats), None);

        stats.victims_lost = 4;
        stats.building_damage = 24;
        assert_eq!(GameResult::evaluate(&stats), Some(GameResult::LoseCollapse));

        stats.victims_rescued = 7;
        assert_eq!(GameResult::evaluate(&stats), Some(GameResult::Win));

        stats.building_damage = 0;
        stats.victims_rescued = 0;
        assert_eq!(GameResult::evaluate(&stats), Some(GameResult::LoseVictims));
    }

    #[test]
    fn roles_rotate_through_roster() {
        assert_eq!(Role::for_index(0), Role::Extinguisher);
        assert_eq!(Role::for_index(4), Role::Rescuer);
        assert_eq!(Role::for_index(5), Role::Wildcard);
    }

    #[test]
    fn snapshot_uses_client_field_names() {
        let snapshot = Snapshot {
            step: 0,
            running: true,
            result: None,
            width: 1,
            height: 1,
            current_agent: 0,
            cells: Vec::new(),
            agents: Vec::new(),
            pois: Vec::new(),
            stats: Stats::default(),
        };

        let json = serde_json::to_value(&snapshot).expect("snapshot serializes");
        assert!(json.get("currentAgent").is_some());
        assert!(json["result"].is_null());
        assert!(json["stats"].get("victimsRescued").is_some());
        assert!(json["stats"].get("wallsBroken").is_some());

        let finished = Snapshot {
            running: false,
            result: Some(GameResult::LoseCollapse),
            ..snapshot
        };
        let json = serde_json::to_value(&finished).expect("snapshot serializes");
        assert_eq!(json["result"], "LoseCollapse");
    }
}
