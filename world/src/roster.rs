//! Firefighter roster stored inside the world.

use flashpoint_core::{AgentId, CellCoord, Role, ACTION_POINTS_PER_TURN};

/// Starting cells of the six firefighters on the default board, in id order.
pub const DEFAULT_STARTING_POSITIONS: [CellCoord; 6] = [
    CellCoord::new(0, 4),
    CellCoord::new(0, 5),
    CellCoord::new(0, 6),
    CellCoord::new(13, 0),
    CellCoord::new(14, 0),
    CellCoord::new(15, 0),
];

/// State of a single firefighter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Firefighter {
    pub(crate) id: AgentId,
    pub(crate) cell: CellCoord,
    pub(crate) action_points: u8,
    pub(crate) carrying_victim: bool,
    pub(crate) role: Option<Role>,
}

impl Firefighter {
    pub(crate) const fn new(id: AgentId, cell: CellCoord, role: Option<Role>) -> Self {
        Self {
            id,
            cell,
            action_points: ACTION_POINTS_PER_TURN,
            carrying_victim: false,
            role,
        }
    }

    /// Identifier allocated when the roster was built.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Cell the firefighter stands on.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Action points left in the current or most recent turn.
    #[must_use]
    pub const fn action_points(&self) -> u8 {
        self.action_points
    }

    /// Whether the firefighter carries a victim.
    #[must_use]
    pub const fn carrying_victim(&self) -> bool {
        self.carrying_victim
    }

    /// Role driving a role-directed firefighter; `None` for random ones.
    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        self.role
    }

    pub(crate) fn spend(&mut self, points: u8) {
        self.action_points = self.action_points.saturating_sub(points);
    }

    pub(crate) fn refill(&mut self) {
        self.action_points = ACTION_POINTS_PER_TURN;
    }
}

/// Builds the roster from starting cells, numbering firefighters from zero.
pub(crate) fn build<I>(entries: I) -> Vec<Firefighter>
where
    I: IntoIterator<Item = (CellCoord, Option<Role>)>,
{
    entries
        .into_iter()
        .enumerate()
        .map(|(index, (cell, role))| {
            let id = AgentId::new(u32::try_from(index).unwrap_or(u32::MAX));
            Firefighter::new(id, cell, role)
        })
        .collect()
}
