#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decision making for firefighters.
//!
//! A policy inspects the world through its read-only query surface and picks
//! the next single action for one firefighter. The turn engine applies the
//! action, deducts action points and asks again until the turn ends.

mod directed;
mod random;

use std::{fmt, str::FromStr};

use flashpoint_core::{Action, AgentId, CellCoord};
use flashpoint_world::World;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use directed::{nearest_hazard, nearest_victim, RoleDirectedPolicy};
pub use random::{legal_actions, RandomPolicy};

/// Capability that selects the next action for a firefighter.
pub trait AgentPolicy {
    /// Chooses the next single action for the agent. `Action::Wait` ends the turn.
    fn next_action<R>(&mut self, world: &World, agent: AgentId, rng: &mut R) -> Action
    where
        R: Rng + ?Sized;

    /// Follow-up action to attempt right after a successful move.
    fn post_move(&mut self, _world: &World, _agent: AgentId) -> Option<Action> {
        None
    }
}

/// Closed set of available policy variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Uniform choice among legal actions.
    Random,
    /// Role-based target selection with A* routing.
    #[default]
    RoleDirected,
}

impl PolicyKind {
    /// Whether firefighters driven by this variant carry a role.
    #[must_use]
    pub const fn assigns_roles(self) -> bool {
        matches!(self, Self::RoleDirected)
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::RoleDirected => "role_directed",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a policy name is not recognised.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown policy '{0}', expected 'random' or 'role_directed'")]
pub struct UnknownPolicy(String);

impl FromStr for PolicyKind {
    type Err = UnknownPolicy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "random" => Ok(Self::Random),
            "role_directed" | "directed" => Ok(Self::RoleDirected),
            _ => Err(UnknownPolicy(value.to_owned())),
        }
    }
}

/// Policy instance selected from [`PolicyKind`].
#[derive(Clone, Debug)]
pub enum Policy {
    /// Random variant.
    Random(RandomPolicy),
    /// Role-directed variant.
    RoleDirected(RoleDirectedPolicy),
}

impl Policy {
    /// Builds the policy variant; `entry_point` is where rescued victims are delivered.
    #[must_use]
    pub fn new(kind: PolicyKind, entry_point: CellCoord) -> Self {
        match kind {
            PolicyKind::Random => Self::Random(RandomPolicy::new()),
            PolicyKind::RoleDirected => Self::RoleDirected(RoleDirectedPolicy::new(entry_point)),
        }
    }

    /// Variant of this policy.
    #[must_use]
    pub const fn kind(&self) -> PolicyKind {
        match self {
            Self::Random(_) => PolicyKind::Random,
            Self::RoleDirected(_) => PolicyKind::RoleDirected,
        }
    }
}

impl AgentPolicy for Policy {
    fn next_action<R>(&mut self, world: &World, agent: AgentId, rng: &mut R) -> Action
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Random(policy) => policy.next_action(world, agent, rng),
            Self::RoleDirected(policy) => policy.next_action(world, agent, rng),
        }
    }

    fn post_move(&mut self, world: &World, agent: AgentId) -> Option<Action> {
        match self {
            Self::Random(policy) => policy.post_move(world, agent),
            Self::RoleDirected(policy) => policy.post_move(world, agent),
        }
    }
}
