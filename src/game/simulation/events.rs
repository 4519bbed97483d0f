/// Messages for driving the simulation from outside the input pipeline.
///
/// Selection and orders go straight through [`Simulation`](super::Simulation)
/// because they need the pointer classification of the same frame. Spawning
/// is queued so that any system (debug keys, scenario setup) can request it.

use bevy::prelude::*;

use super::components::{Team, UnitStats};

// ============================================================================
// Unit Commands
// ============================================================================

/// Command to spawn a new unit
#[derive(Message, Debug, Clone)]
pub struct SpawnUnitCommand {
    pub team: Team,
    pub position: Vec3,
    /// Template override; `None` uses the team's stats from `InitialConfig`
    pub stats: Option<UnitStats>,
}

impl SpawnUnitCommand {
    pub fn new(team: Team, position: Vec3) -> Self {
        Self { team, position, stats: None }
    }
}

/// Command to remove a unit immediately, as if it had died
#[derive(Message, Debug, Clone)]
pub struct DespawnUnitCommand {
    pub unit: super::registry::UnitId,
}
