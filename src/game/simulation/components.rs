/// Unit data model for the simulation layer.
///
/// A [`Unit`] is plain data owned by the [`UnitRegistry`](super::UnitRegistry).
/// Nothing outside the registry holds a reference to it; other units refer to it
/// through its generation-checked [`UnitId`](super::UnitId).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::combat::CombatState;
use super::registry::UnitId;

// ============================================================================
// Teams
// ============================================================================

/// Side a unit fights for. Only player units can be selected and commanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Player,
    Enemy,
}

impl Team {
    pub fn is_opposing(self, other: Team) -> bool {
        self != other
    }
}

// ============================================================================
// Stats
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Share of max health left, clamped to [0, 1] for display.
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }
}

/// Attack profile of a combat-capable unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    /// Health removed per hit
    pub damage: f32,
    /// Hits per second
    pub attack_rate: f32,
    /// Maximum distance at which hits land
    pub attack_range: f32,
    /// Distance beyond which an engaged unit falls back to following
    pub stop_attack_range: f32,
    /// Radius in which opposing units are noticed
    pub acquisition_range: f32,
}

impl Weapon {
    /// Seconds between two hits.
    pub fn cooldown(&self) -> f32 {
        if self.attack_rate <= 0.0 {
            return f32::INFINITY;
        }
        1.0 / self.attack_rate
    }
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            damage: 10.0,
            attack_rate: 2.0,
            attack_range: 1.0,
            stop_attack_range: 1.2,
            acquisition_range: 2.0,
        }
    }
}

/// Per-team unit template, loaded from `InitialConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    pub max_health: f32,
    pub move_speed: f32,
    pub weapon: Option<Weapon>,
}

impl Default for UnitStats {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            move_speed: 3.5,
            weapon: Some(Weapon::default()),
        }
    }
}

/// Everything needed to register a new unit.
#[derive(Debug, Clone, Copy)]
pub struct UnitSpawn {
    pub team: Team,
    pub position: Vec3,
    pub stats: UnitStats,
}

impl UnitSpawn {
    pub fn new(team: Team, position: Vec3, stats: UnitStats) -> Self {
        Self { team, position, stats }
    }
}

// ============================================================================
// Unit
// ============================================================================

#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    pub team: Team,
    /// Ground position (y is always 0)
    pub position: Vec3,
    /// Rotation about +Y; a yaw of 0 faces -Z
    pub yaw: f32,
    pub move_speed: f32,
    pub health: Health,
    pub weapon: Option<Weapon>,
    pub state: CombatState,
    /// Current combat target. Resolved through the registry on every use.
    pub target: Option<UnitId>,
    /// Target came from an explicit attack order; leaving acquisition range keeps it
    pub target_ordered: bool,
    /// Seconds until the next hit may land
    pub attack_timer: f32,
    /// Executing a player move order; suppresses autonomous engagement
    pub commanded: bool,
    /// Set while selected; only selected units take move orders
    pub accepts_orders: bool,
}

impl Unit {
    pub(super) fn spawn(id: UnitId, spawn: UnitSpawn) -> Self {
        Self {
            id,
            team: spawn.team,
            position: Vec3::new(spawn.position.x, 0.0, spawn.position.z),
            yaw: 0.0,
            move_speed: spawn.stats.move_speed,
            health: Health::full(spawn.stats.max_health),
            weapon: spawn.stats.weapon,
            state: CombatState::Idle,
            target: None,
            target_ordered: false,
            attack_timer: 0.0,
            commanded: false,
            accepts_orders: false,
        }
    }

    pub fn is_combat_capable(&self) -> bool {
        self.weapon.is_some()
    }

    pub fn is_selectable(&self) -> bool {
        self.team == Team::Player
    }

    pub fn facing(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_fraction_is_clamped() {
        assert_eq!(Health::full(80.0).fraction(), 1.0);
        assert_eq!(Health { current: 20.0, max: 80.0 }.fraction(), 0.25);
        // Overkill leaves current below zero
        assert_eq!(Health { current: -5.0, max: 80.0 }.fraction(), 0.0);
        assert_eq!(Health { current: 10.0, max: 0.0 }.fraction(), 0.0);
    }

    #[test]
    fn test_teams_oppose_only_each_other() {
        assert!(Team::Player.is_opposing(Team::Enemy));
        assert!(!Team::Enemy.is_opposing(Team::Enemy));
    }
}
