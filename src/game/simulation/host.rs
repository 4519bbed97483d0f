//! Services the simulation consumes but does not implement.
//!
//! Picking, path planning and presentation belong to whoever hosts the
//! simulation. The Bevy layer provides [`CameraSpatialQuery`](crate::game::control::CameraSpatialQuery),
//! [`DirectNavigator`](super::DirectNavigator) and [`PresentationQueue`](super::PresentationQueue);
//! tests substitute their own.

use bevy::prelude::*;

use crate::game::combat::CombatState;
use super::components::Team;
use super::registry::UnitId;

/// Classification masks for [`SpatialQuery::hit_test`]
pub mod layers {
    /// Units the player may select
    pub const SELECTABLE: u32 = 1 << 0;
    /// Walkable ground
    pub const GROUND: u32 = 1 << 1;
    /// Units the player may order an attack on
    pub const ATTACKABLE: u32 = 1 << 2;
}

/// Result of a pointer hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerHit {
    Unit(UnitId),
    Ground(Vec3),
    Nothing,
}

/// Screen-space picking against the live scene.
pub trait SpatialQuery {
    /// Nearest entity or ground point under `screen`, restricted to `mask`.
    fn hit_test(&self, screen: Vec2, mask: u32) -> PointerHit;

    /// Screen position of a world point, or `None` when it is off camera.
    fn world_to_screen(&self, world: Vec3) -> Option<Vec2>;
}

/// Progress of a unit's current path request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PathStatus {
    pub pending: bool,
    pub has_path: bool,
    pub remaining_distance: f32,
    pub stopping_distance: f32,
}

impl PathStatus {
    /// No path is being computed and either none is left or the unit is inside its stopping distance.
    pub fn arrived(&self) -> bool {
        !self.pending && (!self.has_path || self.remaining_distance <= self.stopping_distance)
    }
}

/// Moves units towards requested destinations.
pub trait PathPlanner {
    /// Replace any current request for `unit`.
    fn set_destination(&mut self, unit: UnitId, destination: Vec3, stopping_distance: f32);

    /// Drop the current request and hold position.
    fn stop(&mut self, unit: UnitId);

    fn status(&self, unit: UnitId) -> PathStatus;

    /// Release all state held for a removed unit.
    fn forget(&mut self, unit: UnitId);
}

/// Notifications for whatever draws the game. The simulation keeps no rendering state.
pub trait Presentation {
    fn unit_spawned(&mut self, unit: UnitId, team: Team, position: Vec3);
    fn selection_changed(&mut self, unit: UnitId, selected: bool);
    fn health_changed(&mut self, unit: UnitId, current: f32, max: f32);
    fn state_changed(&mut self, unit: UnitId, from: CombatState, to: CombatState);
    fn unit_removed(&mut self, unit: UnitId);
    fn marker_placed(&mut self, position: Vec3, duration: f32);
    fn marker_cleared(&mut self);
}

/// Presentation notification, as buffered by [`PresentationQueue`](super::PresentationQueue).
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationEvent {
    Spawned { unit: UnitId, team: Team, position: Vec3 },
    SelectionChanged { unit: UnitId, selected: bool },
    HealthChanged { unit: UnitId, current: f32, max: f32 },
    StateChanged { unit: UnitId, from: CombatState, to: CombatState },
    Removed { unit: UnitId },
    MarkerPlaced { position: Vec3, duration: f32 },
    MarkerCleared,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrival_rules() {
        let pending = PathStatus { pending: true, has_path: false, remaining_distance: 0.0, stopping_distance: 0.0 };
        assert!(!pending.arrived(), "A pending request is never an arrival");

        let idle = PathStatus::default();
        assert!(idle.arrived(), "No path at all counts as arrived");

        let moving = PathStatus { pending: false, has_path: true, remaining_distance: 4.0, stopping_distance: 1.0 };
        assert!(!moving.arrived());

        let inside = PathStatus { remaining_distance: 0.5, ..moving };
        assert!(inside.arrived());
    }
}
