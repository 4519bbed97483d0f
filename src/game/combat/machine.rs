//! Per-unit Idle/Follow/Attack state machine.
//!
//! The simulation calls [`CombatMachine::tick`] once per unit per tick. A tick
//! evaluates the current state and takes at most one transition, running the
//! old state's `exit` and the new state's `enter` in that order.
//!
//! Targets are resolved through the registry every tick before anything uses
//! them. A target that died earlier in the same tick simply fails to resolve.

use bevy::prelude::*;

use crate::game::math::{planar_distance, yaw_towards};
use crate::game::simulation::{PathPlanner, Presentation, UnitId, UnitRegistry};
use super::damage::{apply_damage, DamageOutcome};
use super::state::CombatState;

/// Float slack on the attack timer so cadences like 0.1s don't drift a tick late.
const ATTACK_TIMER_TOLERANCE: f32 = 1e-4;

/// Default gap kept inside attack range while following.
pub const DEFAULT_FOLLOW_EPSILON: f32 = 0.05;

#[derive(Debug, Clone, Copy)]
pub struct CombatMachine {
    /// A following unit stops this far inside its attack range
    pub follow_epsilon: f32,
}

impl Default for CombatMachine {
    fn default() -> Self {
        Self { follow_epsilon: DEFAULT_FOLLOW_EPSILON }
    }
}

impl CombatMachine {
    pub fn new(follow_epsilon: f32) -> Self {
        Self { follow_epsilon: follow_epsilon.max(0.0) }
    }

    pub fn enter(&self, registry: &mut UnitRegistry, unit: UnitId, state: CombatState, planner: &mut dyn PathPlanner) {
        let Some(u) = registry.get_mut(unit) else { return };
        match state {
            // A unit dropping out of combat holds position unless a move order is driving it
            CombatState::Idle => {
                if !u.commanded {
                    planner.stop(unit);
                }
            }
            CombatState::Follow => {}
            CombatState::Attack => planner.stop(unit),
        }
    }

    pub fn exit(&self, registry: &mut UnitRegistry, unit: UnitId, state: CombatState) {
        if state == CombatState::Idle {
            return;
        }
        // Leaving an engagement never carries a dead target into the next state
        let Some(target) = registry.get(unit).and_then(|u| u.target) else { return };
        if !registry.contains(target) {
            if let Some(u) = registry.get_mut(unit) {
                u.target = None;
            }
        }
    }

    /// Evaluate one unit. Returns the id of a unit killed by this unit's hit, if any.
    pub fn tick(
        &self,
        registry: &mut UnitRegistry,
        unit: UnitId,
        dt: f32,
        planner: &mut dyn PathPlanner,
        presentation: &mut dyn Presentation,
    ) -> Option<UnitId> {
        let state = registry.get(unit)?.state;
        let (next, killed) = match state {
            CombatState::Idle => (self.tick_idle(registry, unit), None),
            CombatState::Follow => (self.tick_follow(registry, unit, planner), None),
            CombatState::Attack => self.tick_attack(registry, unit, dt, presentation),
        };

        if let Some(next) = next {
            self.transition(registry, unit, next, planner, presentation);
        }
        killed
    }

    /// Drop any engagement and go straight to Idle. Used when a move order overrides combat.
    pub fn force_idle(
        &self,
        registry: &mut UnitRegistry,
        unit: UnitId,
        planner: &mut dyn PathPlanner,
        presentation: &mut dyn Presentation,
    ) {
        let Some(u) = registry.get_mut(unit) else { return };
        u.target = None;
        if u.state != CombatState::Idle {
            self.transition(registry, unit, CombatState::Idle, planner, presentation);
        }
    }

    fn transition(
        &self,
        registry: &mut UnitRegistry,
        unit: UnitId,
        next: CombatState,
        planner: &mut dyn PathPlanner,
        presentation: &mut dyn Presentation,
    ) {
        let Some(from) = registry.get(unit).map(|u| u.state) else { return };
        if from == next {
            return;
        }
        debug_assert!(from.can_transition_to(next), "illegal combat transition {from} -> {next}");

        self.exit(registry, unit, from);
        if let Some(u) = registry.get_mut(unit) {
            u.state = next;
        }
        self.enter(registry, unit, next, planner);

        debug!("{:?}: {} -> {}", unit, from, next);
        presentation.state_changed(unit, from, next);
    }

    /// Live opposing target and its position. Clears a target that no longer resolves.
    fn resolve_target(&self, registry: &mut UnitRegistry, unit: UnitId) -> Option<(UnitId, Vec3)> {
        let u = registry.get(unit)?;
        let target = u.target?;
        let team = u.team;
        let resolved = registry
            .get(target)
            .filter(|t| team.is_opposing(t.team))
            .map(|t| (target, t.position));

        if resolved.is_none() {
            if let Some(u) = registry.get_mut(unit) {
                u.target = None;
            }
        }
        resolved
    }

    fn tick_idle(&self, registry: &mut UnitRegistry, unit: UnitId) -> Option<CombatState> {
        let u = registry.get(unit)?;
        if u.commanded || u.weapon.is_none() {
            return None;
        }
        self.resolve_target(registry, unit).map(|_| CombatState::Follow)
    }

    fn tick_follow(&self, registry: &mut UnitRegistry, unit: UnitId, planner: &mut dyn PathPlanner) -> Option<CombatState> {
        let Some((_, target_pos)) = self.resolve_target(registry, unit) else {
            return Some(CombatState::Idle);
        };
        let u = registry.get_mut(unit)?;
        if u.commanded {
            return Some(CombatState::Idle);
        }
        let Some(weapon) = u.weapon else {
            u.target = None;
            return Some(CombatState::Idle);
        };

        if let Some(yaw) = yaw_towards(u.position, target_pos) {
            u.yaw = yaw;
        }

        if planar_distance(u.position, target_pos) < weapon.attack_range {
            return Some(CombatState::Attack);
        }

        let stopping_distance = (weapon.attack_range - self.follow_epsilon).max(0.0);
        planner.set_destination(unit, target_pos, stopping_distance);
        None
    }

    fn tick_attack(
        &self,
        registry: &mut UnitRegistry,
        unit: UnitId,
        dt: f32,
        presentation: &mut dyn Presentation,
    ) -> (Option<CombatState>, Option<UnitId>) {
        let Some((target, target_pos)) = self.resolve_target(registry, unit) else {
            return (Some(CombatState::Follow), None);
        };
        let Some(u) = registry.get_mut(unit) else { return (None, None) };
        if u.commanded {
            return (Some(CombatState::Idle), None);
        }
        let Some(weapon) = u.weapon else {
            u.target = None;
            return (Some(CombatState::Follow), None);
        };

        if let Some(yaw) = yaw_towards(u.position, target_pos) {
            u.yaw = yaw;
        }

        // Out of reach: no hit this tick and the timer holds
        if planar_distance(u.position, target_pos) > weapon.stop_attack_range {
            return (Some(CombatState::Follow), None);
        }

        u.attack_timer -= dt;
        if u.attack_timer > ATTACK_TIMER_TOLERANCE {
            return (None, None);
        }
        u.attack_timer = (u.attack_timer + weapon.cooldown()).max(0.0);

        trace!("{:?} hits {:?} for {}", unit, target, weapon.damage);
        if apply_damage(registry, target, weapon.damage, presentation) != DamageOutcome::Killed {
            return (None, None);
        }
        if let Some(u) = registry.get_mut(unit) {
            u.target = None;
        }
        (Some(CombatState::Follow), Some(target))
    }
}
