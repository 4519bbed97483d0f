//! The simulation context: one explicitly constructed owner for all gameplay state.
//!
//! Bevy holds a [`Simulation`] as a resource, but nothing in here knows about
//! the ECS. Collaborators (path planner, presentation) are passed into every
//! call that needs them, so tests drive the same code with plain structs.

use bevy::prelude::*;

use crate::game::combat::{self, CombatMachine, DamageOutcome};
use crate::game::control::SelectionSet;
use super::components::{Unit, UnitSpawn};
use super::host::{PathPlanner, Presentation};
use super::proximity::{ProximityEvent, ProximitySensor};
use super::registry::{UnitId, UnitRegistry};

/// Move-order destination shown on the ground. Purely visual.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundMarker {
    pub position: Vec3,
    /// Seconds left before the marker disappears
    pub ttl: f32,
}

#[derive(Resource, Default)]
pub struct Simulation {
    registry: UnitRegistry,
    selection: SelectionSet,
    proximity: ProximitySensor,
    machine: CombatMachine,
    marker: Option<GroundMarker>,
    tick: u64,
}

impl Simulation {
    pub fn new(machine: CombatMachine) -> Self {
        Self {
            machine,
            ..default()
        }
    }

    pub fn registry(&self) -> &UnitRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut UnitRegistry {
        &mut self.registry
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn machine(&self) -> &CombatMachine {
        &self.machine
    }

    pub fn set_machine(&mut self, machine: CombatMachine) {
        self.machine = machine;
    }

    pub fn proximity(&self) -> &ProximitySensor {
        &self.proximity
    }

    pub fn marker(&self) -> Option<&GroundMarker> {
        self.marker.as_ref()
    }

    /// Ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.registry.get(id)
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    pub fn spawn(&mut self, spawn: UnitSpawn, presentation: &mut dyn Presentation) -> UnitId {
        let id = self.registry.register(spawn);
        if let Some(unit) = self.registry.get(id) {
            presentation.unit_spawned(id, unit.team, unit.position);
            presentation.health_changed(id, unit.health.current, unit.health.max);
        }
        debug!("Spawned {:?} for {:?} at {:?}", id, spawn.team, spawn.position);
        id
    }

    /// Damage a unit and clean up after it if the hit was lethal.
    pub fn apply_damage(
        &mut self,
        target: UnitId,
        amount: f32,
        planner: &mut dyn PathPlanner,
        presentation: &mut dyn Presentation,
    ) -> DamageOutcome {
        let outcome = combat::apply_damage(&mut self.registry, target, amount, presentation);
        if outcome == DamageOutcome::Killed {
            self.forget_unit(target, planner);
        }
        outcome
    }

    /// Remove a unit outright, as if it had died.
    pub fn remove_unit(
        &mut self,
        id: UnitId,
        planner: &mut dyn PathPlanner,
        presentation: &mut dyn Presentation,
    ) -> Option<Unit> {
        let unit = self.registry.unregister(id)?;
        presentation.unit_removed(id);
        self.forget_unit(id, planner);
        Some(unit)
    }

    fn forget_unit(&mut self, id: UnitId, planner: &mut dyn PathPlanner) {
        self.selection.forget(id);
        self.proximity.forget(id);
        planner.forget(id);
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    pub fn select_single(&mut self, id: UnitId, presentation: &mut dyn Presentation) -> bool {
        self.selection.select_single(&mut self.registry, id, presentation)
    }

    pub fn toggle_selection(&mut self, id: UnitId, presentation: &mut dyn Presentation) -> bool {
        self.selection.toggle(&mut self.registry, id, presentation)
    }

    pub fn add_to_selection(&mut self, id: UnitId, presentation: &mut dyn Presentation) -> bool {
        self.selection.add(&mut self.registry, id, presentation)
    }

    /// Empty the selection and take down the move marker with it.
    pub fn deselect_all(&mut self, presentation: &mut dyn Presentation) {
        self.selection.deselect_all(&mut self.registry, presentation);
        self.clear_marker(presentation);
    }

    // ------------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------------

    /// Send every selected unit that takes orders to `destination`.
    ///
    /// Each unit drops its engagement, goes straight to Idle and stays
    /// `commanded` until the planner reports arrival. Returns how many units moved.
    pub fn order_move(
        &mut self,
        destination: Vec3,
        marker_duration: f32,
        planner: &mut dyn PathPlanner,
        presentation: &mut dyn Presentation,
    ) -> usize {
        self.selection.prune(&self.registry);
        let mut moved = 0;
        for id in self.selection.ids().to_vec() {
            if !self.registry.get(id).is_some_and(|u| u.accepts_orders) {
                continue;
            }
            self.machine.force_idle(&mut self.registry, id, planner, presentation);
            if let Some(unit) = self.registry.get_mut(id) {
                unit.commanded = true;
                unit.target_ordered = false;
            }
            planner.set_destination(id, destination, 0.0);
            moved += 1;
        }

        if moved > 0 {
            self.place_marker(destination, marker_duration, presentation);
            debug!("Move order: {} unit(s) to {:?}", moved, destination);
        }
        moved
    }

    /// Point every combat-capable selected unit at `enemy`. Returns how many units took the order.
    pub fn order_attack(&mut self, enemy: UnitId) -> usize {
        self.selection.prune(&self.registry);
        let Some(enemy_team) = self.registry.get(enemy).map(|u| u.team) else { return 0 };
        if !self.selection.has_combat_capable(&self.registry) {
            return 0;
        }

        let mut engaged = 0;
        for id in self.selection.ids().to_vec() {
            let Some(unit) = self.registry.get_mut(id) else { continue };
            if !unit.is_combat_capable() || !unit.team.is_opposing(enemy_team) {
                continue;
            }
            unit.target = Some(enemy);
            unit.target_ordered = true;
            unit.commanded = false;
            engaged += 1;
        }

        if engaged > 0 {
            debug!("Attack order: {} unit(s) on {:?}", engaged, enemy);
        }
        engaged
    }

    pub fn place_marker(&mut self, position: Vec3, duration: f32, presentation: &mut dyn Presentation) {
        self.marker = Some(GroundMarker { position, ttl: duration });
        presentation.marker_placed(position, duration);
    }

    pub fn clear_marker(&mut self, presentation: &mut dyn Presentation) {
        if self.marker.take().is_some() {
            presentation.marker_cleared();
        }
    }

    // ------------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------------

    /// Advance gameplay by `dt` seconds.
    ///
    /// Order: arrivals, target acquisition, one state machine step per unit,
    /// marker expiry, selection pruning. Movement itself is the planner's job
    /// and happens after this returns.
    pub fn tick(&mut self, dt: f32, planner: &mut dyn PathPlanner, presentation: &mut dyn Presentation) {
        self.tick += 1;
        let ids = self.registry.ids();

        for id in &ids {
            let Some(unit) = self.registry.get_mut(*id) else { continue };
            if unit.commanded && planner.status(*id).arrived() {
                unit.commanded = false;
                debug!("{:?} arrived", id);
            }
        }

        self.acquire_targets(&ids);

        for id in &ids {
            if let Some(killed) = self.machine.tick(&mut self.registry, *id, dt, planner, presentation) {
                self.forget_unit(killed, planner);
            }
        }

        if let Some(marker) = self.marker.as_mut() {
            marker.ttl -= dt;
            if marker.ttl <= 0.0 {
                self.clear_marker(presentation);
            }
        }

        self.selection.prune(&self.registry);
    }

    fn acquire_targets(&mut self, ids: &[UnitId]) {
        for event in self.proximity.sense(&self.registry) {
            match event {
                ProximityEvent::Entered { observer, other } => {
                    self.try_acquire(observer, other);
                }
                ProximityEvent::Exited { observer, other } => {
                    let Some(unit) = self.registry.get_mut(observer) else { continue };
                    if unit.target == Some(other) && !unit.target_ordered {
                        trace!("{:?} lost {:?}", observer, other);
                        unit.target = None;
                    }
                }
            }
        }

        // Units still in contact re-engage once their target is gone
        for id in ids {
            let Some(contact) = self
                .proximity
                .contacts(*id)
                .iter()
                .copied()
                .find(|other| self.registry.contains(*other))
            else {
                continue;
            };
            self.try_acquire(*id, contact);
        }
    }

    fn try_acquire(&mut self, observer: UnitId, other: UnitId) -> bool {
        let has_live_target = self
            .registry
            .get(observer)
            .and_then(|u| u.target)
            .is_some_and(|target| self.registry.contains(target));
        let Some(other_team) = self.registry.get(other).map(|u| u.team) else { return false };
        let Some(unit) = self.registry.get_mut(observer) else { return false };

        if has_live_target || unit.commanded || !unit.is_combat_capable() || !unit.team.is_opposing(other_team) {
            return false;
        }
        unit.target = Some(other);
        unit.target_ordered = false;
        debug!("{:?} acquired {:?}", observer, other);
        true
    }
}
