/// Resource definitions for the simulation host.

use bevy::prelude::*;

use crate::game::combat::CombatState;
use super::components::Team;
use super::host::{Presentation, PresentationEvent};
use super::registry::UnitId;

// ============================================================================
// Tick Counter
// ============================================================================

/// Number of simulation ticks run so far.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimTick(pub u64);

impl SimTick {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

// ============================================================================
// Presentation Buffer
// ============================================================================

/// Buffers presentation notifications until the visual systems drain them.
///
/// Anything left over at the end of a frame is dropped (see `SimulationPlugin`),
/// so a headless app never accumulates events.
#[derive(Resource, Default, Debug)]
pub struct PresentationQueue {
    events: Vec<PresentationEvent>,
}

impl PresentationQueue {
    pub fn drain(&mut self) -> std::vec::Drain<'_, PresentationEvent> {
        self.events.drain(..)
    }

    pub fn events(&self) -> &[PresentationEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Presentation for PresentationQueue {
    fn unit_spawned(&mut self, unit: UnitId, team: Team, position: Vec3) {
        self.events.push(PresentationEvent::Spawned { unit, team, position });
    }

    fn selection_changed(&mut self, unit: UnitId, selected: bool) {
        self.events.push(PresentationEvent::SelectionChanged { unit, selected });
    }

    fn health_changed(&mut self, unit: UnitId, current: f32, max: f32) {
        self.events.push(PresentationEvent::HealthChanged { unit, current, max });
    }

    fn state_changed(&mut self, unit: UnitId, from: CombatState, to: CombatState) {
        self.events.push(PresentationEvent::StateChanged { unit, from, to });
    }

    fn unit_removed(&mut self, unit: UnitId) {
        self.events.push(PresentationEvent::Removed { unit });
    }

    fn marker_placed(&mut self, position: Vec3, duration: f32) {
        self.events.push(PresentationEvent::MarkerPlaced { position, duration });
    }

    fn marker_cleared(&mut self) {
        self.events.push(PresentationEvent::MarkerCleared);
    }
}

// ============================================================================
// Performance
// ============================================================================

/// Wall-clock cost of the most recent simulation tick.
#[derive(Resource, Default, Debug)]
pub struct SimPerformance {
    pub last_duration: std::time::Duration,
}
