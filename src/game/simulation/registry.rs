//! Unit registry: a generational arena of live units.
//!
//! Slots are reused after a unit is removed, but every reuse bumps the slot
//! generation, so a [`UnitId`] held past its unit's death resolves to `None`
//! instead of to whatever unit took the slot next.

use std::fmt;

use bevy::prelude::*;

use super::components::{Unit, UnitSpawn};

/// Generation-checked handle to a unit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId {
    index: u32,
    generation: u32,
}

impl UnitId {
    pub fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unit#{}v{}", self.index, self.generation)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

struct Slot {
    generation: u32,
    unit: Option<Unit>,
}

/// Process-wide set of live units, owned by [`Simulation`](super::Simulation).
#[derive(Default)]
pub struct UnitRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Live ids in registration order
    order: Vec<UnitId>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new unit at full health and hand back its id.
    pub fn register(&mut self, spawn: UnitSpawn) -> UnitId {
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation = slot.generation.wrapping_add(1);
                UnitId { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, unit: None });
                UnitId { index, generation: 0 }
            }
        };

        self.slots[id.index as usize].unit = Some(Unit::spawn(id, spawn));
        self.order.push(id);
        trace!("Registered {:?} ({:?})", id, spawn.team);
        id
    }

    /// Remove a unit. Absent or stale ids are ignored.
    pub fn unregister(&mut self, id: UnitId) -> Option<Unit> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let unit = slot.unit.take()?;
        self.free.push(id.index);
        self.order.retain(|live| *live != id);
        trace!("Unregistered {:?}", id);
        Some(unit)
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.unit.as_ref()
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.unit.as_mut()
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Lazy walk over live units in registration order.
    ///
    /// The iterator is `Clone`, so a caller can restart it from the beginning.
    pub fn all_units(&self) -> AllUnits<'_> {
        AllUnits { registry: self, cursor: 0 }
    }

    /// Snapshot of live ids, for loops that mutate the registry while walking it.
    pub fn ids(&self) -> Vec<UnitId> {
        self.order.clone()
    }
}

/// Iterator returned by [`UnitRegistry::all_units`].
#[derive(Clone)]
pub struct AllUnits<'a> {
    registry: &'a UnitRegistry,
    cursor: usize,
}

impl<'a> Iterator for AllUnits<'a> {
    type Item = &'a Unit;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.registry.order.get(self.cursor) {
            self.cursor += 1;
            if let Some(unit) = self.registry.get(*id) {
                return Some(unit);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.registry.order.len().saturating_sub(self.cursor)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::simulation::components::{Team, UnitStats};

    fn spawn_at(x: f32) -> UnitSpawn {
        UnitSpawn::new(Team::Player, Vec3::new(x, 0.0, 0.0), UnitStats::default())
    }

    #[test]
    fn test_register_starts_at_full_health() {
        let mut registry = UnitRegistry::new();
        let id = registry.register(spawn_at(1.0));
        let unit = registry.get(id).unwrap();
        assert_eq!(unit.id, id);
        assert_eq!(unit.health.current, unit.health.max);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let mut registry = UnitRegistry::new();
        let id = registry.register(spawn_at(0.0));
        assert!(registry.unregister(id).is_some());
        assert!(registry.unregister(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_stale_id_does_not_resolve_to_reused_slot() {
        let mut registry = UnitRegistry::new();
        let old = registry.register(spawn_at(0.0));
        registry.unregister(old);
        let new = registry.register(spawn_at(5.0));

        assert_eq!(old.index(), new.index(), "Slot should be reused");
        assert_ne!(old, new);
        assert!(registry.get(old).is_none());
        assert!(registry.unregister(old).is_none());
        assert!(registry.contains(new));
    }

    #[test]
    fn test_all_units_keeps_registration_order_and_restarts() {
        let mut registry = UnitRegistry::new();
        let a = registry.register(spawn_at(0.0));
        let b = registry.register(spawn_at(1.0));
        let c = registry.register(spawn_at(2.0));
        registry.unregister(b);

        let walk = registry.all_units();
        let first: Vec<UnitId> = walk.clone().map(|u| u.id).collect();
        let second: Vec<UnitId> = walk.map(|u| u.id).collect();
        assert_eq!(first, vec![a, c]);
        assert_eq!(first, second);
    }
}
