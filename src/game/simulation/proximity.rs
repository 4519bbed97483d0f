//! Distance-based proximity sensor.
//!
//! Every combat-capable unit carries an acquisition radius. Each tick the
//! sensor compares the opposing units inside that radius against the previous
//! tick's contacts and reports who entered and who left.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::game::math::planar_distance;
use super::registry::{UnitId, UnitRegistry};

type Contacts = SmallVec<[UnitId; 8]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityEvent {
    Entered { observer: UnitId, other: UnitId },
    Exited { observer: UnitId, other: UnitId },
}

#[derive(Default)]
pub struct ProximitySensor {
    contacts: FxHashMap<UnitId, Contacts>,
}

impl ProximitySensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute contacts and report boundary crossings, in registry order.
    pub fn sense(&mut self, registry: &UnitRegistry) -> Vec<ProximityEvent> {
        let mut events = Vec::new();
        self.contacts.retain(|observer, _| registry.contains(*observer));

        for observer in registry.all_units() {
            let Some(weapon) = observer.weapon else { continue };
            let previous = self.contacts.remove(&observer.id).unwrap_or_default();

            let current: Contacts = registry
                .all_units()
                .filter(|other| other.id != observer.id && observer.team.is_opposing(other.team))
                .filter(|other| planar_distance(observer.position, other.position) <= weapon.acquisition_range)
                .map(|other| other.id)
                .collect();

            for other in current.iter().filter(|id| !previous.contains(*id)) {
                events.push(ProximityEvent::Entered { observer: observer.id, other: *other });
            }
            for other in previous.iter().filter(|id| !current.contains(*id)) {
                events.push(ProximityEvent::Exited { observer: observer.id, other: *other });
            }

            if !current.is_empty() {
                self.contacts.insert(observer.id, current);
            }
        }

        events
    }

    /// Opposing units currently inside `observer`'s acquisition radius.
    pub fn contacts(&self, observer: UnitId) -> &[UnitId] {
        self.contacts.get(&observer).map(|contacts| contacts.as_slice()).unwrap_or(&[])
    }

    /// Drop a removed unit both as observer and as contact.
    pub fn forget(&mut self, unit: UnitId) {
        self.contacts.remove(&unit);
        for contacts in self.contacts.values_mut() {
            contacts.retain(|id| *id != unit);
        }
    }
}
