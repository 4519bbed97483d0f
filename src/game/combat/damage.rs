use bevy::prelude::*;

use crate::game::simulation::{Presentation, UnitId, UnitRegistry};

/// What a single hit did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// The target was already gone; nothing happened
    Missing,
    Wounded { remaining: f32 },
    /// Health reached zero and the unit left the registry
    Killed,
}

/// Take `amount` off the target's health, removing it from the registry once depleted.
///
/// Other units that held the target keep a stale [`UnitId`]; it stops resolving
/// immediately, so their next evaluation sees no target.
pub fn apply_damage(
    registry: &mut UnitRegistry,
    target: UnitId,
    amount: f32,
    presentation: &mut dyn Presentation,
) -> DamageOutcome {
    let Some(unit) = registry.get_mut(target) else {
        trace!("Damage to {:?} ignored: unit is gone", target);
        return DamageOutcome::Missing;
    };

    unit.health.current -= amount;
    let health = unit.health;
    presentation.health_changed(target, health.current.max(0.0), health.max);

    if health.is_depleted() {
        registry.unregister(target);
        presentation.unit_removed(target);
        info!("{:?} destroyed", target);
        DamageOutcome::Killed
    } else {
        DamageOutcome::Wounded { remaining: health.current }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::simulation::{PresentationEvent, PresentationQueue, Team, UnitSpawn, UnitStats};

    #[test]
    fn test_damage_then_death() {
        let mut registry = UnitRegistry::new();
        let stats = UnitStats { max_health: 25.0, ..UnitStats::default() };
        let id = registry.register(UnitSpawn::new(Team::Enemy, Vec3::ZERO, stats));
        let mut queue = PresentationQueue::default();

        assert_eq!(apply_damage(&mut registry, id, 10.0, &mut queue), DamageOutcome::Wounded { remaining: 15.0 });
        assert_eq!(apply_damage(&mut registry, id, 10.0, &mut queue), DamageOutcome::Wounded { remaining: 5.0 });
        assert_eq!(apply_damage(&mut registry, id, 10.0, &mut queue), DamageOutcome::Killed);
        assert!(!registry.contains(id));

        // Health bar never shows negative values
        assert!(queue.events().contains(&PresentationEvent::HealthChanged { unit: id, current: 0.0, max: 25.0 }));
        assert_eq!(queue.events().last(), Some(&PresentationEvent::Removed { unit: id }));
    }

    #[test]
    fn test_damage_to_destroyed_unit_is_noop() {
        let mut registry = UnitRegistry::new();
        let id = registry.register(UnitSpawn::new(Team::Enemy, Vec3::ZERO, UnitStats::default()));
        registry.unregister(id);
        let mut queue = PresentationQueue::default();

        assert_eq!(apply_damage(&mut registry, id, 10.0, &mut queue), DamageOutcome::Missing);
        assert!(queue.is_empty());
    }
}
