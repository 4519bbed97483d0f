use bevy::prelude::*;
use skirmish::game::combat::CombatState;
use skirmish::game::simulation::{PresentationEvent, Team, UnitStats, Weapon};

mod common;
use common::{unarmed, Harness};

fn transitions(h: &mut Harness) -> Vec<(CombatState, CombatState)> {
    h.queue
        .drain()
        .filter_map(|event| match event {
            PresentationEvent::StateChanged { from, to, .. } => Some((from, to)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_acquire_follow_attack_cadence() {
    let mut h = Harness::new();
    let b = h.spawn(Team::Player, 0.0, 0.0, UnitStats { move_speed: 0.0, ..UnitStats::default() });
    let a = h.spawn(Team::Enemy, 10.0, 0.0, unarmed());

    // A walks into B's acquisition radius
    h.sim.registry_mut().get_mut(a).unwrap().position.x = 1.8;
    h.step(0.1);
    assert_eq!(h.sim.unit(b).unwrap().target, Some(a));
    assert_eq!(h.sim.unit(b).unwrap().state, CombatState::Follow);

    // A steps within attack range
    h.sim.registry_mut().get_mut(a).unwrap().position.x = 0.9;
    h.step(0.1);
    assert_eq!(h.sim.unit(b).unwrap().state, CombatState::Attack);
    h.queue.clear();

    // First hit lands on the first attacking tick, then every half second
    h.run(0.1, 20);
    let health = h.sim.unit(a).unwrap().health.current;
    assert_eq!(health, 50.0, "Expected 5 hits of 10 damage");

    let hits = h
        .queue
        .events()
        .iter()
        .filter(|event| matches!(event, PresentationEvent::HealthChanged { unit, .. } if *unit == a))
        .count();
    assert_eq!(hits, 5);
}

#[test]
fn test_transitions_only_between_neighbours() {
    let mut h = Harness::new();
    let b = h.spawn(Team::Player, 0.0, 0.0, UnitStats::default());
    let a = h.spawn(Team::Enemy, 1.5, 0.0, unarmed());

    h.run(0.1, 4);
    // Target runs past the stop-attack range, then out of sight
    h.sim.registry_mut().get_mut(a).unwrap().position.x = 1.9;
    h.step(0.1);
    h.sim.registry_mut().get_mut(a).unwrap().position.x = 30.0;
    h.run(0.1, 3);

    let seen = transitions(&mut h);
    assert!(!seen.is_empty());
    for (from, to) in &seen {
        assert!(from.can_transition_to(*to), "Illegal transition {from} -> {to}");
        assert_ne!((*from, *to), (CombatState::Idle, CombatState::Attack));
    }
    assert_eq!(h.sim.unit(b).unwrap().state, CombatState::Idle);
    assert_eq!(h.sim.unit(b).unwrap().target, None);
}

#[test]
fn test_kill_removes_unit_for_good() {
    let mut h = Harness::new();
    let heavy = Weapon { damage: 60.0, ..Weapon::default() };
    let b = h.spawn(Team::Player, 0.0, 0.0, UnitStats { weapon: Some(heavy), ..UnitStats::default() });
    let a = h.spawn(Team::Enemy, 0.5, 0.0, unarmed());

    h.run(0.1, 12);
    assert!(h.sim.unit(a).is_none());
    assert!(!h.sim.registry().contains(a));
    assert!(h.sim.registry().all_units().all(|unit| unit.id != a));
    assert_eq!(h.sim.unit(b).unwrap().target, None);

    // A later unit never inherits the dead unit's identity
    let c = h.spawn(Team::Enemy, 40.0, 0.0, unarmed());
    assert_ne!(a, c);
    assert!(h.sim.unit(a).is_none());

    let removed = h
        .queue
        .events()
        .iter()
        .filter(|event| **event == PresentationEvent::Removed { unit: a })
        .count();
    assert_eq!(removed, 1);
}

#[test]
fn test_two_units_fight_to_the_death() {
    let mut h = Harness::new();
    let player = h.spawn(Team::Player, 0.0, 0.0, UnitStats::default());
    let enemy = h.spawn(Team::Enemy, 1.5, 0.0, UnitStats::default());

    h.run(0.1, 80);

    // The player is evaluated first each tick, so it lands the killing blow
    assert!(h.sim.unit(enemy).is_none());
    let survivor = h.sim.unit(player).unwrap();
    assert_eq!(survivor.health.current, 10.0);
    assert_eq!(survivor.target, None);
    assert_eq!(survivor.state, CombatState::Idle);
}

#[test]
fn test_health_never_revives() {
    let mut h = Harness::new();
    let a = h.spawn(Team::Enemy, 0.0, 0.0, UnitStats { max_health: 30.0, ..unarmed() });

    let mut last = 30.0;
    for _ in 0..5 {
        h.sim.apply_damage(a, 10.0, &mut h.nav, &mut h.queue);
        if let Some(unit) = h.sim.unit(a) {
            assert!(unit.health.current < last);
            assert!(unit.health.current > 0.0);
            last = unit.health.current;
        }
    }
    assert!(h.sim.unit(a).is_none());
}
