use bevy::prelude::*;
use skirmish::game::combat::CombatState;
use skirmish::game::control::{
    box_select, classify_order, click_select, issue_order, units_in_screen_rect, IssuedOrder, OrderTarget,
};
use skirmish::game::math::ScreenRect;
use skirmish::game::simulation::{PathPlanner, PointerHit, SpatialQuery, Team, UnitStats};

mod common;
use common::{unarmed, Harness, TopDownQuery};

#[test]
fn test_box_select_then_move_order() {
    let mut h = Harness::new();
    let u1 = h.spawn(Team::Player, 0.0, 0.0, UnitStats::default());
    let u2 = h.spawn(Team::Player, 1.0, 0.0, UnitStats::default());
    let outside = h.spawn(Team::Player, 20.0, 20.0, UnitStats::default());

    let rect = ScreenRect::from_corners(Vec2::new(2.0, 1.0), Vec2::new(-1.0, -1.0));
    let ids = units_in_screen_rect(&TopDownQuery::new(h.sim.registry()), h.sim.registry(), rect);
    box_select(&mut h.sim, &ids, &mut h.queue);
    assert_eq!(h.sim.selection().ids(), &[u1, u2]);

    let destination = Vec3::new(5.0, 0.0, 5.0);
    let target = classify_order(&TopDownQuery::new(h.sim.registry()), destination.xz());
    assert_eq!(target, OrderTarget::Ground(destination));

    let order = issue_order(&mut h.sim, target, 1.0, &mut h.nav, &mut h.queue);
    assert_eq!(order, IssuedOrder::Move { units: 2 });
    assert_eq!(h.nav.destination(u1), Some(destination));
    assert_eq!(h.nav.destination(u2), Some(destination));
    assert_eq!(h.nav.destination(outside), None);
    assert!(h.sim.marker().is_some());

    h.run(0.1, 5);
    assert!(h.sim.unit(u1).unwrap().commanded);
    assert!(h.sim.unit(u2).unwrap().commanded);
    assert!(!h.sim.unit(outside).unwrap().commanded);

    h.run(0.1, 40);
    for id in [u1, u2] {
        let unit = h.sim.unit(id).unwrap();
        assert!(!unit.commanded, "{id:?} should have arrived");
        assert!(unit.position.distance(destination) < 0.01);
    }
    // The marker's one second ran out long ago
    assert!(h.sim.marker().is_none());
}

#[test]
fn test_move_order_suppresses_engagement_until_arrival() {
    let mut h = Harness::new();
    let guard = h.spawn(Team::Player, 0.0, 0.0, UnitStats::default());
    let enemy = h.spawn(Team::Enemy, 1.5, 0.0, unarmed());

    h.step(0.1);
    assert_eq!(h.sim.unit(guard).unwrap().target, Some(enemy));

    click_select(&mut h.sim, PointerHit::Unit(guard), false, &mut h.queue);
    let order = issue_order(&mut h.sim, OrderTarget::Ground(Vec3::new(0.0, 0.0, 1.0)), 1.0, &mut h.nav, &mut h.queue);
    assert_eq!(order, IssuedOrder::Move { units: 1 });

    let unit = h.sim.unit(guard).unwrap();
    assert_eq!(unit.target, None);
    assert_eq!(unit.state, CombatState::Idle);

    // The enemy stays inside acquisition range the whole way
    h.run(0.1, 2);
    let unit = h.sim.unit(guard).unwrap();
    assert!(unit.commanded);
    assert_eq!(unit.target, None);
    assert_eq!(unit.state, CombatState::Idle);

    h.run(0.1, 5);
    let unit = h.sim.unit(guard).unwrap();
    assert!(!unit.commanded);
    assert_eq!(unit.target, Some(enemy));
    assert_ne!(unit.state, CombatState::Idle);
}

#[test]
fn test_attack_order_on_enemy_under_cursor() {
    let mut h = Harness::new();
    let a = h.spawn(Team::Player, 0.0, 0.0, UnitStats::default());
    let b = h.spawn(Team::Player, 0.0, 2.0, unarmed());
    let far = h.spawn(Team::Enemy, 10.0, 0.0, unarmed());
    let near = h.spawn(Team::Enemy, 1.0, 1.0, unarmed());

    click_select(&mut h.sim, PointerHit::Unit(a), false, &mut h.queue);
    click_select(&mut h.sim, PointerHit::Unit(b), true, &mut h.queue);

    let target = classify_order(&TopDownQuery::new(h.sim.registry()), Vec2::new(10.2, 0.1));
    assert_eq!(target, OrderTarget::Enemy(far));

    // Only the armed unit takes the order
    let order = issue_order(&mut h.sim, target, 1.0, &mut h.nav, &mut h.queue);
    assert_eq!(order, IssuedOrder::Attack { units: 1 });
    assert_eq!(h.sim.unit(a).unwrap().target, Some(far));
    assert_eq!(h.sim.unit(b).unwrap().target, None);
    assert!(h.sim.marker().is_none());

    // A closer enemy does not steal an ordered target
    h.run(0.1, 3);
    assert_eq!(h.sim.unit(a).unwrap().target, Some(far));
    assert!(h.sim.unit(near).is_some());
    assert_eq!(h.sim.unit(a).unwrap().state, CombatState::Follow);
    assert!(h.nav.status(a).has_path);
}

#[test]
fn test_picking_respects_layers() {
    let mut h = Harness::new();
    let friend = h.spawn(Team::Player, 0.0, 0.0, UnitStats::default());

    // A friendly unit under the cursor is not an order target; the ground behind it is
    let query = TopDownQuery::new(h.sim.registry());
    assert_eq!(classify_order(&query, Vec2::ZERO), OrderTarget::Ground(Vec3::ZERO));
    assert_eq!(
        query.hit_test(Vec2::ZERO, skirmish::game::simulation::layers::SELECTABLE),
        PointerHit::Unit(friend)
    );
}
