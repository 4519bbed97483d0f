//! Pointer actions to selection changes and unit orders.
//!
//! Everything here works on [`Simulation`] plus a [`SpatialQuery`], so the
//! same code runs under the Bevy input system and in headless tests.

use bevy::prelude::*;

use crate::game::math::ScreenRect;
use crate::game::simulation::{
    layers, PathPlanner, PointerHit, Presentation, Simulation, SpatialQuery, UnitId, UnitRegistry,
};

/// What a right click (or a command-mode left click) points at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderTarget {
    Enemy(UnitId),
    Ground(Vec3),
    None,
}

/// Which order, if any, came out of [`issue_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssuedOrder {
    Move { units: usize },
    Attack { units: usize },
    Nothing,
}

/// Classify the pointer for an order. An attackable unit wins over the ground behind it.
pub fn classify_order(query: &dyn SpatialQuery, cursor: Vec2) -> OrderTarget {
    match query.hit_test(cursor, layers::ATTACKABLE | layers::GROUND) {
        PointerHit::Unit(id) => OrderTarget::Enemy(id),
        PointerHit::Ground(point) => OrderTarget::Ground(point),
        PointerHit::Nothing => OrderTarget::None,
    }
}

/// Ground point under the cursor, ignoring units. Used for forced moves.
pub fn ground_under(query: &dyn SpatialQuery, cursor: Vec2) -> Option<Vec3> {
    match query.hit_test(cursor, layers::GROUND) {
        PointerHit::Ground(point) => Some(point),
        _ => None,
    }
}

/// Turn a classified target into a move or attack order for the current selection.
pub fn issue_order(
    sim: &mut Simulation,
    target: OrderTarget,
    marker_duration: f32,
    planner: &mut dyn PathPlanner,
    presentation: &mut dyn Presentation,
) -> IssuedOrder {
    match target {
        OrderTarget::Ground(point) => {
            if sim.selection().is_empty() {
                return IssuedOrder::Nothing;
            }
            match sim.order_move(point, marker_duration, planner, presentation) {
                0 => IssuedOrder::Nothing,
                units => IssuedOrder::Move { units },
            }
        }
        OrderTarget::Enemy(enemy) => match sim.order_attack(enemy) {
            0 => IssuedOrder::Nothing,
            units => IssuedOrder::Attack { units },
        },
        OrderTarget::None => IssuedOrder::Nothing,
    }
}

/// Apply a left click. `modifier` is the additive-selection key.
pub fn click_select(sim: &mut Simulation, hit: PointerHit, modifier: bool, presentation: &mut dyn Presentation) {
    match (hit, modifier) {
        (PointerHit::Unit(id), false) => {
            sim.select_single(id, presentation);
        }
        (PointerHit::Unit(id), true) => {
            sim.toggle_selection(id, presentation);
        }
        (_, false) => sim.deselect_all(presentation),
        (_, true) => {}
    }
}

/// Selectable units whose screen projection falls inside `rect`, in registry order.
pub fn units_in_screen_rect(query: &dyn SpatialQuery, registry: &UnitRegistry, rect: ScreenRect) -> Vec<UnitId> {
    registry
        .all_units()
        .filter(|unit| unit.is_selectable())
        .filter(|unit| query.world_to_screen(unit.position).is_some_and(|screen| rect.contains(screen)))
        .map(|unit| unit.id)
        .collect()
}

/// Replace the selection with the drag-box contents.
pub fn box_select(sim: &mut Simulation, ids: &[UnitId], presentation: &mut dyn Presentation) {
    sim.deselect_all(presentation);
    for id in ids {
        sim.add_to_selection(*id, presentation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::simulation::{DirectNavigator, PresentationQueue, Team, UnitSpawn, UnitStats};

    /// Screen = world XZ; units are hit within half a unit of the cursor.
    struct TopDown<'a> {
        registry: &'a UnitRegistry,
    }

    impl SpatialQuery for TopDown<'_> {
        fn hit_test(&self, screen: Vec2, mask: u32) -> PointerHit {
            let point = Vec3::new(screen.x, 0.0, screen.y);
            let unit = self.registry.all_units().find(|unit| {
                let layer = if unit.team == Team::Player { layers::SELECTABLE } else { layers::ATTACKABLE };
                mask & layer != 0 && unit.position.distance(point) < 0.5
            });
            match unit {
                Some(unit) => PointerHit::Unit(unit.id),
                None if mask & layers::GROUND != 0 => PointerHit::Ground(point),
                None => PointerHit::Nothing,
            }
        }

        fn world_to_screen(&self, world: Vec3) -> Option<Vec2> {
            Some(world.xz())
        }
    }

    fn spawn(sim: &mut Simulation, queue: &mut PresentationQueue, team: Team, x: f32, z: f32) -> UnitId {
        sim.spawn(UnitSpawn::new(team, Vec3::new(x, 0.0, z), UnitStats::default()), queue)
    }

    #[test]
    fn test_enemy_under_cursor_wins_over_ground() {
        let mut sim = Simulation::default();
        let mut queue = PresentationQueue::default();
        let enemy = spawn(&mut sim, &mut queue, Team::Enemy, 3.0, 3.0);
        let query = TopDown { registry: sim.registry() };

        assert_eq!(classify_order(&query, Vec2::new(3.1, 3.0)), OrderTarget::Enemy(enemy));
        assert_eq!(classify_order(&query, Vec2::new(8.0, 0.0)), OrderTarget::Ground(Vec3::new(8.0, 0.0, 0.0)));
    }

    #[test]
    fn test_order_without_selection_does_nothing() {
        let mut sim = Simulation::default();
        let mut nav = DirectNavigator::new();
        let mut queue = PresentationQueue::default();
        spawn(&mut sim, &mut queue, Team::Player, 0.0, 0.0);

        let order = issue_order(&mut sim, OrderTarget::Ground(Vec3::X), 1.0, &mut nav, &mut queue);
        assert_eq!(order, IssuedOrder::Nothing);
        assert!(sim.marker().is_none());
        assert_eq!(issue_order(&mut sim, OrderTarget::None, 1.0, &mut nav, &mut queue), IssuedOrder::Nothing);
    }

    #[test]
    fn test_click_rules() {
        let mut sim = Simulation::default();
        let mut queue = PresentationQueue::default();
        let a = spawn(&mut sim, &mut queue, Team::Player, 0.0, 0.0);
        let b = spawn(&mut sim, &mut queue, Team::Player, 2.0, 0.0);

        click_select(&mut sim, PointerHit::Unit(a), false, &mut queue);
        click_select(&mut sim, PointerHit::Unit(b), true, &mut queue);
        assert_eq!(sim.selection().ids(), &[a, b]);

        // Modifier-click on empty ground keeps the selection
        click_select(&mut sim, PointerHit::Ground(Vec3::ZERO), true, &mut queue);
        assert_eq!(sim.selection().len(), 2);

        click_select(&mut sim, PointerHit::Nothing, false, &mut queue);
        assert!(sim.selection().is_empty());
    }

    #[test]
    fn test_box_select_keeps_only_friendly_units_inside() {
        let mut sim = Simulation::default();
        let mut queue = PresentationQueue::default();
        let inside = spawn(&mut sim, &mut queue, Team::Player, 1.0, 1.0);
        spawn(&mut sim, &mut queue, Team::Player, 9.0, 9.0);
        spawn(&mut sim, &mut queue, Team::Enemy, 2.0, 2.0);
        let edge = spawn(&mut sim, &mut queue, Team::Player, 4.0, 0.0);

        let query = TopDown { registry: sim.registry() };
        let rect = ScreenRect::from_corners(Vec2::new(4.0, 4.0), Vec2::new(0.0, 0.0));
        let ids = units_in_screen_rect(&query, sim.registry(), rect);
        assert_eq!(ids, vec![inside, edge]);

        box_select(&mut sim, &ids, &mut queue);
        assert_eq!(sim.selection().ids(), &[inside, edge]);
    }
}
