//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use bevy::prelude::*;
use skirmish::game::control::unit_layer;
use skirmish::game::simulation::{
    layers, DirectNavigator, PointerHit, PresentationQueue, Simulation, SpatialQuery, Team, UnitId, UnitRegistry,
    UnitSpawn, UnitStats,
};

/// Orthographic top-down view: screen (x, y) is world (x, z), units are hit within `radius`.
pub struct TopDownQuery<'a> {
    pub registry: &'a UnitRegistry,
    pub radius: f32,
}

impl<'a> TopDownQuery<'a> {
    pub fn new(registry: &'a UnitRegistry) -> Self {
        Self { registry, radius: 0.5 }
    }
}

impl SpatialQuery for TopDownQuery<'_> {
    fn hit_test(&self, screen: Vec2, mask: u32) -> PointerHit {
        let point = Vec3::new(screen.x, 0.0, screen.y);
        let unit = self
            .registry
            .all_units()
            .filter(|unit| mask & unit_layer(unit) != 0)
            .find(|unit| unit.position.distance(point) < self.radius);
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

/// A simulation with its host collaborators, stepped the way the Bevy schedule does.
#[derive(Default)]
pub struct Harness {
    pub sim: Simulation,
    pub nav: DirectNavigator,
    pub queue: PresentationQueue,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, team: Team, x: f32, z: f32, stats: UnitStats) -> UnitId {
        self.sim.spawn(UnitSpawn::new(team, Vec3::new(x, 0.0, z), stats), &mut self.queue)
    }

    /// Simulation tick followed by navigation, as in one frame.
    pub fn step(&mut self, dt: f32) {
        self.sim.tick(dt, &mut self.nav, &mut self.queue);
        self.nav.advance(self.sim.registry_mut(), dt);
    }

    pub fn run(&mut self, dt: f32, steps: usize) {
        for _ in 0..steps {
            self.step(dt);
        }
    }
}

pub fn unarmed() -> UnitStats {
    UnitStats { weapon: None, ..UnitStats::default() }
}
