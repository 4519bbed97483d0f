//! Straight-line stand-in for a navigation agent.
//!
//! Real path planning is the host's business. This navigator gives the
//! simulation something with the same observable contract: a request is
//! pending until the next [`DirectNavigator::advance`], then the unit walks
//! straight at its move speed and halts at the requested stopping distance.

use bevy::prelude::*;
use rustc_hash::FxHashMap;

use crate::game::math::yaw_towards;
use super::host::{PathPlanner, PathStatus};
use super::registry::{UnitId, UnitRegistry};

/// Slack for float error when deciding a unit has reached its stopping distance.
const ARRIVAL_TOLERANCE: f32 = 1e-3;

#[derive(Debug, Clone, Copy)]
struct Agent {
    destination: Vec3,
    stopping_distance: f32,
    pending: bool,
    has_path: bool,
    remaining_distance: f32,
}

impl Agent {
    fn status(&self) -> PathStatus {
        PathStatus {
            pending: self.pending,
            has_path: self.has_path,
            remaining_distance: self.remaining_distance,
            stopping_distance: self.stopping_distance,
        }
    }
}

#[derive(Resource, Default)]
pub struct DirectNavigator {
    agents: FxHashMap<UnitId, Agent>,
}

impl DirectNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destination of the unit's active request, if it has one.
    pub fn destination(&self, unit: UnitId) -> Option<Vec3> {
        self.agents
            .get(&unit)
            .filter(|agent| agent.pending || agent.has_path)
            .map(|agent| agent.destination)
    }

    /// Resolve pending requests and move every agent one step.
    pub fn advance(&mut self, registry: &mut UnitRegistry, dt: f32) {
        self.agents.retain(|id, _| registry.contains(*id));

        for (id, agent) in self.agents.iter_mut() {
            let Some(unit) = registry.get_mut(*id) else { continue };

            if agent.pending {
                agent.pending = false;
                agent.has_path = true;
            }
            if !agent.has_path {
                continue;
            }

            let to_goal = Vec3::new(agent.destination.x - unit.position.x, 0.0, agent.destination.z - unit.position.z);
            let distance = to_goal.length();
            if distance <= agent.stopping_distance + ARRIVAL_TOLERANCE {
                agent.has_path = false;
                agent.remaining_distance = distance;
                continue;
            }

            let travel = (distance - agent.stopping_distance).min(unit.move_speed * dt).max(0.0);
            unit.position += to_goal / distance * travel;
            if let Some(yaw) = yaw_towards(Vec3::ZERO, to_goal) {
                unit.yaw = yaw;
            }

            agent.remaining_distance = distance - travel;
            if agent.remaining_distance <= agent.stopping_distance + ARRIVAL_TOLERANCE {
                agent.has_path = false;
            }
        }
    }
}

impl PathPlanner for DirectNavigator {
    fn set_destination(&mut self, unit: UnitId, destination: Vec3, stopping_distance: f32) {
        let remaining_distance = self
            .agents
            .get(&unit)
            .map_or(f32::INFINITY, |agent| agent.remaining_distance);
        self.agents.insert(unit, Agent {
            destination: Vec3::new(destination.x, 0.0, destination.z),
            stopping_distance: stopping_distance.max(0.0),
            pending: true,
            has_path: false,
            remaining_distance,
        });
    }

    fn stop(&mut self, unit: UnitId) {
        if let Some(agent) = self.agents.get_mut(&unit) {
            agent.pending = false;
            agent.has_path = false;
            agent.remaining_distance = 0.0;
        }
    }

    fn status(&self, unit: UnitId) -> PathStatus {
        self.agents.get(&unit).map(Agent::status).unwrap_or_default()
    }

    fn forget(&mut self, unit: UnitId) {
        self.agents.remove(&unit);
    }
}
