/// Bevy systems that host the simulation.
///
/// This module contains systems for:
/// - Tick counting and status logging
/// - Spawn/despawn command processing
/// - Running one simulation tick per frame
/// - Advancing the straight-line navigator

use std::time::Instant;

use bevy::prelude::*;

use crate::game::combat::CombatMachine;
use crate::game::config::InitialConfig;

use super::components::UnitSpawn;
use super::context::Simulation;
use super::events::*;
use super::navigation::DirectNavigator;
use super::resources::*;

// ============================================================================
// Tick Management
// ============================================================================

/// Increment the global simulation tick counter.
///
/// Runs ahead of everything in `SimSet::Input` so that conditional logging
/// sees the tick the frame belongs to.
pub fn increment_sim_tick(mut tick: ResMut<SimTick>) {
    tick.increment();
}

// ============================================================================
// Configuration
// ============================================================================

/// Apply combat tuning from InitialConfig at startup
pub fn configure_simulation(mut sim: ResMut<Simulation>, initial_config: Option<Res<InitialConfig>>) {
    let config = match initial_config {
        Some(cfg) => cfg.clone(),
        None => {
            warn!("InitialConfig not found, using defaults");
            InitialConfig::default()
        }
    };

    sim.set_machine(CombatMachine::new(config.follow_epsilon));
    info!("Simulation configured (follow epsilon {})", config.follow_epsilon);
}

// ============================================================================
// Commands
// ============================================================================

/// Register queued units and report them to presentation
pub fn process_spawn_commands(
    mut spawn_events: MessageReader<SpawnUnitCommand>,
    mut despawn_events: MessageReader<DespawnUnitCommand>,
    mut sim: ResMut<Simulation>,
    mut navigator: ResMut<DirectNavigator>,
    mut presentation: ResMut<PresentationQueue>,
    initial_config: Option<Res<InitialConfig>>,
) {
    for event in despawn_events.read() {
        if sim.remove_unit(event.unit, navigator.as_mut(), presentation.as_mut()).is_none() {
            debug!("Despawn of {:?} ignored: unit is gone", event.unit);
        }
    }

    for event in spawn_events.read() {
        let stats = event
            .stats
            .or_else(|| initial_config.as_ref().map(|cfg| cfg.unit_stats(event.team)))
            .unwrap_or_default();
        sim.spawn(UnitSpawn::new(event.team, event.position, stats), presentation.as_mut());
    }
}

// ============================================================================
// Simulation Step
// ============================================================================

/// Run one simulation tick with this frame's delta
pub fn run_simulation(
    time: Res<Time>,
    #[allow(unused_variables)] tick: Res<SimTick>,
    mut sim: ResMut<Simulation>,
    mut navigator: ResMut<DirectNavigator>,
    mut presentation: ResMut<PresentationQueue>,
    mut stats: ResMut<SimPerformance>,
) {
    let start = Instant::now();
    sim.tick(time.delta_secs(), navigator.as_mut(), presentation.as_mut());
    stats.last_duration = start.elapsed();

    use crate::profile_log;
    profile_log!(tick, "[SIM STATUS] Tick: {} | Units: {} | Selected: {} | Last sim duration: {:?}",
          tick.0, sim.registry().len(), sim.selection().len(), stats.last_duration);
}

/// Move units along their current requests
pub fn advance_navigation(
    time: Res<Time>,
    mut sim: ResMut<Simulation>,
    mut navigator: ResMut<DirectNavigator>,
) {
    navigator.advance(sim.registry_mut(), time.delta_secs());
}

/// Drop presentation events nobody consumed this frame
pub fn clear_presentation_queue(mut presentation: ResMut<PresentationQueue>) {
    if !presentation.is_empty() {
        trace!("Dropping {} unconsumed presentation events", presentation.len());
        presentation.clear();
    }
}
