/// Simulation layer - gameplay state and the per-frame driver.
///
/// This module is organized into:
/// - **components**: Unit data model (team, health, weapon, stats)
/// - **registry**: Generational arena of live units
/// - **context**: The `Simulation` owner and its tick
/// - **host**: Traits for picking, path planning and presentation
/// - **navigation**: Straight-line path planner
/// - **proximity**: Distance-based acquisition sensor
/// - **resources**: Presentation buffer and tick bookkeeping
/// - **events**: Spawn/despawn commands
/// - **systems**: Bevy systems driving the above

use bevy::prelude::*;

// Module declarations
pub mod components;
pub mod context;
pub mod events;
pub mod host;
pub mod navigation;
pub mod proximity;
pub mod registry;
pub mod resources;
pub mod systems;

// Re-export commonly used items
pub use components::*;
pub use context::{GroundMarker, Simulation};
pub use events::*;
pub use host::{layers, PathPlanner, PathStatus, PointerHit, Presentation, PresentationEvent, SpatialQuery};
pub use navigation::DirectNavigator;
pub use proximity::{ProximityEvent, ProximitySensor};
pub use registry::{UnitId, UnitRegistry};
pub use resources::*;

// System sets for organizing execution order within a frame
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SimSet {
    Input,        // Pointer classification, selection, orders
    Simulation,   // Arrivals, acquisition, state machines
    Navigation,   // Units walk towards their requests
    Camera,       // Camera rig
    Presentation, // Drain events into visuals
}

/// Main simulation plugin
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Simulation::default());
        app.init_resource::<DirectNavigator>();
        app.init_resource::<PresentationQueue>();
        app.init_resource::<SimTick>();
        app.init_resource::<SimPerformance>();

        // Register events
        app.add_message::<SpawnUnitCommand>();
        app.add_message::<DespawnUnitCommand>();

        // Configure System Sets
        app.configure_sets(Update, (
            SimSet::Input,
            SimSet::Simulation,
            SimSet::Navigation,
            SimSet::Camera,
            SimSet::Presentation,
        ).chain());

        // Startup systems
        app.add_systems(Startup, systems::configure_simulation);

        app.add_systems(Update, (
            // Tick counter belongs to the frame's input stage
            systems::increment_sim_tick.in_set(SimSet::Input),
            systems::process_spawn_commands.in_set(SimSet::Simulation).before(systems::run_simulation),
            systems::run_simulation.in_set(SimSet::Simulation),
            systems::advance_navigation.in_set(SimSet::Navigation),
        ));

        app.add_systems(Last, systems::clear_presentation_queue);
    }
}
