mod components;
mod resources;
mod visuals;

use bevy::prelude::*;
use crate::game::simulation::SimSet;

// Re-export public types
pub use components::{GroundMarkerVisual, HealthBar, HealthDisplay, Selected, SelectionCircle, UnitHandle, UnitTeam};
pub use resources::{HealthBarSettings, UnitEntities, UnitMaterials, UnitMesh};

use resources::setup_unit_resources;
use visuals::{apply_presentation_events, sync_visuals, toggle_health_bars, update_combat_tint,
              update_health_bars, update_selection_circle_visibility};

/// Plugin that renders units from the simulation's presentation events
pub struct UnitPlugin;

impl Plugin for UnitPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HealthBarSettings>()
           .init_resource::<UnitEntities>()
           .add_systems(Startup, setup_unit_resources)
           // Commands from the event drain must land before the change-driven systems look
           .add_systems(Update, (
               apply_presentation_events,
               ApplyDeferred,
               (
                   sync_visuals,
                   update_combat_tint,
                   update_selection_circle_visibility,
                   update_health_bars,
                   toggle_health_bars,
               ),
           ).chain().in_set(SimSet::Presentation));
    }
}
