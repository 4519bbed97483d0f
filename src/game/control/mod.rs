use bevy::prelude::*;

use crate::game::simulation::SimSet;

mod commands;
mod debug;
mod input;
mod resources;
mod selection;

use debug::*;
use input::*;
use selection::*;

pub use commands::{
    box_select, classify_order, click_select, ground_under, issue_order, units_in_screen_rect, IssuedOrder,
    OrderTarget,
};
pub use input::{unit_layer, CameraSpatialQuery};
pub use resources::{AttackHover, DragState, InputMode, SelectionBox};
pub use selection::SelectionSet;

pub struct ControlPlugin;

impl Plugin for ControlPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DragState>()
           .init_resource::<InputMode>()
           .init_resource::<AttackHover>()
           .add_systems(Startup, setup_selection_box)
           .add_systems(Update, (
               (handle_debug_spawning, handle_input, update_attack_hover).chain().in_set(SimSet::Input),
               update_selection_box.in_set(SimSet::Presentation),
           ));
    }
}
