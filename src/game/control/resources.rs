use bevy::prelude::*;

use crate::game::simulation::UnitId;

/// State for tracking mouse drag operations
#[derive(Resource, Default)]
pub struct DragState {
    pub start: Option<Vec2>,
    pub current: Option<Vec2>,
}

/// Current input mode for player commands
#[derive(Resource, Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum InputMode {
    /// Left click selects, right click issues a smart order
    #[default]
    Selection,
    /// Next left click moves the selection, even onto an enemy
    CommandMove,
    /// Next left click on an enemy attacks it
    CommandAttack,
}

/// Enemy under the cursor that the current selection could attack; drives the attack cursor
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct AttackHover(pub Option<UnitId>);

/// Marker component for the selection box UI element
#[derive(Component)]
pub struct SelectionBox;
