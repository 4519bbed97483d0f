use bevy::prelude::*;

use crate::game::simulation::{Health, Team, UnitId};

/// Links a rendered entity to its unit in the simulation
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitHandle(pub UnitId);

/// Team of the rendered unit, for picking its base material
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitTeam(pub Team);

/// Last health reported for the unit
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HealthDisplay(pub Health);

/// Marks a unit as currently selected by the player
#[derive(Component)]
pub struct Selected;

/// Marks the child entity that renders the selection circle
#[derive(Component)]
pub struct SelectionCircle;

/// Marks the child entity that renders the health bar
#[derive(Component)]
pub struct HealthBar;

/// Marks the entity that renders the move-order ground marker
#[derive(Component)]
pub struct GroundMarkerVisual;
