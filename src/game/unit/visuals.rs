use bevy::prelude::*;

use crate::game::combat::CombatState;
use crate::game::config::{GameConfig, GameConfigHandle};
use crate::game::simulation::{Health, PresentationEvent, PresentationQueue, Simulation, Team, UnitId};

use super::components::{GroundMarkerVisual, HealthBar, HealthDisplay, Selected, SelectionCircle, UnitHandle, UnitTeam};
use super::resources::{HealthBarSettings, UnitEntities, UnitMaterials, UnitMesh};

/// Height of the capsule centre above the ground
const UNIT_BODY_HEIGHT: f32 = 1.0;
/// Marker floats just above the ground to avoid z-fighting
const MARKER_HEIGHT: f32 = 0.02;

/// Drains the presentation queue into entity changes.
///
/// Runs once per frame after the simulation; every event refers to a unit by
/// [`UnitId`] and is mapped to its entity through [`UnitEntities`].
pub(super) fn apply_presentation_events(
    mut commands: Commands,
    mut queue: ResMut<PresentationQueue>,
    mut entities: ResMut<UnitEntities>,
    unit_mesh: Res<UnitMesh>,
    unit_materials: Res<UnitMaterials>,
    settings: Res<HealthBarSettings>,
    mut q_marker: Query<(&mut Transform, &mut Visibility), With<GroundMarkerVisual>>,
) {
    for event in queue.drain() {
        match event {
            PresentationEvent::Spawned { unit, team, position } => {
                let entity = spawn_unit_visuals(&mut commands, unit, team, position, &unit_mesh, &unit_materials, &settings);
                entities.0.insert(unit, entity);
            }
            PresentationEvent::SelectionChanged { unit, selected } => {
                let Some(&entity) = entities.0.get(&unit) else { continue };
                if selected {
                    commands.entity(entity).insert(Selected);
                } else {
                    commands.entity(entity).remove::<Selected>();
                }
            }
            PresentationEvent::HealthChanged { unit, current, max } => {
                let Some(&entity) = entities.0.get(&unit) else { continue };
                commands.entity(entity).insert(HealthDisplay(Health { current, max }));
            }
            PresentationEvent::StateChanged { unit, from, to } => {
                let Some(&entity) = entities.0.get(&unit) else { continue };
                trace!("{:?} tint {} -> {}", unit, from, to);
                commands.entity(entity).insert(CombatTint(to));
            }
            PresentationEvent::Removed { unit } => {
                if let Some(entity) = entities.0.remove(&unit) {
                    commands.entity(entity).despawn();
                }
            }
            PresentationEvent::MarkerPlaced { position, .. } => {
                if let Ok((mut transform, mut visibility)) = q_marker.single_mut() {
                    transform.translation = Vec3::new(position.x, MARKER_HEIGHT, position.z);
                    *visibility = Visibility::Visible;
                }
            }
            PresentationEvent::MarkerCleared => {
                if let Ok((_, mut visibility)) = q_marker.single_mut() {
                    *visibility = Visibility::Hidden;
                }
            }
        }
    }
}

/// Debug tint reflecting the unit's combat state
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct CombatTint(pub CombatState);

/// Spawns the visual representation of a new unit
fn spawn_unit_visuals(
    commands: &mut Commands,
    unit: UnitId,
    team: Team,
    position: Vec3,
    unit_mesh: &UnitMesh,
    unit_materials: &UnitMaterials,
    settings: &HealthBarSettings,
) -> Entity {
    commands.spawn((
        UnitHandle(unit),
        UnitTeam(team),
        CombatTint(CombatState::Idle),
        // NOLINT: Handle::clone() is cheap (Arc-based ref count)
        Mesh3d(unit_mesh.unit.clone()),
        MeshMaterial3d(unit_materials.body(team, CombatState::Idle)),
        Transform::from_xyz(position.x, UNIT_BODY_HEIGHT, position.z),
    )).with_children(|parent| {
        parent.spawn((
            // NOLINT: Handle::clone() is cheap (Arc-based ref count)
            Mesh3d(unit_mesh.circle.clone()),
            // NOLINT: Handle::clone() is cheap (Arc-based ref count)
            MeshMaterial3d(unit_materials.selection_circle.clone()),
            Transform::from_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2))
                .with_translation(Vec3::new(0.0, -0.95, 0.0)),
            Visibility::Hidden,
            SelectionCircle,
        ));
        // Health Bar
        parent.spawn((
            // NOLINT: Handle::clone() is cheap (Arc-based ref count)
            Mesh3d(unit_mesh.quad.clone()),
            // NOLINT: Handle::clone() is cheap (Arc-based ref count)
            MeshMaterial3d(unit_materials.health_bar.clone()),
            Transform::from_xyz(0.0, 1.5, 0.0),
            if settings.show { Visibility::Visible } else { Visibility::Hidden },
            HealthBar,
        ));
    }).id()
}

/// Copies simulation positions and facing onto unit transforms
pub(super) fn sync_visuals(
    sim: Res<Simulation>,
    mut query: Query<(&UnitHandle, &mut Transform)>,
) {
    for (handle, mut transform) in query.iter_mut() {
        let Some(unit) = sim.unit(handle.0) else { continue };
        transform.translation.x = unit.position.x;
        transform.translation.z = unit.position.z;
        transform.rotation = unit.facing();
    }
}

/// Swaps body materials when the combat tint changes
///
/// Optimized: Only processes entities whose tint CHANGED (not all units every frame)
pub(super) fn update_combat_tint(
    mut query: Query<(&mut MeshMaterial3d<StandardMaterial>, &UnitTeam, &CombatTint), Changed<CombatTint>>,
    unit_materials: Res<UnitMaterials>,
) {
    for (mut mat_handle, team, tint) in query.iter_mut() {
        mat_handle.0 = unit_materials.body(team.0, tint.0);
    }
}

/// Shows/hides selection circles based on Selected component
pub(super) fn update_selection_circle_visibility(
    q_added: Query<&Children, (With<UnitHandle>, Added<Selected>)>,
    q_children_lookup: Query<&Children>,
    q_selected: Query<Entity, With<Selected>>,
    mut q_vis: Query<&mut Visibility, With<SelectionCircle>>,
    mut removed_selected: RemovedComponents<Selected>,
) {
    // Handle Added Selected
    for children in q_added.iter() {
        for child in children.iter() {
            if let Ok(mut vis) = q_vis.get_mut(child) {
                *vis = Visibility::Visible;
            }
        }
    }

    // Handle Removed Selected (despawned units simply have no children left to look up)
    for entity in removed_selected.read() {
        if q_selected.contains(entity) {
            continue;
        }
        if let Ok(children) = q_children_lookup.get(entity) {
            for child in children.iter() {
                if let Ok(mut vis) = q_vis.get_mut(child) {
                    *vis = Visibility::Hidden;
                }
            }
        }
    }
}

/// Toggles health bar visibility when user presses configured key
pub(super) fn toggle_health_bars(
    keys: Res<ButtonInput<KeyCode>>,
    config_handle: Res<GameConfigHandle>,
    game_configs: Res<Assets<GameConfig>>,
    mut settings: ResMut<HealthBarSettings>,
    mut q_bars: Query<&mut Visibility, With<HealthBar>>,
) {
    let Some(config) = game_configs.get(&config_handle.0) else { return };

    if keys.just_pressed(config.key_toggle_health_bars) {
        settings.show = !settings.show;
        let vis = if settings.show { Visibility::Visible } else { Visibility::Hidden };
        for mut visibility in q_bars.iter_mut() {
            *visibility = vis;
        }
    }
}

/// Updates health bar visuals based on current health
pub(super) fn update_health_bars(
    q_units: Query<(&Children, &HealthDisplay), Changed<HealthDisplay>>,
    mut q_bars: Query<&mut Transform, With<HealthBar>>,
) {
    for (children, health) in q_units.iter() {
        let pct = health.0.fraction();
        for child in children.iter() {
            if let Ok(mut transform) = q_bars.get_mut(child) {
                transform.scale.x = pct;
                // Keep the left edge pinned at -0.5 while the bar shrinks
                transform.translation.x = -0.5 + (pct * 0.5);
            }
        }
    }
}
