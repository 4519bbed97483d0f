use bevy::prelude::*;
use rustc_hash::FxHashMap;

use crate::game::combat::CombatState;
use crate::game::simulation::{Team, UnitId};
use super::components::GroundMarkerVisual;

/// Settings for health bar display
#[derive(Resource, Default)]
pub struct HealthBarSettings {
    pub show: bool,
}

/// Rendered entity of every live unit
#[derive(Resource, Default)]
pub struct UnitEntities(pub FxHashMap<UnitId, Entity>);

/// Shared mesh handles for unit rendering
#[derive(Resource)]
pub struct UnitMesh {
    pub unit: Handle<Mesh>,
    pub circle: Handle<Mesh>,
    pub quad: Handle<Mesh>,
    pub marker: Handle<Mesh>,
}

/// Shared material handles for unit rendering
#[derive(Resource)]
pub struct UnitMaterials {
    pub player: Handle<StandardMaterial>,
    pub enemy: Handle<StandardMaterial>,
    pub following: Handle<StandardMaterial>,
    pub attacking: Handle<StandardMaterial>,
    pub selection_circle: Handle<StandardMaterial>,
    pub health_bar: Handle<StandardMaterial>,
    pub marker: Handle<StandardMaterial>,
}

impl UnitMaterials {
    /// Body material: team colour while idle, state tint while engaged.
    pub fn body(&self, team: Team, state: CombatState) -> Handle<StandardMaterial> {
        match (state, team) {
            (CombatState::Follow, _) => self.following.clone(),
            (CombatState::Attack, _) => self.attacking.clone(),
            (CombatState::Idle, Team::Player) => self.player.clone(),
            (CombatState::Idle, Team::Enemy) => self.enemy.clone(),
        }
    }
}

/// Sets up shared unit rendering resources (meshes and materials)
pub(super) fn setup_unit_resources(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mesh = meshes.add(Capsule3d::default());
    let circle_mesh = meshes.add(Annulus::new(0.6, 0.7)); // Inner radius 0.6, Outer 0.7
    let quad_mesh = meshes.add(Rectangle::new(1.0, 0.15));
    let marker_mesh = meshes.add(Annulus::new(0.25, 0.4));

    let unlit = |color: Color| StandardMaterial {
        base_color: color,
        unlit: true,
        ..default()
    };

    let marker_mat = materials.add(unlit(Color::srgb(1.0, 1.0, 0.3)));
    let circle_mat = materials.add(unlit(Color::srgb(0.2, 1.0, 0.2)));
    let health_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.0, 1.0, 0.0),
        unlit: true,
        cull_mode: None, // Double sided
        ..default()
    });

    // Ground marker lives for the whole session and is only moved and shown
    commands.spawn((
        Mesh3d(marker_mesh.clone()),
        MeshMaterial3d(marker_mat.clone()),
        Transform::from_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)),
        Visibility::Hidden,
        GroundMarkerVisual,
    ));

    commands.insert_resource(UnitMesh {
        unit: mesh,
        circle: circle_mesh,
        quad: quad_mesh,
        marker: marker_mesh,
    });

    commands.insert_resource(UnitMaterials {
        player: materials.add(Color::srgb(0.3, 0.5, 0.9)),
        enemy: materials.add(Color::srgb(0.8, 0.7, 0.6)),
        following: materials.add(Color::srgb(0.9, 0.8, 0.2)),
        attacking: materials.add(Color::srgb(0.8, 0.2, 0.2)),
        selection_circle: circle_mat,
        health_bar: health_mat,
        marker: marker_mat,
    });
}
