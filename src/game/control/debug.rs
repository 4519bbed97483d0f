use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rand::{rng, Rng};

use crate::game::camera::RtsCamera;
use crate::game::config::{GameConfig, GameConfigHandle, InitialConfig};
use crate::game::math::ray_ground_intersection;
use crate::game::simulation::{SpawnUnitCommand, Team};

/// Handle debug spawning via keyboard shortcuts
pub fn handle_debug_spawning(
    keys: Res<ButtonInput<KeyCode>>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_camera: Query<(&Camera, &GlobalTransform), With<RtsCamera>>,
    config_handle: Res<GameConfigHandle>,
    game_configs: Res<Assets<GameConfig>>,
    initial_config: Res<InitialConfig>,
    mut spawn_events: MessageWriter<SpawnUnitCommand>,
) {
    let Some(config) = game_configs.get(&config_handle.0) else { return };

    if !(keys.just_pressed(config.key_spawn_player) ||
         keys.just_pressed(config.key_spawn_enemy) ||
         keys.just_pressed(config.key_spawn_batch)) {
        return;
    }

    let Some((camera, camera_transform)) = q_camera.iter().next() else { return };
    let Some(window) = q_window.iter().next() else { return };
    let Some(cursor_position) = window.cursor_position() else { return };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_position) else { return };
    let Some(point) = ray_ground_intersection(ray.origin, ray.direction.into()) else { return };

    if keys.just_pressed(config.key_spawn_player) {
        info!("Spawning player unit at {:?}", point);
        spawn_events.write(SpawnUnitCommand::new(Team::Player, point));
    } else if keys.just_pressed(config.key_spawn_enemy) {
        info!("Spawning enemy unit at {:?}", point);
        spawn_events.write(SpawnUnitCommand::new(Team::Enemy, point));
    } else if keys.just_pressed(config.key_spawn_batch) {
        // Batches go to the enemy so there is always something to fight
        info!("Spawning batch of {} enemy units at {:?}", initial_config.batch_spawn_count, point);
        spawn_batch_at(
            &mut spawn_events,
            Team::Enemy,
            initial_config.batch_spawn_count,
            point,
            initial_config.batch_spawn_spread,
        );
    }
}

/// Spawn a batch of units around a center point
fn spawn_batch_at(
    spawn_events: &mut MessageWriter<SpawnUnitCommand>,
    team: Team,
    count: usize,
    center: Vec3,
    spread: f32,
) {
    if spread <= 0.0 {
        for _ in 0..count {
            spawn_events.write(SpawnUnitCommand::new(team, center));
        }
        return;
    }

    let mut rng = rng();
    for _ in 0..count {
        let pos_x = center.x + rng.random_range(-spread..spread);
        let pos_z = center.z + rng.random_range(-spread..spread);
        spawn_events.write(SpawnUnitCommand::new(team, Vec3::new(pos_x, 0.0, pos_z)));
    }
}
