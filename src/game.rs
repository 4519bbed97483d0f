use bevy::prelude::*;

pub mod camera;
pub mod combat;
pub mod config;
pub mod control;
pub mod math;
pub mod simulation;
pub mod unit;

use camera::RtsCameraPlugin;
use config::{GameConfigPlugin, InitialConfig};
use control::ControlPlugin;
use simulation::{SimulationPlugin, SpawnUnitCommand, Team};
use unit::UnitPlugin;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            GameConfigPlugin,
            SimulationPlugin,
            UnitPlugin,
            ControlPlugin,
            RtsCameraPlugin,
        ))
        .add_systems(Startup, (setup_game, spawn_starting_squads));
    }
}

fn setup_game(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    initial_config: Res<InitialConfig>,
) {
    info!("Game setup started");

    // Ground Plane
    let size = initial_config.ground_size;
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(size, size))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
    ));

    // Light
    commands.spawn((
        PointLight {
            shadows_enabled: true,
            intensity: 10_000_000.0,
            range: 100.0,
            ..default()
        },
        Transform::from_xyz(8.0, 16.0, 8.0),
    ));

    // UI Camera
    commands.spawn((
        Camera2d::default(),
        Camera {
            order: 1,
            ..default()
        },
    ));
}

/// Queue both starting squads; the simulation registers them on the first frame
pub fn spawn_starting_squads(initial_config: Res<InitialConfig>, mut spawn_events: MessageWriter<SpawnUnitCommand>) {
    let squads = [
        (Team::Player, initial_config.player_squad_size, initial_config.player_spawn),
        (Team::Enemy, initial_config.enemy_squad_size, initial_config.enemy_spawn),
    ];

    for (team, count, center) in squads {
        for offset in squad_offsets(count, initial_config.squad_spacing) {
            let position = Vec3::new(center.x + offset.x, 0.0, center.y + offset.y);
            spawn_events.write(SpawnUnitCommand::new(team, position));
        }
        info!("Queued {} {:?} units around {:?}", count, team, center);
    }
}

/// Offsets of a square-ish grid of `count` slots centred on the origin.
pub fn squad_offsets(count: usize, spacing: f32) -> Vec<Vec2> {
    if count == 0 {
        return Vec::new();
    }
    let columns = (count as f32).sqrt().ceil() as usize;
    let rows = count.div_ceil(columns);
    let origin = Vec2::new((columns - 1) as f32, (rows - 1) as f32) * spacing * 0.5;

    (0..count)
        .map(|i| Vec2::new((i % columns) as f32, (i / columns) as f32) * spacing - origin)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squad_offsets_are_centred_and_distinct() {
        let offsets = squad_offsets(4, 2.0);
        assert_eq!(offsets, vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(-1.0, 1.0),
            Vec2::new(1.0, 1.0),
        ]);
        assert!(squad_offsets(0, 1.0).is_empty());
        assert_eq!(squad_offsets(1, 5.0), vec![Vec2::ZERO]);
        assert_eq!(squad_offsets(5, 1.0).len(), 5);
    }
}
