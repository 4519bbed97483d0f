use std::path::Path;

use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;
use serde::{Deserialize, Serialize};

use crate::game::camera::CameraRigSettings;
use crate::game::combat::DEFAULT_FOLLOW_EPSILON;
use crate::game::simulation::{Team, UnitStats};

pub const INITIAL_CONFIG_PATH: &str = "assets/initial_config.ron";

/// Static configuration loaded once at startup. These values define the
/// starting scenario and the unit templates; changing them mid-game would
/// leave live units out of step with newly spawned ones.
#[derive(Resource, Deserialize, Serialize, Clone, Debug)]
#[serde(default)]
pub struct InitialConfig {
    // Unit templates
    pub player_unit: UnitStats,
    pub enemy_unit: UnitStats,

    // Starting scenario
    pub player_squad_size: usize,
    pub enemy_squad_size: usize,
    pub player_spawn: Vec2,
    pub enemy_spawn: Vec2,
    pub squad_spacing: f32,
    pub ground_size: f32,

    // Combat
    pub follow_epsilon: f32,

    // Commands
    pub marker_duration: f32,

    // Debug spawning
    pub batch_spawn_count: usize,
    pub batch_spawn_spread: f32,
}

impl InitialConfig {
    pub fn unit_stats(&self, team: Team) -> UnitStats {
        match team {
            Team::Player => self.player_unit,
            Team::Enemy => self.enemy_unit,
        }
    }
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            player_unit: UnitStats::default(),
            enemy_unit: UnitStats::default(),
            player_squad_size: 4,
            enemy_squad_size: 4,
            player_spawn: Vec2::new(-6.0, 6.0),
            enemy_spawn: Vec2::new(6.0, -6.0),
            squad_spacing: 1.5,
            ground_size: 50.0,
            follow_epsilon: DEFAULT_FOLLOW_EPSILON,
            marker_duration: 1.0,
            batch_spawn_count: 8,
            batch_spawn_spread: 3.0,
        }
    }
}

/// Runtime configuration that can be hot-reloaded during gameplay.
/// These are settings that don't touch unit state (controls, camera, UI).
#[derive(Deserialize, Serialize, Asset, TypePath, Clone, Debug)]
#[serde(default)]
pub struct GameConfig {
    // Controls (hot-reloadable)
    pub keys_camera_forward: Vec<KeyCode>,
    pub keys_camera_backward: Vec<KeyCode>,
    pub keys_camera_left: Vec<KeyCode>,
    pub keys_camera_right: Vec<KeyCode>,
    pub key_camera_fast: KeyCode,
    pub key_selection_modifier: KeyCode,
    pub key_command_move: KeyCode,
    pub key_command_attack: KeyCode,
    pub key_follow_selected: KeyCode,
    pub key_stop_follow: KeyCode,
    pub key_spawn_player: KeyCode,
    pub key_spawn_enemy: KeyCode,
    pub key_spawn_batch: KeyCode,
    pub key_toggle_health_bars: KeyCode,

    // Camera (hot-reloadable)
    pub camera: CameraRigSettings,

    // UI (hot-reloadable)
    pub selection_drag_threshold: f32,
    pub selection_click_radius: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            keys_camera_forward: vec![KeyCode::KeyW, KeyCode::ArrowUp],
            keys_camera_backward: vec![KeyCode::KeyS, KeyCode::ArrowDown],
            keys_camera_left: vec![KeyCode::KeyA, KeyCode::ArrowLeft],
            keys_camera_right: vec![KeyCode::KeyD, KeyCode::ArrowRight],
            key_camera_fast: KeyCode::ControlLeft,
            key_selection_modifier: KeyCode::ShiftLeft,
            key_command_move: KeyCode::KeyM,
            key_command_attack: KeyCode::KeyT,
            key_follow_selected: KeyCode::KeyF,
            key_stop_follow: KeyCode::Escape,
            key_spawn_player: KeyCode::KeyP,
            key_spawn_enemy: KeyCode::KeyE,
            key_spawn_batch: KeyCode::KeyB,
            key_toggle_health_bars: KeyCode::KeyH,
            camera: CameraRigSettings::default(),
            selection_drag_threshold: 4.0,
            selection_click_radius: 0.6,
        }
    }
}

#[derive(Resource)]
pub struct GameConfigHandle(pub Handle<GameConfig>);

pub struct GameConfigPlugin;

impl Plugin for GameConfigPlugin {
    fn build(&self, app: &mut App) {
        // Read synchronously so every Startup system already sees the values
        app.insert_resource(load_initial_config(Path::new(INITIAL_CONFIG_PATH)))
           .add_plugins(RonAssetPlugin::<GameConfig>::new(&["game_config.ron"]))
           .add_systems(Startup, setup_runtime_config);
    }
}

/// Load static initial configuration. Falls back to defaults on any error.
pub fn load_initial_config(path: &Path) -> InitialConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_initial_config(&contents).unwrap_or_else(|e| {
            error!("Failed to parse initial config: {}", e);
            error!("Using default InitialConfig");
            InitialConfig::default()
        }),
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            error!("Using default InitialConfig");
            InitialConfig::default()
        }
    }
}

pub fn parse_initial_config(contents: &str) -> Result<InitialConfig, ron::error::SpannedError> {
    let config = ron::from_str::<InitialConfig>(contents)?;
    info!("Loaded initial config ({} vs {} units)", config.player_squad_size, config.enemy_squad_size);
    Ok(config)
}

/// Load runtime configuration asynchronously (can be hot-reloaded).
fn setup_runtime_config(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle = asset_server.load("game_config.ron");
    commands.insert_resource(GameConfigHandle(handle));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_initial_config_keeps_defaults() {
        let config = parse_initial_config("(player_squad_size: 2, marker_duration: 3.0)").unwrap();
        assert_eq!(config.player_squad_size, 2);
        assert_eq!(config.marker_duration, 3.0);
        assert_eq!(config.enemy_squad_size, InitialConfig::default().enemy_squad_size);
        assert_eq!(config.follow_epsilon, DEFAULT_FOLLOW_EPSILON);
    }

    #[test]
    fn test_unit_without_weapon_parses() {
        let config = parse_initial_config(
            "(enemy_unit: (max_health: 40.0, move_speed: 2.0, weapon: None))",
        )
        .unwrap();
        assert!(config.enemy_unit.weapon.is_none());
        assert_eq!(config.enemy_unit.max_health, 40.0);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_initial_config(Path::new("does/not/exist.ron"));
        assert_eq!(config.player_squad_size, InitialConfig::default().player_squad_size);
    }

    #[test]
    fn test_bundled_config_files_parse() {
        let initial = std::fs::read_to_string(INITIAL_CONFIG_PATH).unwrap();
        parse_initial_config(&initial).unwrap();

        let runtime = std::fs::read_to_string("assets/game_config.ron").unwrap();
        let config: GameConfig = ron::from_str(&runtime).unwrap();
        assert!(config.selection_drag_threshold > 0.0);
    }
}
