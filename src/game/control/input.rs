use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::game::camera::RtsCamera;
use crate::game::config::{GameConfig, GameConfigHandle, InitialConfig};
use crate::game::math::{ray_ground_intersection, ray_sphere_projection, ScreenRect};
use crate::game::simulation::{
    layers, DirectNavigator, PointerHit, PresentationQueue, Simulation, SpatialQuery, Team, Unit, UnitRegistry,
};
use super::commands::*;
use super::resources::*;

/// Height of a unit's pick sphere centre above its ground position.
const UNIT_PICK_HEIGHT: f32 = 0.5;

/// Classification layer a unit answers to.
pub fn unit_layer(unit: &Unit) -> u32 {
    match unit.team {
        Team::Player => layers::SELECTABLE,
        Team::Enemy => layers::ATTACKABLE,
    }
}

/// Picking through the RTS camera: unit spheres first, then the y = 0 ground plane.
pub struct CameraSpatialQuery<'a> {
    camera: &'a Camera,
    camera_transform: &'a GlobalTransform,
    registry: &'a UnitRegistry,
    pick_radius: f32,
}

impl<'a> CameraSpatialQuery<'a> {
    pub fn new(
        camera: &'a Camera,
        camera_transform: &'a GlobalTransform,
        registry: &'a UnitRegistry,
        pick_radius: f32,
    ) -> Self {
        Self { camera, camera_transform, registry, pick_radius }
    }
}

impl SpatialQuery for CameraSpatialQuery<'_> {
    fn hit_test(&self, screen: Vec2, mask: u32) -> PointerHit {
        let Ok(ray) = self.camera.viewport_to_world(self.camera_transform, screen) else {
            return PointerHit::Nothing;
        };
        let direction: Vec3 = ray.direction.into();

        let mut closest_hit: Option<(f32, PointerHit)> = None;
        for unit in self.registry.all_units() {
            if mask & unit_layer(unit) == 0 {
                continue;
            }
            let center = unit.position + Vec3::Y * UNIT_PICK_HEIGHT;
            let Some(distance) = ray_sphere_projection(ray.origin, direction, center, self.pick_radius) else {
                continue;
            };
            if closest_hit.is_none_or(|(best, _)| distance < best) {
                closest_hit = Some((distance, PointerHit::Unit(unit.id)));
            }
        }
        if let Some((_, hit)) = closest_hit {
            return hit;
        }

        if mask & layers::GROUND != 0 {
            if let Some(point) = ray_ground_intersection(ray.origin, direction) {
                return PointerHit::Ground(point);
            }
        }
        PointerHit::Nothing
    }

    fn world_to_screen(&self, world: Vec3) -> Option<Vec2> {
        self.camera.world_to_viewport(self.camera_transform, world).ok()
    }
}

/// Main input handler - routes to appropriate handler based on input mode
pub fn handle_input(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_camera: Query<(&Camera, &GlobalTransform), With<RtsCamera>>,
    mut drag_state: ResMut<DragState>,
    mut input_mode: ResMut<InputMode>,
    mut sim: ResMut<Simulation>,
    mut navigator: ResMut<DirectNavigator>,
    mut presentation: ResMut<PresentationQueue>,
    config_handle: Res<GameConfigHandle>,
    game_configs: Res<Assets<GameConfig>>,
    initial_config: Res<InitialConfig>,
) {
    let Some((camera, camera_transform)) = q_camera.iter().next() else { return };
    let Some(window) = q_window.iter().next() else { return };
    let Some(cursor_position) = window.cursor_position() else { return };
    let Some(config) = game_configs.get(&config_handle.0) else { return };

    if keys.just_pressed(config.key_command_move) {
        *input_mode = InputMode::CommandMove;
        debug!("Input mode: {:?}", *input_mode);
    } else if keys.just_pressed(config.key_command_attack) {
        *input_mode = InputMode::CommandAttack;
        debug!("Input mode: {:?}", *input_mode);
    }

    let radius = config.selection_click_radius;
    let marker_duration = initial_config.marker_duration;
    let modifier = keys.pressed(config.key_selection_modifier);

    match *input_mode {
        InputMode::Selection => {
            // Left Click: Selection Logic
            if mouse_button.just_pressed(MouseButton::Left) {
                drag_state.start = Some(cursor_position);
                drag_state.current = Some(cursor_position);
            }
            if mouse_button.pressed(MouseButton::Left) && drag_state.start.is_some() {
                drag_state.current = Some(cursor_position);
            }
            if mouse_button.just_released(MouseButton::Left) {
                if let Some(start) = drag_state.start.take() {
                    drag_state.current = None;
                    let rect = ScreenRect::from_corners(start, cursor_position);

                    if rect.size().length() < config.selection_drag_threshold {
                        let hit = CameraSpatialQuery::new(camera, camera_transform, sim.registry(), radius)
                            .hit_test(cursor_position, layers::SELECTABLE);
                        click_select(sim.as_mut(), hit, modifier, presentation.as_mut());
                    } else {
                        let query = CameraSpatialQuery::new(camera, camera_transform, sim.registry(), radius);
                        let ids = units_in_screen_rect(&query, sim.registry(), rect);
                        box_select(sim.as_mut(), &ids, presentation.as_mut());
                    }
                }
            }

            // Right Click: Smart Command
            if mouse_button.just_pressed(MouseButton::Right) {
                let target = classify_order(
                    &CameraSpatialQuery::new(camera, camera_transform, sim.registry(), radius),
                    cursor_position,
                );
                let order = issue_order(sim.as_mut(), target, marker_duration, navigator.as_mut(), presentation.as_mut());
                debug!("Smart command on {:?}: {:?}", target, order);
            }
        }
        InputMode::CommandMove => {
            if mouse_button.just_pressed(MouseButton::Left) {
                let ground = ground_under(
                    &CameraSpatialQuery::new(camera, camera_transform, sim.registry(), radius),
                    cursor_position,
                );
                if let Some(point) = ground {
                    issue_order(sim.as_mut(), OrderTarget::Ground(point), marker_duration, navigator.as_mut(), presentation.as_mut());
                }
                *input_mode = InputMode::Selection;
            } else if mouse_button.just_pressed(MouseButton::Right) {
                *input_mode = InputMode::Selection;
            }
        }
        InputMode::CommandAttack => {
            if mouse_button.just_pressed(MouseButton::Left) {
                let target = classify_order(
                    &CameraSpatialQuery::new(camera, camera_transform, sim.registry(), radius),
                    cursor_position,
                );
                if let OrderTarget::Enemy(_) = target {
                    issue_order(sim.as_mut(), target, marker_duration, navigator.as_mut(), presentation.as_mut());
                } else {
                    debug!("Attack command needs an enemy under the cursor");
                }
                *input_mode = InputMode::Selection;
            } else if mouse_button.just_pressed(MouseButton::Right) {
                *input_mode = InputMode::Selection;
            }
        }
    }
}

/// Track whether the cursor rests on an enemy the selection could attack
pub fn update_attack_hover(
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_camera: Query<(&Camera, &GlobalTransform), With<RtsCamera>>,
    sim: Res<Simulation>,
    config_handle: Res<GameConfigHandle>,
    game_configs: Res<Assets<GameConfig>>,
    mut hover: ResMut<AttackHover>,
) {
    let Some(config) = game_configs.get(&config_handle.0) else { return };
    let cursor = q_window.iter().next().and_then(|window| window.cursor_position());

    let enemy = match (cursor, q_camera.iter().next()) {
        (Some(cursor), Some((camera, camera_transform))) if sim.selection().has_combat_capable(sim.registry()) => {
            let query = CameraSpatialQuery::new(camera, camera_transform, sim.registry(), config.selection_click_radius);
            match query.hit_test(cursor, layers::ATTACKABLE) {
                PointerHit::Unit(id) => Some(id),
                _ => None,
            }
        }
        _ => None,
    };

    if hover.0 != enemy {
        trace!("Attack hover: {:?}", enemy);
        hover.0 = enemy;
    }
}
