use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};

use crate::game::config::{GameConfig, GameConfigHandle};
use crate::game::control::AttackHover;
use crate::game::math::ray_ground_intersection;
use crate::game::simulation::{SimSet, Simulation, UnitId};

mod rig;

pub use rig::{cursor_direction_from_angle, CameraRig, CameraRigSettings, CursorDirection, RigBasis, RigInput};

/// Pixels per scroll line when the wheel reports pixel deltas
const PIXELS_PER_SCROLL_LINE: f32 = 100.0;

pub struct RtsCameraPlugin;

impl Plugin for RtsCameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraFollow>()
           .init_resource::<EdgeCursor>()
           .add_systems(Startup, spawn_camera)
           .add_systems(Update, (update_camera_follow, move_camera, update_cursor_icon).chain().in_set(SimSet::Camera));
    }
}

#[derive(Component)]
pub struct RtsCamera;

/// Smoothed rig driving the RTS camera's translation
#[derive(Component, Deref, DerefMut)]
pub struct RtsCameraRig(pub CameraRig);

/// Unit the camera is locked onto, if any
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct CameraFollow(pub Option<UnitId>);

/// Current edge-scroll cursor, shown by [`update_cursor_icon`]
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct EdgeCursor(pub CursorDirection);

fn spawn_camera(mut commands: Commands) {
    // RTS Camera: High up, looking down at an angle
    let translation = Vec3::new(0.0, 15.0, 15.0);
    let look_at = Vec3::ZERO;

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(translation)
            .looking_at(look_at, Vec3::Y),
        RtsCamera,
        RtsCameraRig(CameraRig::new(translation)),
    ));
}

/// Start following the first selected unit, stop on request or when it dies
fn update_camera_follow(
    keys: Res<ButtonInput<KeyCode>>,
    sim: Res<Simulation>,
    config_handle: Res<GameConfigHandle>,
    game_configs: Res<Assets<GameConfig>>,
    mut follow: ResMut<CameraFollow>,
) {
    let Some(config) = game_configs.get(&config_handle.0) else { return };

    if keys.just_pressed(config.key_stop_follow) && follow.0.is_some() {
        info!("Camera follow stopped");
        follow.0 = None;
    } else if keys.just_pressed(config.key_follow_selected) {
        let first = sim.selection().iter(sim.registry()).next().map(|unit| unit.id);
        if let Some(unit) = first {
            info!("Camera following {:?}", unit);
        }
        follow.0 = first;
    }

    if let Some(unit) = follow.0 {
        if sim.unit(unit).is_none() {
            debug!("Followed {:?} is gone; camera released", unit);
            follow.0 = None;
        }
    }
}

fn move_camera(
    mut query: Query<(&Camera, &GlobalTransform, &mut Transform, &mut RtsCameraRig), With<RtsCamera>>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    keys: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut scroll_evr: MessageReader<MouseWheel>,
    time: Res<Time>,
    sim: Res<Simulation>,
    follow: Res<CameraFollow>,
    config_handle: Res<GameConfigHandle>,
    game_configs: Res<Assets<GameConfig>>,
    mut edge_cursor: ResMut<EdgeCursor>,
) {
    let Ok((camera, camera_transform, mut transform, mut rig)) = query.single_mut() else { return };
    let Some(config) = game_configs.get(&config_handle.0) else { return };

    let scroll: f32 = scroll_evr
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / PIXELS_PER_SCROLL_LINE,
        })
        .sum();

    // Following skips the pan inputs entirely
    if let Some(unit) = follow.0.and_then(|id| sim.unit(id)) {
        rig.look_at_ground(unit.position, *transform.forward());
        transform.translation = rig.position();
        return;
    }

    let window = q_window.iter().next();
    let cursor = window.and_then(|w| w.cursor_position());
    let drag_ground = cursor
        .and_then(|c| camera.viewport_to_world(camera_transform, c).ok())
        .and_then(|ray| ray_ground_intersection(ray.origin, ray.direction.into()));

    let mut axis = Vec2::ZERO;
    if keys.any_pressed(config.keys_camera_forward.iter().copied()) {
        axis.y += 1.0;
    }
    if keys.any_pressed(config.keys_camera_backward.iter().copied()) {
        axis.y -= 1.0;
    }
    if keys.any_pressed(config.keys_camera_right.iter().copied()) {
        axis.x += 1.0;
    }
    if keys.any_pressed(config.keys_camera_left.iter().copied()) {
        axis.x -= 1.0;
    }

    let input = RigInput {
        keyboard_axis: axis,
        fast: keys.pressed(config.key_camera_fast),
        cursor,
        screen_size: window.map(|w| Vec2::new(w.width(), w.height())).unwrap_or_default(),
        drag_pressed: mouse_button.just_pressed(MouseButton::Middle),
        drag_held: mouse_button.pressed(MouseButton::Middle),
        drag_ground,
        scroll,
    };

    let basis = RigBasis::from_transform(&transform);
    if let Some(direction) = rig.update(&config.camera, &input, basis, time.delta_secs()) {
        trace!("Edge cursor: {:?}", direction);
        edge_cursor.0 = direction;
    }
    transform.translation = rig.position();
}

/// System cursor for the pointer state. Edge scrolling wins over the attack cursor.
pub fn cursor_icon(direction: CursorDirection, attack_hover: bool) -> SystemCursorIcon {
    match direction {
        CursorDirection::Up => SystemCursorIcon::NResize,
        CursorDirection::UpRight => SystemCursorIcon::NeResize,
        CursorDirection::Right => SystemCursorIcon::EResize,
        CursorDirection::DownRight => SystemCursorIcon::SeResize,
        CursorDirection::Down => SystemCursorIcon::SResize,
        CursorDirection::DownLeft => SystemCursorIcon::SwResize,
        CursorDirection::Left => SystemCursorIcon::WResize,
        CursorDirection::UpLeft => SystemCursorIcon::NwResize,
        CursorDirection::Default if attack_hover => SystemCursorIcon::Crosshair,
        CursorDirection::Default => SystemCursorIcon::Default,
    }
}

/// Put the edge-scroll or attack cursor on the primary window when either changes
fn update_cursor_icon(
    mut commands: Commands,
    q_window: Query<Entity, With<PrimaryWindow>>,
    edge_cursor: Res<EdgeCursor>,
    hover: Res<AttackHover>,
) {
    if !edge_cursor.is_changed() && !hover.is_changed() {
        return;
    }
    let Ok(window) = q_window.single() else { return };

    let icon = cursor_icon(edge_cursor.0, hover.0.is_some());
    trace!("Cursor icon: {:?}", icon);
    commands.entity(window).insert(CursorIcon::System(icon));
}
