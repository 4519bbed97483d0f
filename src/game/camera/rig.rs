//! Engine-free RTS camera rig.
//!
//! The rig owns a smoothed position and the target it eases towards. Input
//! from keyboard, screen edges, middle-mouse drag and the scroll wheel all push
//! the target; [`CameraRig::update`] then lerps the position after it.

use std::f32::consts::PI;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Eight-way scroll cursor shown while the pointer rests in the edge band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorDirection {
    #[default]
    Default,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

/// Cursor for a direction angle in degrees, counter-clockwise from +X (screen right, y up).
///
/// Each direction owns a 45° sector centred on its axis; Right covers [337.5°, 22.5°).
pub fn cursor_direction_from_angle(degrees: f32) -> CursorDirection {
    let angle = degrees.rem_euclid(360.0);
    match angle {
        a if !(22.5..337.5).contains(&a) => CursorDirection::Right,
        a if a < 67.5 => CursorDirection::UpRight,
        a if a < 112.5 => CursorDirection::Up,
        a if a < 157.5 => CursorDirection::UpLeft,
        a if a < 202.5 => CursorDirection::Left,
        a if a < 247.5 => CursorDirection::DownLeft,
        a if a < 292.5 => CursorDirection::Down,
        _ => CursorDirection::DownRight,
    }
}

/// Tuning for [`CameraRig`]. Lives in the hot-reloadable `GameConfig`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraRigSettings {
    pub global_speed_multiplier: f32,
    /// Higher values catch up with the target faster
    pub smoothness: f32,

    pub keyboard_speed: f32,
    pub edge_scroll_speed: f32,
    pub drag_speed: f32,
    pub zoom_speed: f32,

    pub normal_speed_multiplier: f32,
    pub fast_speed_multiplier: f32,
    /// Divides the horizontal part of the edge direction so wide screens still reach the diagonals
    pub diagonal_balance_factor: f32,
    /// Pixels from a screen edge that start edge scrolling
    pub edge_threshold: f32,

    pub enable_keyboard: bool,
    pub enable_edge_scroll: bool,
    pub enable_drag: bool,
    pub enable_zoom: bool,

    pub min_height: f32,
    pub max_height: f32,
}

impl Default for CameraRigSettings {
    fn default() -> Self {
        Self {
            global_speed_multiplier: 1.0,
            smoothness: 5.0,
            keyboard_speed: 10.0,
            edge_scroll_speed: 8.0,
            drag_speed: 12.0,
            zoom_speed: 2.0,
            normal_speed_multiplier: 1.0,
            fast_speed_multiplier: 2.0,
            diagonal_balance_factor: 1.6,
            edge_threshold: 50.0,
            enable_keyboard: true,
            enable_edge_scroll: true,
            enable_drag: true,
            enable_zoom: true,
            min_height: 5.0,
            max_height: 40.0,
        }
    }
}

/// One frame of camera input, already sampled by the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct RigInput {
    /// x = right, y = forward; each component in [-1, 1]
    pub keyboard_axis: Vec2,
    pub fast: bool,
    /// Pointer in window pixels, origin at the top-left corner
    pub cursor: Option<Vec2>,
    pub screen_size: Vec2,
    pub drag_pressed: bool,
    pub drag_held: bool,
    /// Ground point under the pointer this frame
    pub drag_ground: Option<Vec3>,
    /// Scroll wheel lines; positive zooms in
    pub scroll: f32,
}

/// Horizontal movement axes of the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigBasis {
    pub right: Vec3,
    pub forward: Vec3,
}

impl Default for RigBasis {
    fn default() -> Self {
        Self { right: Vec3::X, forward: Vec3::NEG_Z }
    }
}

impl RigBasis {
    /// Flatten a camera transform's axes onto the ground plane.
    pub fn from_transform(transform: &Transform) -> Self {
        let flat = |v: Vec3| Vec3::new(v.x, 0.0, v.z).normalize_or_zero();
        let right = flat(*transform.right());
        let mut forward = flat(*transform.forward());
        // Looking straight down leaves no horizontal forward; derive it from right
        if forward == Vec3::ZERO {
            forward = Vec3::Y.cross(right).normalize_or_zero();
        }
        Self { right, forward }
    }
}

#[derive(Debug, Clone)]
pub struct CameraRig {
    position: Vec3,
    target: Vec3,
    drag_anchor: Option<Vec3>,
    cursor: CursorDirection,
}

impl CameraRig {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            target: position,
            drag_anchor: None,
            cursor: CursorDirection::Default,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn cursor(&self) -> CursorDirection {
        self.cursor
    }

    /// Jump straight to `point`, skipping the smoothing.
    pub fn snap_to(&mut self, point: Vec3) {
        self.position = point;
        self.target = point;
        self.drag_anchor = None;
    }

    /// Snap so that a ray along `view_direction` from the current height lands on `ground`.
    pub fn look_at_ground(&mut self, ground: Vec3, view_direction: Vec3) {
        let dir = view_direction.normalize_or_zero();
        if dir.y >= -f32::EPSILON {
            self.snap_to(Vec3::new(ground.x, self.position.y, ground.z));
            return;
        }
        let t = (self.position.y - ground.y) / -dir.y;
        self.snap_to(ground - dir * t);
    }

    /// Apply one frame of input. Returns the new edge cursor when it changed.
    pub fn update(
        &mut self,
        settings: &CameraRigSettings,
        input: &RigInput,
        basis: RigBasis,
        dt: f32,
    ) -> Option<CursorDirection> {
        let speed_multiplier = if input.fast {
            settings.fast_speed_multiplier
        } else {
            settings.normal_speed_multiplier
        } * settings.global_speed_multiplier;

        if settings.enable_drag {
            self.apply_drag(settings, input, speed_multiplier, dt);
        } else {
            self.drag_anchor = None;
        }

        if settings.enable_keyboard {
            let axis = input.keyboard_axis.normalize_or_zero();
            let step = settings.keyboard_speed * speed_multiplier * dt;
            self.target += (basis.right * axis.x + basis.forward * axis.y) * step;
        }

        let cursor = if settings.enable_edge_scroll {
            self.apply_edge_scroll(settings, input, basis, speed_multiplier, dt)
        } else {
            CursorDirection::Default
        };

        if settings.enable_zoom && input.scroll != 0.0 {
            self.target.y -= input.scroll * settings.zoom_speed;
        }
        let (low, high) = (settings.min_height.min(settings.max_height), settings.max_height.max(settings.min_height));
        self.target.y = self.target.y.clamp(low, high);

        let alpha = (dt * settings.smoothness).clamp(0.0, 1.0);
        self.position = self.position.lerp(self.target, alpha);

        if cursor != self.cursor {
            self.cursor = cursor;
            Some(cursor)
        } else {
            None
        }
    }

    fn apply_drag(&mut self, settings: &CameraRigSettings, input: &RigInput, speed_multiplier: f32, dt: f32) {
        if input.drag_pressed {
            self.drag_anchor = input.drag_ground;
        }
        if !input.drag_held {
            self.drag_anchor = None;
            return;
        }
        let (Some(anchor), Some(current)) = (self.drag_anchor, input.drag_ground) else { return };
        let offset = Vec3::new(anchor.x - current.x, 0.0, anchor.z - current.z);
        self.target += offset * settings.drag_speed * speed_multiplier * dt;
    }

    fn apply_edge_scroll(
        &mut self,
        settings: &CameraRigSettings,
        input: &RigInput,
        basis: RigBasis,
        speed_multiplier: f32,
        dt: f32,
    ) -> CursorDirection {
        let Some(cursor) = input.cursor else { return CursorDirection::Default };
        let size = input.screen_size;
        let threshold = settings.edge_threshold;

        let near_horizontal_edge = cursor.x < threshold || cursor.x > size.x - threshold;
        let near_vertical_edge = cursor.y < threshold || cursor.y > size.y - threshold;
        if !(near_horizontal_edge || near_vertical_edge) {
            return CursorDirection::Default;
        }

        // Window pixels grow downwards; flip to y-up around the centre
        let from_center = Vec2::new(cursor.x - size.x / 2.0, size.y / 2.0 - cursor.y);
        let balance = if settings.diagonal_balance_factor > 0.0 { settings.diagonal_balance_factor } else { 1.0 };
        let adjusted = Vec2::new(from_center.x / balance, from_center.y).normalize_or_zero();
        if adjusted == Vec2::ZERO {
            return CursorDirection::Default;
        }

        let world_direction = (basis.right * adjusted.x + basis.forward * adjusted.y).normalize_or_zero();
        self.target += world_direction * settings.edge_scroll_speed * speed_multiplier * dt;

        let degrees = adjusted.y.atan2(adjusted.x) * 180.0 / PI;
        cursor_direction_from_angle(degrees)
    }
}
