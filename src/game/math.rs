use bevy::prelude::*;

/// Rays that run this close to parallel with the ground never hit it.
const PARALLEL_EPSILON: f32 = 0.0001;

/// Distance between two points, measured on the XZ ground plane.
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    a.xz().distance(b.xz())
}

/// Yaw (rotation about +Y) that points a -Z forward vector from `from` towards `to`.
///
/// Only the horizontal component is used so units never pitch into the ground.
/// Returns `None` when the two points overlap on the ground plane.
pub fn yaw_towards(from: Vec3, to: Vec3) -> Option<f32> {
    let delta = (to - from).xz();
    if delta.length_squared() <= f32::EPSILON {
        return None;
    }
    Some((-delta.x).atan2(-delta.y))
}

/// Intersect a ray with the y = 0 ground plane.
pub fn ray_ground_intersection(origin: Vec3, direction: Vec3) -> Option<Vec3> {
    let denom = direction.dot(Vec3::Y);
    if denom.abs() <= PARALLEL_EPSILON {
        return None;
    }
    let t = -origin.y / denom;
    if t < 0.0 {
        return None;
    }
    Some(origin + direction * t)
}

/// Distance along the ray to the closest approach of a sphere, if the ray passes within `radius`.
///
/// `direction` must be normalized. Spheres behind the ray origin are ignored.
pub fn ray_sphere_projection(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let projection = (center - origin).dot(direction);
    if projection < 0.0 {
        return None;
    }
    let closest_point = origin + direction * projection;
    if closest_point.distance_squared(center) < radius * radius {
        Some(projection)
    } else {
        None
    }
}

/// Axis-aligned rectangle in screen space, built from two drag corners in any order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenRect {
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaw_faces_target() {
        let from = Vec3::ZERO;
        for to in [Vec3::new(3.0, 0.0, 0.0), Vec3::new(-2.0, 5.0, 1.0), Vec3::new(0.0, 0.0, -4.0)] {
            let yaw = yaw_towards(from, to).unwrap();
            let forward = Quat::from_rotation_y(yaw) * Vec3::NEG_Z;
            let expected = Vec3::new(to.x, 0.0, to.z).normalize();
            assert!(forward.distance(expected) < 1e-4, "forward {forward:?} should match {expected:?}");
        }
    }

    #[test]
    fn test_yaw_ignores_height_and_overlap() {
        assert!(yaw_towards(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0)).is_none());
    }

    #[test]
    fn test_ray_ground_intersection() {
        let hit = ray_ground_intersection(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 1.0).normalize()).unwrap();
        assert!(hit.distance(Vec3::new(0.0, 0.0, 10.0)) < 1e-4);

        // Pointing up or parallel never reaches the ground
        assert!(ray_ground_intersection(Vec3::new(0.0, 10.0, 0.0), Vec3::Y).is_none());
        assert!(ray_ground_intersection(Vec3::new(0.0, 10.0, 0.0), Vec3::X).is_none());
    }

    #[test]
    fn test_ray_sphere_projection() {
        let origin = Vec3::new(0.0, 0.0, 10.0);
        let dir = Vec3::NEG_Z;
        assert_eq!(ray_sphere_projection(origin, dir, Vec3::ZERO, 1.0), Some(10.0));
        assert!(ray_sphere_projection(origin, dir, Vec3::new(2.0, 0.0, 0.0), 1.0).is_none());
        // Behind the origin
        assert!(ray_sphere_projection(origin, dir, Vec3::new(0.0, 0.0, 20.0), 1.0).is_none());
    }

    #[test]
    fn test_screen_rect_from_any_corner_order() {
        let rect = ScreenRect::from_corners(Vec2::new(100.0, 20.0), Vec2::new(10.0, 80.0));
        assert_eq!(rect.min, Vec2::new(10.0, 20.0));
        assert_eq!(rect.max, Vec2::new(100.0, 80.0));
        assert!(rect.contains(Vec2::new(10.0, 80.0)));
        assert!(!rect.contains(Vec2::new(9.9, 50.0)));
    }
}
