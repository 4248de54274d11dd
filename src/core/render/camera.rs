//=========================================================================
// Perspective Camera
//=========================================================================
//
// View and projection matrices plus NDC → world ray unprojection.
//
// Conventions (right-handed, OpenGL clip space):
//   NDC x: -1 left .. +1 right
//   NDC y: -1 bottom .. +1 top
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Mat4, Vec2, Vec3};

//=== Internal Dependencies ===============================================

use super::geometry::Ray;

//=== PerspectiveCamera ===================================================

/// Pinhole camera looking from `position` toward `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl PerspectiveCamera {
    /// Creates a camera at the origin looking down -Z.
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_degrees,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Points the camera at `target`.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through an NDC point.
    ///
    /// Returns `None` when the camera matrices are degenerate (e.g.
    /// position equals target) or the NDC point is not finite.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray> {
        if !ndc.is_finite() {
            return None;
        }

        let view_projection = self.view_projection();
        if !view_projection.is_finite() || view_projection.determinant().abs() <= f32::EPSILON * f32::EPSILON {
            return None;
        }

        let inverse = view_projection.inverse();
        let near_point = inverse.project_point3(Vec3::new(ndc.x, ndc.y, -1.0));
        let far_point = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));

        Ray::new(self.position, far_point - near_point)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn showroom_camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(70.0, 1.0, 0.01, 100.0).with_position(Vec3::new(0.0, 4.0, 10.0));
        camera.look_at(Vec3::ZERO);
        camera
    }

    #[test]
    fn center_ray_points_at_target() {
        let camera = showroom_camera();
        let ray = camera.ray_from_ndc(Vec2::ZERO).unwrap();

        let expected = (Vec3::ZERO - camera.position).normalize();
        assert_relative_eq!(ray.direction.x, expected.x, epsilon = 1e-4);
        assert_relative_eq!(ray.direction.y, expected.y, epsilon = 1e-4);
        assert_relative_eq!(ray.direction.z, expected.z, epsilon = 1e-4);
        assert_eq!(ray.origin, camera.position);
    }

    #[test]
    fn right_edge_ray_leans_right() {
        let camera = showroom_camera();
        let ray = camera.ray_from_ndc(Vec2::new(1.0, 0.0)).unwrap();
        assert!(ray.direction.x > 0.0);
    }

    #[test]
    fn top_edge_ray_leans_up() {
        let camera = showroom_camera();
        let center = camera.ray_from_ndc(Vec2::ZERO).unwrap();
        let top = camera.ray_from_ndc(Vec2::new(0.0, 1.0)).unwrap();
        assert!(top.direction.y > center.direction.y);
    }

    #[test]
    fn degenerate_camera_yields_no_ray() {
        let mut camera = PerspectiveCamera::new(70.0, 1.0, 0.01, 100.0);
        camera.look_at(camera.position);
        assert!(camera.ray_from_ndc(Vec2::ZERO).is_none());
    }

    #[test]
    fn non_finite_ndc_yields_no_ray() {
        let camera = showroom_camera();
        assert!(camera.ray_from_ndc(Vec2::new(f32::NAN, 0.0)).is_none());
    }
}
