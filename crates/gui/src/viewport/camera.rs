use glam::{Mat4, Vec2, Vec3, Vec4};

use super::picking::Ray;

/// Arc-ball camera for the 3D viewport
#[derive(Clone, Debug, PartialEq)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcBallCamera {
    /// Eye at (5, 5, 5) looking at the origin, 50° vertical fov
    pub fn new() -> Self {
        Self {
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: (1.0_f32 / 3.0_f32.sqrt()).asin(),
            distance: 75.0_f32.sqrt(),
            target: Vec3::ZERO,
            fov: 50.0_f32.to_radians(),
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).clamp(0.5, 500.0);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        let right = self.right_vector();
        let up = self.up_vector();
        let offset = right * dx + up * dy;
        self.target += offset;
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, 0.1, 2000.0)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    fn right_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        fwd.cross(Vec3::Y).normalize_or_zero()
    }

    fn up_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        let right = self.right_vector();
        right.cross(fwd).normalize_or_zero()
    }

    /// Project a world point to NDC. `z` is depth in [-1, 1].
    /// None when the point is behind the camera.
    pub fn project(&self, point: Vec3, aspect: f32) -> Option<Vec3> {
        let p = self.view_projection(aspect) * point.extend(1.0);
        if p.w <= 0.0 {
            return None;
        }
        Some(p.truncate() / p.w)
    }

    /// Ray from the eye through a point given in normalized device coordinates
    pub fn ndc_ray(&self, ndc: Vec2, aspect: f32) -> Ray {
        let vp_inv = self.view_projection(aspect).inverse();

        // Unproject near and far points
        let near_world = vp_inv * Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
        let far_world = vp_inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        Ray {
            origin: self.eye_position(),
            direction: (far - near).normalize_or_zero(),
        }
    }
}

/// Convert a pointer position inside a viewport rectangle to NDC
/// (`min`/`size` in the same pixel space as `pos`; y grows downward).
pub fn pointer_to_ndc(pos: Vec2, min: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(
        (pos.x - min.x) / size.x * 2.0 - 1.0,
        -((pos.y - min.y) / size.y * 2.0 - 1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_eye_position() {
        let cam = ArcBallCamera::new();
        let eye = cam.eye_position();
        assert!((eye - Vec3::splat(5.0)).length() < 1e-4, "{eye:?}");
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let cam = ArcBallCamera::new();
        let ray = cam.ndc_ray(Vec2::ZERO, 16.0 / 9.0);
        let expected = (cam.target - cam.eye_position()).normalize();
        assert!((ray.direction - expected).length() < 1e-4);
    }

    #[test]
    fn test_project_target_to_center() {
        let cam = ArcBallCamera::new();
        let ndc = cam.project(Vec3::ZERO, 1.0).unwrap();
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
    }

    #[test]
    fn test_point_behind_camera_not_projected() {
        let cam = ArcBallCamera::new();
        assert!(cam.project(Vec3::splat(20.0), 1.0).is_none());
    }

    #[test]
    fn test_pointer_to_ndc() {
        let min = Vec2::new(100.0, 50.0);
        let size = Vec2::new(400.0, 200.0);
        assert_eq!(pointer_to_ndc(Vec2::new(300.0, 150.0), min, size), Vec2::ZERO);
        assert_eq!(pointer_to_ndc(min, min, size), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_to_ndc(min + size, min, size), Vec2::new(1.0, -1.0));
    }
}
