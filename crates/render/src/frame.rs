use trigon_input::Camera;
use trigon_math::{Mat4, Vec3, identity, perspective, rotate};

pub const CLEAR_COLOR: [f32; 4] = [0.4, 0.6, 1.0, 1.0];

pub const SPIN_RADIANS_PER_SECOND: f32 = 1.0;

/// Vertical field of view and clip planes. The aspect ratio comes from the
/// window each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clip distance, positive.
    pub near: f32,
    /// Far clip distance, beyond `near`.
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Projection {
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        perspective(self.fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }
}

/// Model spin about +Y after `seconds` of wall time.
pub fn model_matrix(seconds: f32) -> Mat4 {
    rotate(identity(), seconds * SPIN_RADIANS_PER_SECOND, Vec3::Y)
}

/// Per-frame uniform values for the triangle program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    /// Object to world, uploaded as `u_model`.
    pub model: Mat4,
    /// World to eye, uploaded as `u_view`.
    pub view: Mat4,
    /// Eye to clip, uploaded as `u_projection`.
    pub projection: Mat4,
    /// Seconds since startup, uploaded as `u_time`.
    pub time: f32,
}

impl FrameUniforms {
    /// A zero-height window (minimized) falls back to a square aspect.
    pub fn new(camera: &Camera, projection: &Projection, size: (u32, u32), time: f32) -> Self {
        let (width, height) = size;
        let aspect = if width == 0 || height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        };
        Self {
            model: model_matrix(time),
            view: camera.view_matrix(),
            projection: projection.matrix(aspect),
            time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trigon_math::{approx_eq, transform_point};

    #[test]
    fn model_starts_at_identity() {
        assert!(approx_eq(model_matrix(0.0), Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn model_spins_about_y() {
        let m = model_matrix(std::f32::consts::FRAC_PI_2 / SPIN_RADIANS_PER_SECOND);
        let p = transform_point(m, Vec3::X);
        assert!(p.abs_diff_eq(Vec3::NEG_Z, 1e-5));
        assert!(transform_point(m, Vec3::Y).abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn aspect_follows_window_size() {
        let camera = Camera::default();
        let projection = Projection::default();
        let wide = FrameUniforms::new(&camera, &projection, (1280, 720), 0.0);
        let square = FrameUniforms::new(&camera, &projection, (720, 720), 0.0);
        assert!((wide.projection.y_axis.y - square.projection.y_axis.y).abs() < 1e-6);
        assert!((square.projection.x_axis.x / wide.projection.x_axis.x - 1280.0 / 720.0).abs() < 1e-4);
    }

    #[test]
    fn minimized_window_does_not_produce_nan() {
        let uniforms = FrameUniforms::new(&Camera::default(), &Projection::default(), (800, 0), 1.0);
        assert!(uniforms.projection.is_finite());
        assert_eq!(uniforms.time, 1.0);
    }

    #[test]
    fn triangle_is_visible_from_default_camera() {
        let uniforms = FrameUniforms::new(&Camera::default(), &Projection::default(), (1280, 720), 0.0);
        let clip = uniforms.projection * uniforms.view * uniforms.model;
        let ndc = transform_point(clip, Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }
}
