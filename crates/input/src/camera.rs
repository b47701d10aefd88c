use trigon_math::{Mat4, Vec3, look_at};

/// Position plus yaw/pitch in degrees.
///
/// Yaw 0 and pitch 0 look down -Z. Positive yaw turns toward +X, positive
/// pitch looks up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Heading in degrees, unbounded.
    pub yaw: f32,
    /// Elevation in degrees. The controller keeps it within [-89, 89].
    pub pitch: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl Camera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch,
        }
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(
            yaw.sin() * pitch.cos(),
            pitch.sin(),
            -yaw.cos() * pitch.cos(),
        )
    }

    /// Horizontal unit strafe direction. Ignores pitch.
    pub fn right(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.cos(), 0.0, yaw.sin())
    }

    pub fn view_matrix(&self) -> Mat4 {
        look_at(self.position, self.position + self.forward(), Vec3::Y)
    }
}
