use crate::camera::Camera;
use trigon_math::Vec2;

/// Units per second along forward/right.
pub const MOVE_SPEED: f32 = 5.0;
/// Degrees of turn per pixel of mouse motion.
pub const MOUSE_SENSITIVITY: f32 = 0.22;
pub const PITCH_LIMIT: f32 = 89.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Back,
    Left,
    Right,
}

impl MoveKey {
    fn bit(self) -> u8 {
        match self {
            Self::Forward => 1,
            Self::Back => 1 << 1,
            Self::Left => 1 << 2,
            Self::Right => 1 << 3,
        }
    }
}

/// Cursor capture transition the app must apply to its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureChange {
    Captured,
    Released,
}

/// WASD movement plus right-button mouse look.
///
/// Input is recorded as it arrives and applied in [`update`](Self::update),
/// so the camera only moves on simulation ticks.
#[derive(Debug, Default)]
pub struct PlayerController {
    held: u8,
    look_held: bool,
    captured: bool,
    pending_look: Vec2,
}

impl PlayerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&mut self, key: MoveKey, pressed: bool) {
        if pressed {
            self.held |= key.bit();
        } else {
            self.held &= !key.bit();
        }
    }

    pub fn is_held(&self, key: MoveKey) -> bool {
        self.held & key.bit() != 0
    }

    /// Right mouse button state.
    pub fn look_button(&mut self, pressed: bool) {
        self.look_held = pressed;
    }

    /// Relative mouse motion in pixels. Accumulates until the next update.
    pub fn mouse_motion(&mut self, dx: f64, dy: f64) {
        self.pending_look += Vec2::new(dx as f32, dy as f32);
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Drops held keys and the look button, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held = 0;
        self.look_held = false;
        self.pending_look = Vec2::ZERO;
    }

    /// Advances the camera by `dt` seconds of held input.
    ///
    /// Returns the capture transition, if any, that happened this tick.
    pub fn update(&mut self, dt: f32, camera: &mut Camera) -> Option<CaptureChange> {
        let step = MOVE_SPEED * dt;
        let forward = camera.forward();
        let right = camera.right();
        let axis = |positive: MoveKey, negative: MoveKey| {
            self.is_held(positive) as i8 as f32 - self.is_held(negative) as i8 as f32
        };
        camera.position += forward * (axis(MoveKey::Forward, MoveKey::Back) * step);
        camera.position += right * (axis(MoveKey::Right, MoveKey::Left) * step);

        let look = std::mem::take(&mut self.pending_look);
        let change = match (self.look_held, self.captured) {
            (true, false) => Some(CaptureChange::Captured),
            (false, true) => Some(CaptureChange::Released),
            _ => None,
        };
        self.captured = self.look_held;
        if let Some(change) = change {
            tracing::debug!(?change, "mouse capture changed");
        }

        if self.captured {
            camera.yaw += look.x * MOUSE_SENSITIVITY;
            camera.pitch = (camera.pitch - look.y * MOUSE_SENSITIVITY)
                .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
        change
    }
}
