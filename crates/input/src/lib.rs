//! First-person camera and the controller that drives it.
//!
//! Nothing here knows about a windowing library. The app translates its own
//! key and mouse events into [`MoveKey`] presses, look-button changes and
//! mouse deltas, then calls [`PlayerController::update`] once per tick.
//!
//! # Invariants
//! - Pitch stays within [-89, 89] degrees, so the view never flips.
//! - Mouse motion only turns the camera while the cursor is captured.

mod camera;
mod controller;

pub use camera::Camera;
pub use controller::{CaptureChange, MoveKey, PlayerController};
