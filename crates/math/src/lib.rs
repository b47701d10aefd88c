//! Transform math: the matrices that take object-local coordinates to clip space.
//!
//! Value types come from `glam` (`Vec3`, column-major `Mat4`). Everything in
//! this crate is a free function over those values; there is no hidden state.
//!
//! # Invariants
//! - Every function is pure and allocation-free.
//! - Composition helpers multiply the accumulated matrix on the right:
//!   `translate(m, v) == m * T(v)`.
//! - There is no error channel. Degenerate input (zero-length forward vector,
//!   `near <= 0`) is a precondition violation the caller must rule out.

mod transform;

pub use glam::{Mat4, Vec2, Vec3, Vec4};
pub use transform::{
    approx_eq, identity, look_at, multiply, perspective, rotate, scale, transform_point,
    translate,
};

/// Default tolerance for comparing matrices built from `f32` trigonometry.
pub const EPSILON: f32 = 1e-5;
