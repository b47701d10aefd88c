//! OpenGL rendering: a [`GpuContext`](trigon_shader::GpuContext) over `glow`,
//! the triangle mesh and the per-frame renderer.
//!
//! # Invariants
//! - Every GL call happens on the thread that owns the current context.
//! - GPU objects are released through explicit `destroy` calls while the
//!   context is still current, never from `Drop`.

mod backend;
mod error;
mod frame;
mod gl;
mod mesh;
mod renderer;

pub use backend::RenderBackend;
pub use error::RenderError;
pub use frame::{CLEAR_COLOR, FrameUniforms, Projection, SPIN_RADIANS_PER_SECOND, model_matrix};
pub use gl::{DriverInfo, GlowContext};
pub use mesh::{GpuMesh, TRIANGLE, Vertex};
pub use renderer::TriangleRenderer;
