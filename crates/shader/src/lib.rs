//! Shader program cache: one compiled-and-linked GPU program with a name-based
//! uniform interface and polling hot reload.
//!
//! The crate never talks to a graphics driver directly. Everything GPU-side
//! goes through [`GpuContext`], passed explicitly to each call, and all file
//! access goes through a [`SourceLoader`]. Both can be replaced in tests.
//!
//! # Invariants
//! - A program handle and its uniform-location cache are replaced together;
//!   no cached location ever outlives the program it was resolved against.
//! - A failed load leaves the previous program installed and usable.
//! - The old program is released only after its replacement is installed.

mod backend;
mod program;
mod source;

#[cfg(test)]
mod mock;

pub use backend::{GpuContext, ShaderStage, UniformValue};
pub use program::{ProgramState, ReloadStatus, ShaderError, ShaderProgram};
pub use source::{FsSourceLoader, MemorySourceLoader, SourceLoader, SourcePaths};
