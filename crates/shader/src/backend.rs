use glam::{Mat4, Vec2, Vec3, Vec4};
use std::fmt;

/// Programmable pipeline stage a source file is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// A value that can be uploaded to a uniform location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<Vec2> for UniformValue {
    fn from(value: Vec2) -> Self {
        Self::Vec2(value)
    }
}

impl From<Vec3> for UniformValue {
    fn from(value: Vec3) -> Self {
        Self::Vec3(value)
    }
}

impl From<Vec4> for UniformValue {
    fn from(value: Vec4) -> Self {
        Self::Vec4(value)
    }
}

impl From<Mat4> for UniformValue {
    fn from(value: Mat4) -> Self {
        Self::Mat4(value)
    }
}

/// The slice of a graphics context the shader cache needs.
///
/// Implementations wrap a live driver context (see `trigon-render`) or a
/// recording mock. Methods take `&self` because the underlying APIs mutate
/// driver state, not Rust state.
pub trait GpuContext {
    /// A compiled, not yet linked, stage object.
    type Stage: Copy;
    /// A linked program object.
    type Program: Copy + PartialEq + fmt::Debug;
    /// A resolved uniform location within one program.
    type Location: Clone + fmt::Debug;

    /// Compiles `source` for `stage`. On failure the stage object is already
    /// released and the error carries the compiler log.
    fn compile_stage(&self, stage: ShaderStage, source: &str) -> Result<Self::Stage, String>;

    /// Links two compiled stages into a program. On failure the program object
    /// is already released and the error carries the linker log. The stages
    /// stay owned by the caller either way.
    fn link_program(
        &self,
        vertex: Self::Stage,
        fragment: Self::Stage,
    ) -> Result<Self::Program, String>;

    fn delete_stage(&self, stage: Self::Stage);

    fn delete_program(&self, program: Self::Program);

    /// Makes `program` the active program, or clears it with `None`.
    fn use_program(&self, program: Option<Self::Program>);

    /// `None` when the program has no active uniform of that name.
    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::Location>;

    /// Uploads to a location of the currently active program.
    fn upload_uniform(&self, location: &Self::Location, value: UniformValue);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_display_names() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }

    #[test]
    fn uniform_values_convert_from_glam() {
        assert_eq!(UniformValue::from(1.5_f32), UniformValue::Float(1.5));
        assert_eq!(UniformValue::from(3_i32), UniformValue::Int(3));
        assert_eq!(
            UniformValue::from(Mat4::IDENTITY),
            UniformValue::Mat4(Mat4::IDENTITY)
        );
        assert!(matches!(
            UniformValue::from(Vec3::ONE),
            UniformValue::Vec3(v) if v == Vec3::ONE
        ));
    }
}
