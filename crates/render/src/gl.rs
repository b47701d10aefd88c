use glow::HasContext as _;
use std::ffi::{CStr, c_void};
use std::fmt;
use trigon_shader::{GpuContext, ShaderStage, UniformValue};

/// Driver identification strings, queried once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverInfo {
    /// `GL_VERSION`.
    pub version: String,
    /// `GL_SHADING_LANGUAGE_VERSION`.
    pub shading_language: String,
    /// `GL_RENDERER`.
    pub renderer: String,
    /// `GL_VENDOR`.
    pub vendor: String,
}

impl fmt::Display for DriverInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OpenGL {} / GLSL {} ({}, {})",
            self.version, self.shading_language, self.renderer, self.vendor
        )
    }
}

/// A current OpenGL context, usable as the shader cache's [`GpuContext`].
pub struct GlowContext {
    gl: glow::Context,
}

impl GlowContext {
    pub fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    /// Loads GL entry points through the windowing layer's proc-address hook.
    ///
    /// # Safety
    /// A GL context must be current on this thread, and `loader` must return
    /// valid function pointers for it.
    pub unsafe fn from_loader<F>(loader: F) -> Self
    where
        F: FnMut(&CStr) -> *const c_void,
    {
        let gl = unsafe { glow::Context::from_loader_function_cstr(loader) };
        Self::new(gl)
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    pub fn driver_info(&self) -> DriverInfo {
        unsafe {
            DriverInfo {
                version: self.gl.get_parameter_string(glow::VERSION),
                shading_language: self.gl.get_parameter_string(glow::SHADING_LANGUAGE_VERSION),
                renderer: self.gl.get_parameter_string(glow::RENDERER),
                vendor: self.gl.get_parameter_string(glow::VENDOR),
            }
        }
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        let clamp = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
        unsafe { self.gl.viewport(0, 0, clamp(width), clamp(height)) };
    }

    pub fn clear(&self, color: [f32; 4]) {
        let [r, g, b, a] = color;
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    pub fn enable_depth_test(&self) {
        unsafe { self.gl.enable(glow::DEPTH_TEST) };
    }
}

fn stage_kind(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

impl GpuContext for GlowContext {
    type Stage = glow::NativeShader;
    type Program = glow::NativeProgram;
    type Location = glow::NativeUniformLocation;

    fn compile_stage(&self, stage: ShaderStage, source: &str) -> Result<Self::Stage, String> {
        let gl = &self.gl;
        unsafe {
            let shader = gl.create_shader(stage_kind(stage))?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);
            if gl.get_shader_compile_status(shader) {
                Ok(shader)
            } else {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                Err(log)
            }
        }
    }

    fn link_program(
        &self,
        vertex: Self::Stage,
        fragment: Self::Stage,
    ) -> Result<Self::Program, String> {
        let gl = &self.gl;
        unsafe {
            let program = gl.create_program()?;
            gl.attach_shader(program, vertex);
            gl.attach_shader(program, fragment);
            gl.link_program(program);
            gl.detach_shader(program, vertex);
            gl.detach_shader(program, fragment);
            if gl.get_program_link_status(program) {
                Ok(program)
            } else {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                Err(log)
            }
        }
    }

    fn delete_stage(&self, stage: Self::Stage) {
        unsafe { self.gl.delete_shader(stage) };
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) };
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) };
    }

    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::Location> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn upload_uniform(&self, location: &Self::Location, value: UniformValue) {
        let gl = &self.gl;
        let location = Some(location);
        unsafe {
            match value {
                UniformValue::Float(v) => gl.uniform_1_f32(location, v),
                UniformValue::Int(v) => gl.uniform_1_i32(location, v),
                UniformValue::Vec2(v) => gl.uniform_2_f32(location, v.x, v.y),
                UniformValue::Vec3(v) => gl.uniform_3_f32(location, v.x, v.y, v.z),
                UniformValue::Vec4(v) => gl.uniform_4_f32(location, v.x, v.y, v.z, v.w),
                UniformValue::Mat4(m) => {
                    gl.uniform_matrix_4_f32_slice(location, false, &m.to_cols_array())
                }
            }
        }
    }
}
