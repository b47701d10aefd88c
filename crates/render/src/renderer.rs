use crate::backend::RenderBackend;
use crate::error::RenderError;
use crate::frame::{CLEAR_COLOR, FrameUniforms};
use crate::gl::GlowContext;
use crate::mesh::TRIANGLE;
use std::path::Path;
use trigon_shader::{FsSourceLoader, ReloadStatus, ShaderProgram, SourceLoader};

/// Draws the colored triangle with a hot-reloadable shader program.
pub struct TriangleRenderer<G: RenderBackend = GlowContext, L: SourceLoader = FsSourceLoader> {
    program: ShaderProgram<G, L>,
    mesh: G::Mesh,
}

impl<G: RenderBackend> TriangleRenderer<G> {
    /// Builds the program from files on disk and uploads the mesh. Any
    /// failure here is fatal: there is no previous program to fall back to.
    pub fn new(gpu: &G, vertex: &Path, fragment: &Path) -> Result<Self, RenderError> {
        let program = ShaderProgram::from_files(gpu, vertex, fragment)?;
        Self::with_program(gpu, program)
    }
}

impl<G: RenderBackend, L: SourceLoader> TriangleRenderer<G, L> {
    /// Takes an already loaded program and uploads the mesh.
    pub fn with_program(gpu: &G, program: ShaderProgram<G, L>) -> Result<Self, RenderError> {
        let mesh = match gpu.upload_mesh(&TRIANGLE) {
            Ok(mesh) => mesh,
            Err(err) => {
                program.destroy(gpu);
                return Err(err);
            }
        };
        gpu.enable_depth_test();
        Ok(Self { program, mesh })
    }

    /// Polls for shader edits, then draws one frame.
    pub fn render(&mut self, gpu: &G, uniforms: &FrameUniforms) -> ReloadStatus {
        let status = self.program.reload_if_changed(gpu);
        gpu.clear(CLEAR_COLOR);
        if let Err(err) = self.draw(gpu, uniforms) {
            tracing::warn!("skipping draw: {err}");
        }
        self.program.unbind(gpu);
        status
    }

    fn draw(&mut self, gpu: &G, uniforms: &FrameUniforms) -> Result<(), RenderError> {
        self.program.bind(gpu)?;
        self.program.set_uniform(gpu, "u_model", uniforms.model)?;
        self.program.set_uniform(gpu, "u_view", uniforms.view)?;
        self.program.set_uniform(gpu, "u_projection", uniforms.projection)?;
        self.program.set_uniform(gpu, "u_time", uniforms.time)?;
        gpu.draw_mesh(&self.mesh);
        Ok(())
    }

    pub fn destroy(self, gpu: &G) {
        gpu.delete_mesh(self.mesh);
        self.program.destroy(gpu);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Projection;
    use std::cell::{Cell, RefCell};
    use trigon_input::Camera;
    use trigon_shader::{GpuContext, MemorySourceLoader, ShaderStage, UniformValue};

    const VERT: &str = "#version 330 core\nvoid main() {}\n";
    const FRAG: &str = "#version 330 core\nvoid main() {}\n";

    /// Logs every backend call in order. Any source containing `broken`
    /// fails to compile.
    #[derive(Default)]
    struct CallLog {
        calls: RefCell<Vec<String>>,
        next_id: Cell<u32>,
    }

    impl CallLog {
        fn push(&self, call: impl Into<String>) {
            self.calls.borrow_mut().push(call.into());
        }

        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.calls.borrow_mut())
        }

        fn allocate(&self) -> u32 {
            self.next_id.set(self.next_id.get() + 1);
            self.next_id.get()
        }
    }

    impl GpuContext for CallLog {
        type Stage = u32;
        type Program = u32;
        type Location = String;

        fn compile_stage(&self, stage: ShaderStage, source: &str) -> Result<u32, String> {
            self.push(format!("compile {stage}"));
            if source.contains("broken") {
                return Err(String::from("syntax error"));
            }
            Ok(self.allocate())
        }

        fn link_program(&self, _vertex: u32, _fragment: u32) -> Result<u32, String> {
            let id = self.allocate();
            self.push(format!("link {id}"));
            Ok(id)
        }

        fn delete_stage(&self, _stage: u32) {}

        fn delete_program(&self, program: u32) {
            self.push(format!("delete program {program}"));
        }

        fn use_program(&self, program: Option<u32>) {
            match program {
                Some(id) => self.push(format!("use {id}")),
                None => self.push("use none"),
            }
        }

        fn uniform_location(&self, _program: u32, name: &str) -> Option<String> {
            Some(name.to_owned())
        }

        fn upload_uniform(&self, location: &String, _value: UniformValue) {
            self.push(format!("uniform {location}"));
        }
    }

    impl RenderBackend for CallLog {
        type Mesh = usize;

        fn upload_mesh(&self, vertices: &[crate::mesh::Vertex]) -> Result<usize, RenderError> {
            self.push("upload mesh");
            Ok(vertices.len())
        }

        fn draw_mesh(&self, mesh: &usize) {
            self.push(format!("draw {mesh}"));
        }

        fn delete_mesh(&self, _mesh: usize) {
            self.push("delete mesh");
        }

        fn clear(&self, _color: [f32; 4]) {
            self.push("clear");
        }

        fn enable_depth_test(&self) {
            self.push("depth test");
        }
    }

    fn renderer<'a>(
        gpu: &CallLog,
        files: &'a MemorySourceLoader,
    ) -> TriangleRenderer<CallLog, &'a MemorySourceLoader> {
        let mut program = ShaderProgram::with_loader(files);
        program.load(gpu, "tri.vert", "tri.frag").unwrap();
        let renderer = TriangleRenderer::with_program(gpu, program).unwrap();
        gpu.take();
        renderer
    }

    fn sources() -> MemorySourceLoader {
        let files = MemorySourceLoader::new();
        files.write("tri.vert", VERT);
        files.write("tri.frag", FRAG);
        files
    }

    fn uniforms() -> FrameUniforms {
        FrameUniforms::new(&Camera::default(), &Projection::default(), (640, 480), 0.5)
    }

    #[test]
    fn construction_uploads_mesh_and_enables_depth() {
        let gpu = CallLog::default();
        let files = sources();
        let mut program = ShaderProgram::with_loader(&files);
        program.load(&gpu, "tri.vert", "tri.frag").unwrap();
        gpu.take();

        let _renderer = TriangleRenderer::with_program(&gpu, program).unwrap();
        assert_eq!(gpu.take(), ["upload mesh", "depth test"]);
    }

    #[test]
    fn frame_runs_in_order() {
        let gpu = CallLog::default();
        let files = sources();
        let mut renderer = renderer(&gpu, &files);

        let status = renderer.render(&gpu, &uniforms());
        assert!(matches!(status, ReloadStatus::Unchanged));
        assert_eq!(
            gpu.take(),
            [
                "clear",
                "use 3",
                "uniform u_model",
                "uniform u_view",
                "uniform u_projection",
                "uniform u_time",
                "draw 3",
                "use none",
            ]
        );
    }

    #[test]
    fn reload_happens_before_clear() {
        let gpu = CallLog::default();
        let files = sources();
        let mut renderer = renderer(&gpu, &files);
        files.touch("tri.frag");

        let status = renderer.render(&gpu, &uniforms());
        assert!(matches!(status, ReloadStatus::Reloaded));
        let calls = gpu.take();
        assert_eq!(
            &calls[..5],
            [
                "compile vertex",
                "compile fragment",
                "link 6",
                "delete program 3",
                "clear",
            ]
        );
        assert_eq!(calls[5], "use 6");
    }

    #[test]
    fn failed_reload_still_draws_previous_program() {
        let gpu = CallLog::default();
        let files = sources();
        let mut renderer = renderer(&gpu, &files);
        files.write("tri.vert", "broken");

        let status = renderer.render(&gpu, &uniforms());
        assert!(matches!(status, ReloadStatus::Failed(_)));
        let calls = gpu.take();
        assert_eq!(calls[0], "compile vertex");
        assert_eq!(calls[1], "clear");
        assert_eq!(calls[2], "use 3");
        assert!(calls.contains(&String::from("draw 3")));
        assert_eq!(calls.last().map(String::as_str), Some("use none"));
    }

    #[test]
    fn destroy_releases_mesh_and_program() {
        let gpu = CallLog::default();
        let files = sources();
        let renderer = renderer(&gpu, &files);

        renderer.destroy(&gpu);
        assert_eq!(gpu.take(), ["delete mesh", "delete program 3"]);
    }
}
