use crate::error::RenderError;
use crate::mesh::Vertex;
use trigon_shader::GpuContext;

/// What the frame renderer needs beyond shader programs: framebuffer
/// clearing and mesh storage.
pub trait RenderBackend: GpuContext {
    /// A mesh resident on the GPU.
    type Mesh;

    fn upload_mesh(&self, vertices: &[Vertex]) -> Result<Self::Mesh, RenderError>;

    fn draw_mesh(&self, mesh: &Self::Mesh);

    fn delete_mesh(&self, mesh: Self::Mesh);

    /// Clears color and depth.
    fn clear(&self, color: [f32; 4]);

    fn enable_depth_test(&self);
}
