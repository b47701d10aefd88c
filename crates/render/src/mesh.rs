use crate::backend::RenderBackend;
use crate::error::RenderError;
use crate::gl::GlowContext;
use bytemuck::{Pod, Zeroable};
use glow::HasContext as _;
use std::mem::{offset_of, size_of};

/// Interleaved vertex: attribute 0 is position, attribute 1 is color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Linear RGB.
    pub color: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

/// Counter-clockwise RGB triangle centred on the origin in the XY plane.
pub const TRIANGLE: [Vertex; 3] = [
    Vertex::new([-0.5, -0.5, 0.0], [1.0, 0.0, 0.0]),
    Vertex::new([0.5, -0.5, 0.0], [0.0, 1.0, 0.0]),
    Vertex::new([0.0, 0.5, 0.0], [0.0, 0.0, 1.0]),
];

const POSITION_ATTRIB: u32 = 0;
const COLOR_ATTRIB: u32 = 1;

/// Vertex data living in a VAO/VBO pair, drawn as a triangle list.
pub struct GpuMesh {
    vao: glow::NativeVertexArray,
    vbo: glow::NativeBuffer,
    vertex_count: i32,
}

impl GpuMesh {
    pub fn upload(gpu: &GlowContext, vertices: &[Vertex]) -> Result<Self, RenderError> {
        let vertex_count = i32::try_from(vertices.len()).map_err(|_| RenderError::Allocation {
            object: "vertex buffer",
            message: format!("{} vertices exceed the GL draw range", vertices.len()),
        })?;
        let gl = gpu.gl();
        let stride = size_of::<Vertex>() as i32;

        unsafe {
            let vao = gl
                .create_vertex_array()
                .map_err(RenderError::allocation("vertex array"))?;
            let vbo = match gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(message) => {
                    gl.delete_vertex_array(vao);
                    return Err(RenderError::allocation("vertex buffer")(message));
                }
            };

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );
            gl.enable_vertex_attrib_array(POSITION_ATTRIB);
            gl.vertex_attrib_pointer_f32(
                POSITION_ATTRIB,
                3,
                glow::FLOAT,
                false,
                stride,
                offset_of!(Vertex, position) as i32,
            );
            gl.enable_vertex_attrib_array(COLOR_ATTRIB);
            gl.vertex_attrib_pointer_f32(
                COLOR_ATTRIB,
                3,
                glow::FLOAT,
                false,
                stride,
                offset_of!(Vertex, color) as i32,
            );
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            tracing::debug!(vertex_count, "uploaded mesh");
            Ok(Self {
                vao,
                vbo,
                vertex_count,
            })
        }
    }

    pub fn draw(&self, gpu: &GlowContext) {
        let gl = gpu.gl();
        unsafe {
            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(glow::TRIANGLES, 0, self.vertex_count);
            gl.bind_vertex_array(None);
        }
    }

    pub fn destroy(self, gpu: &GlowContext) {
        let gl = gpu.gl();
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
        }
    }
}

impl RenderBackend for GlowContext {
    type Mesh = GpuMesh;

    fn upload_mesh(&self, vertices: &[Vertex]) -> Result<GpuMesh, RenderError> {
        GpuMesh::upload(self, vertices)
    }

    fn draw_mesh(&self, mesh: &GpuMesh) {
        mesh.draw(self);
    }

    fn delete_mesh(&self, mesh: GpuMesh) {
        mesh.destroy(self);
    }

    fn clear(&self, color: [f32; 4]) {
        GlowContext::clear(self, color);
    }

    fn enable_depth_test(&self) {
        GlowContext::enable_depth_test(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(size_of::<Vertex>(), 24);
        assert_eq!(offset_of!(Vertex, position), 0);
        assert_eq!(offset_of!(Vertex, color), 12);
        assert_eq!(bytemuck::cast_slice::<Vertex, u8>(&TRIANGLE).len(), 72);
    }

    #[test]
    fn triangle_winds_counter_clockwise() {
        let [a, b, c] = TRIANGLE.map(|v| v.position);
        let cross_z = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
        assert!(cross_z > 0.0);
    }

    #[test]
    fn triangle_is_centred_horizontally() {
        let sum_x: f32 = TRIANGLE.iter().map(|v| v.position[0]).sum();
        assert_eq!(sum_x, 0.0);
    }
}
