//! GPU side of text drawing.
//!
//! [`TextRenderer`] owns the text shader program and a persistent dynamic
//! vertex buffer. Each draw call lays out one string, re-uploads the quad
//! batch and issues a single `draw_arrays`.

use std::sync::Arc;

use glam::{Vec2, Vec4};
use glow::HasContext;

use crate::abs::{ShaderProgram, Vertex};
use crate::error::{Error, Result};
use crate::text::atlas::FontAtlas;
use crate::text::batch::{layout_text, TextVertex};

/// Draws strings against a baked [`FontAtlas`].
pub struct TextRenderer {
    gl: Arc<glow::Context>,
    program: ShaderProgram,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
}

impl TextRenderer {
    /// Compiles the text shader and sets up the vertex stream.
    pub fn new(gl: &Arc<glow::Context>) -> Result<Self> {
        let program = crate::shader_program!(text, gl, "..")?;

        unsafe {
            let vao = gl.create_vertex_array().map_err(Error::Gl)?;
            let vbo = gl.create_buffer().map_err(Error::Gl)?;

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            TextVertex::vertex_attribs(gl);
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(Self {
                gl: Arc::clone(gl),
                program,
                vao,
                vbo,
            })
        }
    }

    /// Draws `text` at the pen position in the given color.
    ///
    /// The pen ends up after the last glyph, so chained calls continue on the
    /// same baseline. Expects blending to be enabled; glyph coverage comes
    /// out of the shader as alpha.
    pub fn draw(
        &self,
        atlas: &FontAtlas,
        text: &str,
        pen: &mut Vec2,
        viewport: (u32, u32),
        color: Vec4,
    ) -> Result<()> {
        let vertices = layout_text(atlas.metrics(), text, pen, viewport)?;
        if vertices.is_empty() {
            return Ok(());
        }

        self.program.use_program();
        self.program.set_uniform("u_tex", 0);
        self.program.set_uniform("u_color", color);
        atlas.bind(0);

        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                std::slice::from_raw_parts(
                    vertices.as_ptr() as *const u8,
                    vertices.len() * std::mem::size_of::<TextVertex>(),
                ),
                glow::DYNAMIC_DRAW,
            );
            self.gl
                .draw_arrays(glow::TRIANGLES, 0, vertices.len() as i32);
            self.gl.bind_vertex_array(None);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }

        Ok(())
    }
}

impl Drop for TextRenderer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_vertex_array(self.vao);
        }
    }
}
