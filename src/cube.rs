//! Textured, lit cube mesh.
//!
//! A [`Cube`] owns its mesh, texture and shader program. The geometry is the
//! classic 24-vertex unit cube, four vertices per face so each face gets flat
//! normals and a full texture quad.

use std::path::Path;
use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};
use glow::HasContext;

use crate::abs::{Mesh, ShaderProgram, Texture, Vertex};
use crate::error::{Error, Result};

/// Eye position for the default cube camera.
const CAMERA_POS: Vec3 = Vec3::new(0.0, 0.0, 3.0);
/// Point light position, co-located with the default camera.
const LIGHT_POS: Vec3 = Vec3::new(0.0, 0.0, 3.0);
const LIGHT_COLOR: Vec3 = Vec3::ONE;

/// One cube vertex: position, texture coordinate, face normal.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubeVertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

impl Vertex for CubeVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = std::mem::size_of::<CubeVertex>() as i32;
            // Position attribute
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            // UV attribute
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(
                1,
                2,
                glow::FLOAT,
                false,
                stride,
                3 * std::mem::size_of::<f32>() as i32,
            );
            // Normal attribute
            gl.enable_vertex_attrib_array(2);
            gl.vertex_attrib_pointer_f32(
                2,
                3,
                glow::FLOAT,
                false,
                stride,
                5 * std::mem::size_of::<f32>() as i32,
            );
        }
    }
}

const fn vertex(
    px: f32,
    py: f32,
    pz: f32,
    u: f32,
    v: f32,
    nx: f32,
    ny: f32,
    nz: f32,
) -> CubeVertex {
    CubeVertex {
        position: Vec3::new(px, py, pz),
        uv: Vec2::new(u, v),
        normal: Vec3::new(nx, ny, nz),
    }
}

#[rustfmt::skip]
const CUBE_VERTICES: [CubeVertex; 24] = [
    // Front
    vertex(-0.5, -0.5,  0.5,  0.0, 0.0,  0.0,  0.0,  1.0),
    vertex( 0.5, -0.5,  0.5,  1.0, 0.0,  0.0,  0.0,  1.0),
    vertex( 0.5,  0.5,  0.5,  1.0, 1.0,  0.0,  0.0,  1.0),
    vertex(-0.5,  0.5,  0.5,  0.0, 1.0,  0.0,  0.0,  1.0),
    // Back
    vertex(-0.5, -0.5, -0.5,  0.0, 0.0,  0.0,  0.0, -1.0),
    vertex( 0.5, -0.5, -0.5,  1.0, 0.0,  0.0,  0.0, -1.0),
    vertex( 0.5,  0.5, -0.5,  1.0, 1.0,  0.0,  0.0, -1.0),
    vertex(-0.5,  0.5, -0.5,  0.0, 1.0,  0.0,  0.0, -1.0),
    // Left
    vertex(-0.5, -0.5, -0.5,  0.0, 0.0, -1.0,  0.0,  0.0),
    vertex(-0.5, -0.5,  0.5,  1.0, 0.0, -1.0,  0.0,  0.0),
    vertex(-0.5,  0.5,  0.5,  1.0, 1.0, -1.0,  0.0,  0.0),
    vertex(-0.5,  0.5, -0.5,  0.0, 1.0, -1.0,  0.0,  0.0),
    // Right
    vertex( 0.5, -0.5,  0.5,  0.0, 0.0,  1.0,  0.0,  0.0),
    vertex( 0.5, -0.5, -0.5,  1.0, 0.0,  1.0,  0.0,  0.0),
    vertex( 0.5,  0.5, -0.5,  1.0, 1.0,  1.0,  0.0,  0.0),
    vertex( 0.5,  0.5,  0.5,  0.0, 1.0,  1.0,  0.0,  0.0),
    // Top
    vertex(-0.5,  0.5,  0.5,  0.0, 0.0,  0.0,  1.0,  0.0),
    vertex( 0.5,  0.5,  0.5,  1.0, 0.0,  0.0,  1.0,  0.0),
    vertex( 0.5,  0.5, -0.5,  1.0, 1.0,  0.0,  1.0,  0.0),
    vertex(-0.5,  0.5, -0.5,  0.0, 1.0,  0.0,  1.0,  0.0),
    // Bottom
    vertex(-0.5, -0.5, -0.5,  0.0, 0.0,  0.0, -1.0,  0.0),
    vertex( 0.5, -0.5, -0.5,  1.0, 0.0,  0.0, -1.0,  0.0),
    vertex( 0.5, -0.5,  0.5,  1.0, 1.0,  0.0, -1.0,  0.0),
    vertex(-0.5, -0.5,  0.5,  0.0, 1.0,  0.0, -1.0,  0.0),
];

#[rustfmt::skip]
const CUBE_INDICES: [u32; 36] = [
    0, 1, 2,  2, 3, 0,
    4, 5, 6,  6, 7, 4,
    8, 9, 10,  10, 11, 8,
    12, 13, 14,  14, 15, 12,
    16, 17, 18,  18, 19, 16,
    20, 21, 22,  22, 23, 20,
];

/// Builds the cube model matrix from XYZ Euler angles in degrees.
pub(crate) fn model_matrix(rotation_deg: Vec3) -> Mat4 {
    Mat4::from_rotation_x(rotation_deg.x.to_radians())
        * Mat4::from_rotation_y(rotation_deg.y.to_radians())
        * Mat4::from_rotation_z(rotation_deg.z.to_radians())
}

/// A textured cube with a single point light.
pub struct Cube {
    mesh: Mesh,
    texture: Texture,
    program: ShaderProgram,
}

impl Cube {
    /// Loads the texture, uploads the mesh and compiles the cube shader.
    pub fn new(gl: &Arc<glow::Context>, texture_path: impl AsRef<Path>) -> Result<Self> {
        let image = image::open(texture_path.as_ref())
            .map_err(|_| Error::resource_not_found(texture_path.as_ref()))?;
        let texture = Texture::new(gl, &image)?;
        let mesh = Mesh::new(gl, &CUBE_VERTICES, &CUBE_INDICES, glow::TRIANGLES)?;
        let program = crate::shader_program!(cube, gl, ".")?;

        Ok(Self {
            mesh,
            texture,
            program,
        })
    }

    /// Draws the cube rotated by `rotation_deg` under the default camera.
    pub fn draw(&self, rotation_deg: Vec3, viewport: (u32, u32)) {
        let view = Mat4::look_at_rh(CAMERA_POS, Vec3::ZERO, Vec3::Y);
        let projection = projection_matrix(viewport);
        self.draw_with(model_matrix(rotation_deg), view, projection);
    }

    /// Draws the cube with caller-supplied matrices.
    ///
    /// Used by the simulation demo, which positions many cubes from entity
    /// world matrices under its own camera.
    pub fn draw_with(&self, model: Mat4, view: Mat4, projection: Mat4) {
        self.program.use_program();
        self.program.set_uniform("u_tex", 0);
        self.program.set_uniform("u_light_pos", LIGHT_POS);
        self.program.set_uniform("u_light_color", LIGHT_COLOR);
        self.program.set_uniform("u_model", model);
        self.program.set_uniform("u_view", view);
        self.program.set_uniform("u_projection", projection);

        self.texture.bind(0);
        self.mesh.draw();
    }
}

/// 45 degree perspective projection for the given viewport.
pub fn projection_matrix(viewport: (u32, u32)) -> Mat4 {
    let aspect = viewport.0 as f32 / viewport.1 as f32;
    Mat4::perspective_rh_gl(45f32.to_radians(), aspect, 0.1, 100.0)
}
