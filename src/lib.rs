//! Bitmap-font text rendering on a glow context, plus the pieces the demo
//! binaries share: shader/texture/mesh wrappers, a lit textured cube and a
//! hecs-backed transform hierarchy.

pub mod abs;
pub mod config;
pub mod cube;
pub mod error;
pub mod logging;
pub mod sim;
pub mod text;

pub use error::{Error, Result};

/// Compiles and links `src/render/shaders/<name>/{vert,frag}.glsl`, embedded
/// with `include_str!`. `$path_prefix` is the invoking file's path back up to
/// `src/`. The enclosing function must return [`Result`], since compile
/// failures propagate with `?`.
#[macro_export]
macro_rules! shader_program {
    ($name:ident, $gl:expr, $path_prefix:literal) => {{
        let vert = $crate::abs::Shader::new(
            &$gl,
            glow::VERTEX_SHADER,
            include_str!(concat!(
                $path_prefix,
                "/render/shaders/",
                stringify!($name),
                "/vert.glsl"
            )),
        )?;
        let frag = $crate::abs::Shader::new(
            &$gl,
            glow::FRAGMENT_SHADER,
            include_str!(concat!(
                $path_prefix,
                "/render/shaders/",
                stringify!($name),
                "/frag.glsl"
            )),
        )?;
        $crate::abs::ShaderProgram::new(&$gl, &[&vert, &frag])
    }};
}
