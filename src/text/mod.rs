//! Bitmap-font text rendering.
//!
//! The pipeline has three stages: [`atlas`] bakes a font into a glyph
//! coverage texture once at startup, [`batch`] turns strings into clip-space
//! quad batches every frame, and [`renderer`] uploads and draws them.

pub mod atlas;
pub mod batch;
pub mod renderer;

pub use atlas::*;
pub use batch::*;
pub use renderer::*;
