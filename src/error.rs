//! Error categories shared across the crate.
//!
//! Every failure is detected where it occurs and surfaced immediately through
//! [`Result`]; there is no retry and no partial-success state. A failed
//! initialization step must stop the demo before any rendering happens.

use std::path::{Path, PathBuf};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All failure modes of the font, cube and windowing layers.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A font or texture file does not exist or could not be opened.
    #[error("resource not found: {}", path.display())]
    ResourceNotFound { path: PathBuf },

    /// A font file exceeds the fixed size limit. The file is rejected
    /// outright instead of being baked from a truncated prefix.
    #[error("resource too large: {} is {len} bytes, limit is {max}", path.display())]
    OversizedResource { path: PathBuf, len: u64, max: u64 },

    /// The font file was read but could not be parsed.
    #[error("invalid font data: {0}")]
    InvalidFont(String),

    /// The glyph set does not fit the fixed atlas bitmap at the requested
    /// pixel size.
    #[error("glyphs at {size_px}px do not fit the {atlas_size}x{atlas_size} atlas")]
    AtlasOverflow { size_px: f32, atlas_size: u32 },

    /// Host allocation failure for bitmap or vertex storage.
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    /// Shader compilation or program linking failed; carries the driver's
    /// info log. Fatal for that program, detected once at setup time.
    #[error("shader compile/link failure: {0}")]
    CompileOrLinkFailure(String),

    /// More text in a single call than the fixed vertex batch can hold.
    #[error("batch capacity exceeded: {glyphs} glyphs, limit is {max}")]
    BatchCapacityExceeded { glyphs: usize, max: usize },

    /// A config file exists but does not parse.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// GL object creation (texture, buffer, vertex array) failed.
    #[error("gl resource error: {0}")]
    Gl(String),

    /// SDL initialization, window or context creation failed.
    #[error("sdl error: {0}")]
    Sdl(String),
}

impl Error {
    pub(crate) fn resource_not_found(path: &Path) -> Self {
        Self::ResourceNotFound { path: path.to_path_buf() }
    }

    pub(crate) fn oversized_resource(path: &Path, len: u64, max: u64) -> Self {
        Self::OversizedResource { path: path.to_path_buf(), len, max }
    }

    pub(crate) fn out_of_memory(what: &str) -> Self {
        Self::OutOfMemory(what.to_string())
    }

    pub(crate) fn sdl(detail: impl ToString) -> Self {
        Self::Sdl(detail.to_string())
    }
}
