//! Glyph atlas baking.
//!
//! A [`FontAtlas`] rasterizes the printable ASCII range once at a fixed pixel
//! size into a single-channel bitmap, uploads it as a coverage texture and
//! keeps the per-glyph placement table around for layout.

use std::path::Path;
use std::sync::Arc;

use crate::abs::Texture;
use crate::error::{Error, Result};

/// Width and height of the atlas bitmap in pixels.
pub const ATLAS_SIZE: u32 = 512;
/// First character baked into the atlas (space).
pub const FIRST_CHAR: u32 = 32;
/// Number of consecutive characters baked, covering ASCII 32..128.
pub const GLYPH_COUNT: usize = 96;
/// Largest font file accepted, in bytes. Larger files are rejected rather
/// than baked from a truncated prefix.
pub const MAX_FONT_FILE_SIZE: u64 = 1 << 20;

/// Placement and layout data for one baked glyph.
///
/// `x0..y1` is the glyph's pixel box inside the atlas. `xoff`/`yoff` position
/// that box relative to the pen (y down, so `yoff` is negative for glyphs
/// that rise above the baseline), and `xadvance` is how far the pen moves
/// after the glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlyphMetrics {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
    pub xoff: f32,
    pub yoff: f32,
    pub xadvance: f32,
}

/// Row-by-row packer for the atlas bitmap.
///
/// Glyphs are placed left to right with a one pixel gap, wrapping to a new
/// row under the tallest glyph seen so far. Returns `None` once a glyph no
/// longer fits the bitmap.
struct ShelfPacker {
    x: u32,
    y: u32,
    bottom_y: u32,
}

impl ShelfPacker {
    fn new() -> Self {
        Self {
            x: 1,
            y: 1,
            bottom_y: 1,
        }
    }

    fn place(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        if self.x + width + 1 >= ATLAS_SIZE {
            self.x = 1;
            self.y = self.bottom_y;
        }
        // Re-check the width after a wrap: a glyph wider than the row itself
        // must fail rather than bleed across the bitmap edge.
        if self.x + width + 1 >= ATLAS_SIZE || self.y + height + 1 >= ATLAS_SIZE {
            return None;
        }
        let position = (self.x, self.y);
        self.x += width + 1;
        self.bottom_y = self.bottom_y.max(self.y + height + 1);
        Some(position)
    }
}

/// The CPU side of a baked atlas: glyph table plus line spacing.
///
/// Owns no GPU state, so layout and the tests for it run without a GL
/// context.
#[derive(Clone, Debug)]
pub struct AtlasMetrics {
    line_height: f32,
    glyphs: [GlyphMetrics; GLYPH_COUNT],
}

impl AtlasMetrics {
    pub(crate) fn new(line_height: f32, glyphs: [GlyphMetrics; GLYPH_COUNT]) -> Self {
        Self {
            line_height,
            glyphs,
        }
    }

    /// Rasterizes the ASCII range at `size_px * scale` and packs it into a
    /// fresh atlas bitmap.
    ///
    /// `scale` is the display content-scale factor, so text stays legible on
    /// high-density screens. Returns the glyph table together with the
    /// `ATLAS_SIZE` squared coverage bitmap, one byte per pixel. Fails with
    /// [`Error::AtlasOverflow`] when the glyphs do not fit, which means the
    /// effective pixel size is too large for the fixed bitmap.
    pub fn bake(font: &fontdue::Font, size_px: f32, scale: f32) -> Result<(Self, Vec<u8>)> {
        debug_assert!(size_px > 0.0);
        debug_assert!(scale > 0.0);
        let size_px = size_px * scale;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact((ATLAS_SIZE * ATLAS_SIZE) as usize)
            .map_err(|_| Error::out_of_memory("atlas bitmap"))?;
        pixels.resize((ATLAS_SIZE * ATLAS_SIZE) as usize, 0);

        let mut glyphs = [GlyphMetrics::default(); GLYPH_COUNT];
        let mut packer = ShelfPacker::new();

        for (i, slot) in glyphs.iter_mut().enumerate() {
            let c = (FIRST_CHAR as u8 + i as u8) as char;
            let (metrics, coverage) = font.rasterize(c, size_px);
            let width = metrics.width as u32;
            let height = metrics.height as u32;

            let (x, y) = packer.place(width, height).ok_or(Error::AtlasOverflow {
                size_px,
                atlas_size: ATLAS_SIZE,
            })?;

            for row in 0..metrics.height {
                let dst = (y as usize + row) * ATLAS_SIZE as usize + x as usize;
                pixels[dst..dst + metrics.width]
                    .copy_from_slice(&coverage[row * metrics.width..(row + 1) * metrics.width]);
            }

            // Rasterizer offsets are y up from the baseline; flip them into
            // the pen's y-down space.
            *slot = GlyphMetrics {
                x0: x as u16,
                y0: y as u16,
                x1: (x + width) as u16,
                y1: (y + height) as u16,
                xoff: metrics.xmin as f32,
                yoff: -(metrics.ymin as f32 + metrics.height as f32),
                xadvance: metrics.advance_width,
            };
        }

        let line_height = font
            .horizontal_line_metrics(size_px)
            .map(|line| line.new_line_size)
            .unwrap_or(size_px);

        Ok((Self::new(line_height, glyphs), pixels))
    }

    /// Returns the baked glyph for `c`, or `None` for characters outside the
    /// atlas range.
    pub fn glyph(&self, c: char) -> Option<&GlyphMetrics> {
        let index = (c as u32).checked_sub(FIRST_CHAR)? as usize;
        self.glyphs.get(index)
    }

    /// Baseline-to-baseline distance in pixels.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }
}

/// Parses font bytes, mapping parse failures to [`Error::InvalidFont`].
pub(crate) fn load_font(data: &[u8]) -> Result<fontdue::Font> {
    fontdue::Font::from_bytes(data, fontdue::FontSettings::default())
        .map_err(|e| Error::InvalidFont(e.to_string()))
}

/// Reads a font file whole, enforcing [`MAX_FONT_FILE_SIZE`].
///
/// Any failure to open or read the file surfaces as
/// [`Error::ResourceNotFound`]; an over-limit file is
/// [`Error::OversizedResource`] with the actual length.
pub fn read_font_file(path: &Path) -> Result<Vec<u8>> {
    use std::io::Read;

    let mut file = std::fs::File::open(path).map_err(|_| Error::resource_not_found(path))?;
    let len = file
        .metadata()
        .map_err(|_| Error::resource_not_found(path))?
        .len();
    if len > MAX_FONT_FILE_SIZE {
        return Err(Error::oversized_resource(path, len, MAX_FONT_FILE_SIZE));
    }

    let mut data = Vec::new();
    data.try_reserve_exact(len as usize)
        .map_err(|_| Error::out_of_memory("font file buffer"))?;
    file.read_to_end(&mut data)
        .map_err(|_| Error::resource_not_found(path))?;
    Ok(data)
}

/// A baked glyph atlas: the coverage texture on the GPU plus the metrics
/// needed to lay text out against it.
pub struct FontAtlas {
    texture: Texture,
    metrics: AtlasMetrics,
}

impl FontAtlas {
    /// Bakes an atlas from a font file on disk at `size_px` scaled by the
    /// display content-scale factor.
    pub fn from_file(
        gl: &Arc<glow::Context>,
        path: impl AsRef<Path>,
        size_px: f32,
        scale: f32,
    ) -> Result<Self> {
        let data = read_font_file(path.as_ref())?;
        Self::from_bytes(gl, &data, size_px, scale)
    }

    /// Bakes an atlas from in-memory font data.
    ///
    /// The CPU bitmap only lives for the duration of this call; after the
    /// texture upload the atlas keeps the metrics table alone.
    pub fn from_bytes(
        gl: &Arc<glow::Context>,
        data: &[u8],
        size_px: f32,
        scale: f32,
    ) -> Result<Self> {
        let font = load_font(data)?;
        let (metrics, pixels) = AtlasMetrics::bake(&font, size_px, scale)?;
        let texture = Texture::new_coverage(gl, ATLAS_SIZE, ATLAS_SIZE, &pixels)?;
        Ok(Self { texture, metrics })
    }

    /// Binds the atlas texture to the given texture unit.
    pub fn bind(&self, unit: u32) {
        self.texture.bind(unit);
    }

    /// The glyph table for layout.
    pub fn metrics(&self) -> &AtlasMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shelf_packer_places_with_gap() {
        let mut packer = ShelfPacker::new();
        assert_eq!(packer.place(10, 12), Some((1, 1)));
        // One pixel gap after the previous glyph.
        assert_eq!(packer.place(10, 12), Some((12, 1)));
        assert_eq!(packer.place(0, 0), Some((23, 1)));
    }

    #[test]
    fn test_shelf_packer_wraps_under_tallest_glyph() {
        let mut packer = ShelfPacker::new();
        packer.place(100, 30).unwrap();
        packer.place(100, 10).unwrap();
        // 1 + 100 + 1 + 100 + 1 + 400 + 1 >= 512, so this wraps.
        let (x, y) = packer.place(400, 10).unwrap();
        assert_eq!(x, 1);
        assert_eq!(y, 1 + 30 + 1);
    }

    #[test]
    fn test_shelf_packer_rejects_overfull_atlas() {
        let mut packer = ShelfPacker::new();
        // Each row fits one 400-wide glyph; 200-tall rows run out quickly.
        for _ in 0..2 {
            assert!(packer.place(400, 200).is_some());
        }
        assert_eq!(packer.place(400, 200), None);
    }

    #[test]
    fn test_shelf_packer_rejects_oversized_glyph() {
        let mut packer = ShelfPacker::new();
        assert_eq!(packer.place(10, ATLAS_SIZE), None);
    }

    #[test]
    fn test_shelf_packer_rejects_glyph_wider_than_atlas() {
        let mut packer = ShelfPacker::new();
        // Wrapping to a fresh row cannot make room for this one.
        assert_eq!(packer.place(600, 10), None);
        // Widest glyph a row can hold, given the one pixel gaps.
        assert_eq!(packer.place(ATLAS_SIZE - 3, 10), Some((1, 1)));
        assert_eq!(packer.place(ATLAS_SIZE - 2, 10), None);
    }

    #[test]
    fn test_glyph_lookup_bounds() {
        let metrics = AtlasMetrics::new(19.0, [GlyphMetrics::default(); GLYPH_COUNT]);
        assert!(metrics.glyph(' ').is_some());
        assert!(metrics.glyph('~').is_some());
        assert!(metrics.glyph('\x1f').is_none());
        assert!(metrics.glyph('\u{80}').is_none());
        assert!(metrics.glyph('\n').is_none());
    }

    #[test]
    fn test_load_font_rejects_garbage() {
        let err = load_font(b"definitely not a font").unwrap_err();
        assert!(matches!(err, Error::InvalidFont(_)));
    }

    #[test]
    fn test_read_font_file_missing() {
        let path = Path::new("/nonexistent/fonts/missing.ttf");
        let err = read_font_file(path).unwrap_err();
        match err {
            Error::ResourceNotFound { path: p } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_font_file_rejects_oversized() {
        let path = std::env::temp_dir().join("glyphquad_oversized_font_test.ttf");
        std::fs::write(&path, vec![0u8; (MAX_FONT_FILE_SIZE + 1) as usize]).unwrap();

        let err = read_font_file(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        match err {
            Error::OversizedResource { len, max, .. } => {
                assert_eq!(len, MAX_FONT_FILE_SIZE + 1);
                assert_eq!(max, MAX_FONT_FILE_SIZE);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_font_file_reads_exact_contents() {
        let path = std::env::temp_dir().join("glyphquad_small_font_test.ttf");
        std::fs::write(&path, b"abc").unwrap();

        let data = read_font_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(data, b"abc");
    }
}
