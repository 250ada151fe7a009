//! Per-call glyph quad batching.
//!
//! [`layout_text`] turns a string and a pen position into a clip-space vertex
//! batch, one textured quad per renderable character. The pen is threaded
//! through by mutable reference so consecutive calls continue where the
//! previous string ended.

use glam::Vec2;
use glow::HasContext;

use crate::abs::Vertex;
use crate::error::{Error, Result};
use crate::text::atlas::{AtlasMetrics, ATLAS_SIZE};

/// Most glyphs a single [`layout_text`] call will batch.
///
/// One call's vertex data is capped at 4096 floats; at four floats per
/// vertex and six vertices per glyph that is 170 whole glyphs. Longer
/// strings must be split by the caller.
pub const MAX_BATCH_GLYPHS: usize = 170;

/// A single text vertex: clip-space position plus atlas UV.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextVertex {
    pub position: Vec2,
    pub uv: Vec2,
}

impl Vertex for TextVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = std::mem::size_of::<TextVertex>() as i32;
            // Position attribute
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, stride, 0);
            // UV attribute
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(
                1,
                2,
                glow::FLOAT,
                false,
                stride,
                2 * std::mem::size_of::<f32>() as i32,
            );
        }
    }
}

/// Lays out `text` as textured glyph quads in clip space.
///
/// The pen is in pixels, y down, and marks the current baseline position.
/// Each renderable character emits two triangles (six vertices, order
/// top-left / top-right / bottom-right then top-left / bottom-right /
/// bottom-left) and advances the pen by the glyph's advance width.
/// Characters without an atlas entry, control characters included, are
/// skipped without moving the pen.
///
/// Quad corners are snapped to whole pixels the same way the atlas was
/// sampled at bake time, so glyphs land on texel boundaries at 1:1 scale.
///
/// Fails with [`Error::BatchCapacityExceeded`] if the string holds more than
/// [`MAX_BATCH_GLYPHS`] renderable characters, and leaves the pen untouched
/// in that case.
pub fn layout_text(
    metrics: &AtlasMetrics,
    text: &str,
    pen: &mut Vec2,
    viewport: (u32, u32),
) -> Result<Vec<TextVertex>> {
    let glyph_count = text.chars().filter(|&c| metrics.glyph(c).is_some()).count();
    if glyph_count > MAX_BATCH_GLYPHS {
        return Err(Error::BatchCapacityExceeded {
            glyphs: glyph_count,
            max: MAX_BATCH_GLYPHS,
        });
    }

    let mut vertices = Vec::new();
    vertices
        .try_reserve_exact(glyph_count * 6)
        .map_err(|_| Error::out_of_memory("glyph vertex batch"))?;

    let (vw, vh) = (viewport.0 as f32, viewport.1 as f32);
    let ndc = |x: f32, y: f32| Vec2::new(2.0 * x / vw - 1.0, 1.0 - 2.0 * y / vh);

    for c in text.chars() {
        let Some(glyph) = metrics.glyph(c) else {
            continue;
        };

        // Snap the quad origin to whole pixels, then hang the glyph box off it.
        let round_x = (pen.x + glyph.xoff + 0.5).floor();
        let round_y = (pen.y + glyph.yoff + 0.5).floor();
        let x0 = round_x;
        let y0 = round_y;
        let x1 = round_x + f32::from(glyph.x1 - glyph.x0);
        let y1 = round_y + f32::from(glyph.y1 - glyph.y0);

        let s0 = f32::from(glyph.x0) / ATLAS_SIZE as f32;
        let t0 = f32::from(glyph.y0) / ATLAS_SIZE as f32;
        let s1 = f32::from(glyph.x1) / ATLAS_SIZE as f32;
        let t1 = f32::from(glyph.y1) / ATLAS_SIZE as f32;

        let tl = TextVertex {
            position: ndc(x0, y0),
            uv: Vec2::new(s0, t0),
        };
        let tr = TextVertex {
            position: ndc(x1, y0),
            uv: Vec2::new(s1, t0),
        };
        let br = TextVertex {
            position: ndc(x1, y1),
            uv: Vec2::new(s1, t1),
        };
        let bl = TextVertex {
            position: ndc(x0, y1),
            uv: Vec2::new(s0, t1),
        };
        vertices.extend_from_slice(&[tl, tr, br, tl, br, bl]);

        pen.x += glyph.xadvance;
    }

    Ok(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::atlas::{GlyphMetrics, FIRST_CHAR, GLYPH_COUNT};

    const VIEWPORT: (u32, u32) = (800, 600);

    fn glyph_index(c: char) -> usize {
        c as usize - FIRST_CHAR as usize
    }

    /// Metrics with distinctive 'A' and 'B' glyphs and a zero-area space.
    fn test_metrics() -> AtlasMetrics {
        let mut glyphs = [GlyphMetrics::default(); GLYPH_COUNT];
        glyphs[glyph_index('A')] = GlyphMetrics {
            x0: 10,
            y0: 20,
            x1: 18,
            y1: 32,
            xoff: 1.0,
            yoff: -10.0,
            xadvance: 9.0,
        };
        glyphs[glyph_index('B')] = GlyphMetrics {
            x0: 30,
            y0: 20,
            x1: 37,
            y1: 32,
            xoff: 2.0,
            yoff: -10.0,
            xadvance: 8.0,
        };
        glyphs[glyph_index(' ')] = GlyphMetrics {
            xadvance: 4.0,
            ..GlyphMetrics::default()
        };
        AtlasMetrics::new(19.0, glyphs)
    }

    #[test]
    fn test_single_glyph_quad() {
        let metrics = test_metrics();
        let mut pen = Vec2::new(100.0, 200.0);
        let vertices = layout_text(&metrics, "A", &mut pen, VIEWPORT).unwrap();

        assert_eq!(vertices.len(), 6);

        // round(100 + 1.0) = 101, round(200 - 10.0) = 190; box is 8x12 px
        let tl = Vec2::new(2.0 * 101.0 / 800.0 - 1.0, 1.0 - 2.0 * 190.0 / 600.0);
        let br = Vec2::new(2.0 * 109.0 / 800.0 - 1.0, 1.0 - 2.0 * 202.0 / 600.0);
        assert_eq!(vertices[0].position, tl);
        assert_eq!(vertices[2].position, br);

        assert_eq!(vertices[0].uv, Vec2::new(10.0 / 512.0, 20.0 / 512.0));
        assert_eq!(vertices[2].uv, Vec2::new(18.0 / 512.0, 32.0 / 512.0));

        assert_eq!(pen, Vec2::new(109.0, 200.0));
    }

    #[test]
    fn test_triangle_order() {
        let metrics = test_metrics();
        let mut pen = Vec2::ZERO;
        let v = layout_text(&metrics, "A", &mut pen, VIEWPORT).unwrap();

        // Two triangles sharing the top-left / bottom-right diagonal.
        assert_eq!(v[0], v[3]);
        assert_eq!(v[2], v[4]);
        // First triangle runs top-left, top-right, bottom-right.
        assert_eq!(v[1].position.y, v[0].position.y);
        assert_eq!(v[1].position.x, v[2].position.x);
        // Last vertex is the bottom-left corner.
        assert_eq!(v[5].position.x, v[0].position.x);
        assert_eq!(v[5].position.y, v[2].position.y);
    }

    #[test]
    fn test_pen_advances_per_glyph() {
        let metrics = test_metrics();
        let mut pen = Vec2::new(10.0, 50.0);
        let vertices = layout_text(&metrics, "AAA", &mut pen, VIEWPORT).unwrap();

        assert_eq!(vertices.len(), 18);
        assert_eq!(pen, Vec2::new(10.0 + 3.0 * 9.0, 50.0));

        // The second glyph is laid out from the advanced pen position.
        let second_tl_x = 2.0 * (10.0f32 + 9.0 + 1.0 + 0.5).floor() / 800.0 - 1.0;
        assert_eq!(vertices[6].position.x, second_tl_x);
    }

    #[test]
    fn test_space_emits_zero_area_quad() {
        let metrics = test_metrics();
        let mut pen = Vec2::new(5.0, 5.0);
        let vertices = layout_text(&metrics, " ", &mut pen, VIEWPORT).unwrap();

        // A space still occupies batch capacity, it just covers no pixels.
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[0].position, vertices[1].position);
        assert_eq!(pen.x, 9.0);
    }

    #[test]
    fn test_unmapped_chars_skipped_without_advance() {
        let metrics = test_metrics();
        let mut pen = Vec2::new(30.0, 40.0);

        let vertices = layout_text(&metrics, "\n\t\u{e9}", &mut pen, VIEWPORT).unwrap();
        assert!(vertices.is_empty());
        assert_eq!(pen, Vec2::new(30.0, 40.0));

        let vertices = layout_text(&metrics, "A\nA", &mut pen, VIEWPORT).unwrap();
        assert_eq!(vertices.len(), 12);
        assert_eq!(pen.x, 30.0 + 18.0);
    }

    #[test]
    fn test_second_glyph_starts_at_first_advance() {
        let metrics = test_metrics();
        let mut pen = Vec2::ZERO;
        let vertices = layout_text(&metrics, "AB", &mut pen, VIEWPORT).unwrap();

        assert_eq!(vertices.len(), 12);
        let advance_a = metrics.glyph('A').unwrap().xadvance;
        let xoff_b = metrics.glyph('B').unwrap().xoff;
        let expected_x = 2.0 * (advance_a + xoff_b + 0.5).floor() / 800.0 - 1.0;
        assert_eq!(vertices[6].position.x, expected_x);
        assert_eq!(pen.x, 9.0 + 8.0);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let metrics = test_metrics();
        let mut pen_a = Vec2::new(12.0, 34.0);
        let mut pen_b = Vec2::new(12.0, 34.0);

        let first = layout_text(&metrics, "A B A", &mut pen_a, VIEWPORT).unwrap();
        let second = layout_text(&metrics, "A B A", &mut pen_b, VIEWPORT).unwrap();

        assert_eq!(first, second);
        assert_eq!(pen_a, pen_b);
    }

    #[test]
    fn test_empty_string() {
        let metrics = test_metrics();
        let mut pen = Vec2::new(1.0, 2.0);
        let vertices = layout_text(&metrics, "", &mut pen, VIEWPORT).unwrap();
        assert!(vertices.is_empty());
        assert_eq!(pen, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_batch_capacity() {
        let metrics = test_metrics();
        let text: String = "A".repeat(MAX_BATCH_GLYPHS);
        let mut pen = Vec2::ZERO;
        let vertices = layout_text(&metrics, &text, &mut pen, VIEWPORT).unwrap();
        assert_eq!(vertices.len(), MAX_BATCH_GLYPHS * 6);
    }

    #[test]
    fn test_batch_capacity_exceeded_leaves_pen_untouched() {
        let metrics = test_metrics();
        let text: String = "A".repeat(MAX_BATCH_GLYPHS + 1);
        let mut pen = Vec2::new(7.0, 8.0);

        let err = layout_text(&metrics, &text, &mut pen, VIEWPORT).unwrap_err();
        assert!(matches!(
            err,
            Error::BatchCapacityExceeded { glyphs: 171, max: MAX_BATCH_GLYPHS }
        ));
        assert_eq!(pen, Vec2::new(7.0, 8.0));
    }

    #[test]
    fn test_unmapped_chars_do_not_count_against_capacity() {
        let metrics = test_metrics();
        let mut text: String = "A".repeat(MAX_BATCH_GLYPHS);
        text.push('\n');
        let mut pen = Vec2::ZERO;
        assert!(layout_text(&metrics, &text, &mut pen, VIEWPORT).is_ok());
    }

    #[test]
    fn test_ndc_corners() {
        // A glyph box spanning the whole viewport maps to the full clip cube.
        let mut glyphs = [GlyphMetrics::default(); GLYPH_COUNT];
        glyphs[glyph_index('A')] = GlyphMetrics {
            x0: 0,
            y0: 0,
            x1: 400,
            y1: 300,
            xoff: 0.0,
            yoff: 0.0,
            xadvance: 0.0,
        };
        let metrics = AtlasMetrics::new(19.0, glyphs);

        let mut pen = Vec2::ZERO;
        let v = layout_text(&metrics, "A", &mut pen, (400, 300)).unwrap();
        assert_eq!(v[0].position, Vec2::new(-1.0, 1.0));
        assert_eq!(v[2].position, Vec2::new(1.0, -1.0));
    }
}
