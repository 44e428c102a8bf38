//! Screen-space vertex type and geometry builder.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::text::GlyphAtlas;

/// Texture coordinate marking a vertex as solid colour (no glyph sampling).
pub const SOLID_UV: [f32; 2] = [-1.0, -1.0];

/// Vertex for screen-space geometry and text.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct OverlayVertex {
    /// NDC position (x, y) in -1..1
    pub position: [f32; 2],
    /// UV into the glyph atlas (negative x = solid color)
    pub tex_coords: [f32; 2],
    /// RGBA color
    pub color: [f32; 4],
}

impl OverlayVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Segments used for discs and rings.
const CIRCLE_SEGMENTS: u32 = 32;

/// Builds indexed triangle lists in pixel coordinates, converted to NDC on the way in.
pub struct OverlayBuilder {
    pub vertices: Vec<OverlayVertex>,
    pub indices: Vec<u32>,
    screen_w: f32,
    screen_h: f32,
}

impl OverlayBuilder {
    pub fn new(screen_w: f32, screen_h: f32) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            screen_w: screen_w.max(1.0),
            screen_h: screen_h.max(1.0),
        }
    }

    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_w, self.screen_h)
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Convert pixel coords to NDC.
    fn px_to_ndc(&self, p: Vec2) -> [f32; 2] {
        [
            (p.x / self.screen_w) * 2.0 - 1.0,
            1.0 - (p.y / self.screen_h) * 2.0,
        ]
    }

    fn push(&mut self, p: Vec2, color: [f32; 4]) -> u32 {
        self.push_uv(p, SOLID_UV, color)
    }

    fn push_uv(&mut self, p: Vec2, tex_coords: [f32; 2], color: [f32; 4]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(OverlayVertex {
            position: self.px_to_ndc(p),
            tex_coords,
            color,
        });
        index
    }

    /// Axis-aligned solid rectangle. Coordinates in pixels.
    pub fn add_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        self.add_quad(
            [
                Vec2::new(x, y),
                Vec2::new(x + w, y),
                Vec2::new(x + w, y + h),
                Vec2::new(x, y + h),
            ],
            [color; 4],
        );
    }

    /// Rectangle with a vertical colour gradient.
    pub fn add_rect_gradient(&mut self, x: f32, y: f32, w: f32, h: f32, top: [f32; 4], bottom: [f32; 4]) {
        self.add_quad(
            [
                Vec2::new(x, y),
                Vec2::new(x + w, y),
                Vec2::new(x + w, y + h),
                Vec2::new(x, y + h),
            ],
            [top, top, bottom, bottom],
        );
    }

    /// Arbitrary quad, corners in winding order.
    pub fn add_quad(&mut self, corners: [Vec2; 4], colors: [[f32; 4]; 4]) {
        let base = self.vertices.len() as u32;
        for (corner, color) in corners.into_iter().zip(colors) {
            self.push(corner, color);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Filled circle, solid centre colour fading to `edge` at the rim.
    pub fn add_disc(&mut self, center: Vec2, radius: f32, color: [f32; 4], edge: [f32; 4]) {
        if radius <= 0.0 {
            return;
        }
        let c = self.push(center, color);
        let first = self.vertices.len() as u32;
        for i in 0..CIRCLE_SEGMENTS {
            let a = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
            self.push(center + Vec2::new(a.cos(), a.sin()) * radius, edge);
        }
        for i in 0..CIRCLE_SEGMENTS {
            let next = (i + 1) % CIRCLE_SEGMENTS;
            self.indices.extend_from_slice(&[c, first + i, first + next]);
        }
    }

    /// Annulus between `inner` and `outer` radii, flattened vertically by `squash` (1 = circle).
    pub fn add_ring(&mut self, center: Vec2, inner: f32, outer: f32, squash: f32, color: [f32; 4]) {
        if outer <= inner {
            return;
        }
        let first = self.vertices.len() as u32;
        for i in 0..CIRCLE_SEGMENTS {
            let a = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
            let dir = Vec2::new(a.cos(), a.sin() * squash);
            self.push(center + dir * inner, color);
            self.push(center + dir * outer, color);
        }
        for i in 0..CIRCLE_SEGMENTS {
            let next = (i + 1) % CIRCLE_SEGMENTS;
            let (i0, o0) = (first + i * 2, first + i * 2 + 1);
            let (i1, o1) = (first + next * 2, first + next * 2 + 1);
            self.indices.extend_from_slice(&[i0, o0, o1, i0, o1, i1]);
        }
    }

    /// A line of text with its top-left at (x, y). `size` is the line height in
    /// pixels. Returns the advance width.
    pub fn add_text(&mut self, glyphs: &mut GlyphAtlas, x: f32, y: f32, text: &str, size: f32, color: [f32; 4]) -> f32 {
        let mut pen = x;
        for ch in text.chars() {
            let glyph = glyphs.glyph(ch);
            if !glyph.is_blank() {
                let tl = Vec2::new(pen, y) + glyph.offset * size;
                let br = tl + glyph.size * size;
                let [u0, v0, u1, v1] = glyph.uv;
                let base = self.push_uv(tl, [u0, v0], color);
                self.push_uv(Vec2::new(br.x, tl.y), [u1, v0], color);
                self.push_uv(br, [u1, v1], color);
                self.push_uv(Vec2::new(tl.x, br.y), [u0, v1], color);
                self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
            }
            pen += glyph.advance * size;
        }
        pen - x
    }

    /// Text centred on `center`. Returns the width.
    pub fn add_text_centered(
        &mut self,
        glyphs: &mut GlyphAtlas,
        center: Vec2,
        text: &str,
        size: f32,
        color: [f32; 4],
    ) -> f32 {
        let width = glyphs.measure(text, size);
        self.add_text(glyphs, center.x - width * 0.5, center.y - size * 0.5, text, size, color)
    }

    /// Thick line segment from `a` to `b`, fading from `head` to `tail` colour.
    pub fn add_streak(&mut self, a: Vec2, b: Vec2, width: f32, head: [f32; 4], tail: [f32; 4]) {
        let dir = b - a;
        if dir.length_squared() < 1e-6 {
            self.add_rect(a.x - width * 0.5, a.y - width * 0.5, width, width, head);
            return;
        }
        let n = dir.perp().normalize() * (width * 0.5);
        self.add_quad([a + n, b + n, b - n, a - n], [head, tail, tail, head]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_covers_full_screen_in_ndc() {
        let mut b = OverlayBuilder::new(800.0, 600.0);
        b.add_rect(0.0, 0.0, 800.0, 600.0, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(b.vertices[0].position, [-1.0, 1.0]);
        assert_eq!(b.vertices[2].position, [1.0, -1.0]);
        assert_eq!(b.indices.len(), 6);
    }

    #[test]
    fn disc_and_ring_index_counts() {
        let mut b = OverlayBuilder::new(100.0, 100.0);
        b.add_disc(Vec2::splat(50.0), 10.0, [1.0; 4], [1.0; 4]);
        assert_eq!(b.indices.len(), (CIRCLE_SEGMENTS * 3) as usize);
        b.add_ring(Vec2::splat(50.0), 12.0, 14.0, 0.3, [1.0; 4]);
        assert_eq!(b.indices.len(), (CIRCLE_SEGMENTS * 9) as usize);
        assert!(b.indices.iter().all(|&i| (i as usize) < b.vertices.len()));
    }

    #[test]
    fn text_emits_one_quad_per_inked_glyph() {
        let mut glyphs = GlyphAtlas::new();
        let mut b = OverlayBuilder::new(200.0, 100.0);
        let width = b.add_text(&mut glyphs, 10.0, 10.0, "Hi there", 16.0, [1.0; 4]);
        assert_eq!(width, 8.0 * 12.0);
        // The space advances without drawing.
        assert_eq!(b.indices.len(), 7 * 6);
        assert!(b.vertices.iter().all(|v| v.tex_coords[0] >= 0.0));
    }

    #[test]
    fn shapes_are_marked_solid() {
        let mut b = OverlayBuilder::new(100.0, 100.0);
        b.add_rect(0.0, 0.0, 10.0, 10.0, [1.0; 4]);
        assert!(b.vertices.iter().all(|v| v.tex_coords == SOLID_UV));
    }

    #[test]
    fn degenerate_shapes_are_skipped() {
        let mut b = OverlayBuilder::new(100.0, 100.0);
        b.add_disc(Vec2::ZERO, 0.0, [1.0; 4], [1.0; 4]);
        b.add_ring(Vec2::ZERO, 5.0, 5.0, 1.0, [1.0; 4]);
        assert!(b.is_empty());
    }
}
