//! Triangle setup and coverage.
//!
//! Clip-space positions are divided by `w` and mapped to a bottom-left-origin screen:
//! `sx = (x + 1) / 2 * width`, `sy = (y + 1) / 2 * height`. A pixel is covered when its
//! center lies inside the triangle; both windings are accepted.

use crate::color::quantize::{RoundingRule, quantize};
use crate::foundation::core::{Rgba8, Vec4};
use crate::foundation::error::{ConformError, ConformResult};
use crate::platform::Primitive;

// Centers on a shared edge must not fall through the crack between two triangles.
const EDGE_EPSILON: f64 = 1e-3;

/// Shaded vertex as it leaves the shader unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadedVertex {
    /// Clip-space position.
    pub position: Vec4,
    /// Color output.
    pub color: Vec4,
}

/// Bottom-up RGBA8 render target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderTarget {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl RenderTarget {
    /// Target of `width` x `height` pixels, all zero.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 4]; width as usize * height as usize],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fill every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8) {
        self.pixels.fill(color);
    }

    /// Pixel at (`x`, `y`), `y` counted from the bottom.
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    fn set(&mut self, x: u32, y: u32, color: Rgba8) {
        let idx = y as usize * self.width as usize + x as usize;
        if let Some(px) = self.pixels.get_mut(idx) {
            *px = color;
        }
    }
}

/// Assemble `vertices` into triangles.
pub fn assemble(
    primitive: Primitive,
    vertices: &[ShadedVertex],
) -> ConformResult<Vec<[ShadedVertex; 3]>> {
    if vertices.len() < 3 {
        return Err(ConformError::pipeline(format!(
            "{} vertices do not form a triangle",
            vertices.len()
        )));
    }
    let tris = match primitive {
        Primitive::TriangleStrip => vertices
            .windows(3)
            .enumerate()
            .map(|(i, w)| {
                // Odd triangles swap their first two vertices to keep a consistent winding.
                if i.is_multiple_of(2) {
                    [w[0], w[1], w[2]]
                } else {
                    [w[1], w[0], w[2]]
                }
            })
            .collect(),
        Primitive::Triangles => {
            if !vertices.len().is_multiple_of(3) {
                return Err(ConformError::pipeline(format!(
                    "triangle list of {} vertices",
                    vertices.len()
                )));
            }
            vertices
                .chunks_exact(3)
                .map(|c| [c[0], c[1], c[2]])
                .collect()
        }
    };
    Ok(tris)
}

fn to_screen(p: Vec4, width: u32, height: u32) -> [f64; 2] {
    let w = f64::from(p.w);
    let (x, y) = (f64::from(p.x) / w, f64::from(p.y) / w);
    [
        (x + 1.0) * 0.5 * f64::from(width),
        (y + 1.0) * 0.5 * f64::from(height),
    ]
}

fn edge(a: [f64; 2], b: [f64; 2], p: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

fn interpolate(colors: [Vec4; 3], l1: f32, l2: f32) -> Vec4 {
    let [c0, c1, c2] = colors.map(Vec4::to_array);
    Vec4::from_array(std::array::from_fn(|i| {
        if c0[i].to_bits() == c1[i].to_bits() && c0[i].to_bits() == c2[i].to_bits() {
            c0[i]
        } else {
            c0[i] + l1 * (c1[i] - c0[i]) + l2 * (c2[i] - c0[i])
        }
    }))
}

/// Rasterize one triangle into `target`, quantizing its color with `rule`.
pub fn draw_triangle(target: &mut RenderTarget, tri: &[ShadedVertex; 3], rule: RoundingRule) {
    let (w, h) = (target.width, target.height);
    let [a, b, c] = tri.map(|v| to_screen(v.position, w, h));
    let area = edge(a, b, c);
    if area == 0.0 || !area.is_finite() {
        return;
    }
    let sign = area.signum();

    let min_x = a[0].min(b[0]).min(c[0]).floor().max(0.0) as u32;
    let min_y = a[1].min(b[1]).min(c[1]).floor().max(0.0) as u32;
    let max_x = (a[0].max(b[0]).max(c[0]).ceil().max(0.0) as u32).min(w);
    let max_y = (a[1].max(b[1]).max(c[1]).ceil().max(0.0) as u32).min(h);

    let colors = tri.map(|v| v.color);
    for y in min_y..max_y {
        for x in min_x..max_x {
            let p = [f64::from(x) + 0.5, f64::from(y) + 0.5];
            let e0 = edge(b, c, p) * sign;
            let e1 = edge(c, a, p) * sign;
            let e2 = edge(a, b, p) * sign;
            if e0 < -EDGE_EPSILON || e1 < -EDGE_EPSILON || e2 < -EDGE_EPSILON {
                continue;
            }
            let abs_area = area.abs();
            let color = interpolate(colors, (e1 / abs_area) as f32, (e2 / abs_area) as f32);
            let rgba = color.to_array().map(|ch| quantize(ch, rule));
            target.set(x, y, rgba);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/soft/raster.rs"]
mod tests;
