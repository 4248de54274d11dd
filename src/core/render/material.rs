//=========================================================================
// Materials
//=========================================================================
//
// Surface description attached to mesh nodes: base color plus an
// optional texture map. Only nodes that carry a `Material` take part in
// tinting and texturing.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

//=== Color ===============================================================

/// Linear RGB color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

//=== Texture =============================================================

/// Decoded RGBA8 image.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
}

impl Texture {
    /// Two-color checkerboard, `cell` pixels per square.
    pub fn checker(name: &str, size: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> Self {
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);

        for y in 0..size {
            for x in 0..size {
                let texel = if ((x / cell) + (y / cell)) % 2 == 0 { a } else { b };
                pixels.extend_from_slice(&texel);
            }
        }

        Self {
            name: name.to_string(),
            width: size,
            height: size,
            pixels: pixels.into(),
        }
    }
}

//=== Material ============================================================

/// Base color and optional texture map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    pub color: Color,
    pub map: Option<Arc<Texture>>,
}

impl Material {
    pub fn with_color(color: Color) -> Self {
        Self { color, map: None }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
