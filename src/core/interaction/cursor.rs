//=========================================================================
// Coordinate Mapper
//=========================================================================
//
// Raw pointer position (pixels, top-left origin) → normalized [0,1]².
//
// Policy: clamp. Positions outside the viewport map to the nearest edge,
// so downstream probes always receive a well-defined point. A degenerate
// viewport axis (zero, negative or non-finite) or a non-finite coordinate
// maps to 0 on that axis.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use crate::core::render::Viewport;

//=== NormalizedPosition ==================================================

/// Cursor position with both axes in `[0, 1]`, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPosition {
    pub x: f32,
    pub y: f32,
}

impl NormalizedPosition {
    /// Converts to normalized device coordinates (`[-1, 1]`, y up).
    pub fn to_ndc(self) -> Vec2 {
        Vec2::new(self.x * 2.0 - 1.0, -self.y * 2.0 + 1.0)
    }
}

//=== normalize() =========================================================

/// Maps a raw pointer position into the unit square of `viewport`.
pub fn normalize(raw: (f32, f32), viewport: Viewport) -> NormalizedPosition {
    NormalizedPosition {
        x: normalize_axis(raw.0, viewport.width),
        y: normalize_axis(raw.1, viewport.height),
    }
}

fn normalize_axis(value: f32, extent: f32) -> f32 {
    if !(extent.is_finite() && extent > 0.0) {
        return 0.0;
    }

    let ratio = value / extent;
    if ratio.is_nan() {
        return 0.0;
    }

    // ±inf clamps to the matching edge
    ratio.clamp(0.0, 1.0)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport::new(800.0, 600.0);

    #[test]
    fn inside_points_scale_linearly() {
        let p = normalize((400.0, 150.0), VIEW);
        assert_eq!(p, NormalizedPosition { x: 0.5, y: 0.25 });
    }

    #[test]
    fn outside_points_clamp_to_edges() {
        assert_eq!(normalize((-20.0, 900.0), VIEW), NormalizedPosition { x: 0.0, y: 1.0 });
        assert_eq!(normalize((f32::INFINITY, f32::NEG_INFINITY), VIEW), NormalizedPosition { x: 1.0, y: 0.0 });
    }

    #[test]
    fn degenerate_inputs_map_to_zero() {
        assert_eq!(normalize((10.0, 10.0), Viewport::new(0.0, -5.0)), NormalizedPosition { x: 0.0, y: 0.0 });
        assert_eq!(normalize((f32::NAN, 10.0), VIEW).x, 0.0);
        assert_eq!(normalize((10.0, 10.0), Viewport::new(f32::NAN, 600.0)).x, 0.0);
    }

    #[test]
    fn clamping_is_stable_on_boundaries() {
        for &(w, h) in &[(800.0, 600.0), (1.0, 1.0), (3840.0, 2160.0), (7.0, 13.0)] {
            let view = Viewport::new(w, h);
            for &(x, y) in &[(0.0, 0.0), (1.0, 1.0), (0.0, 1.0), (1.0, 0.0), (0.5, 0.25)] {
                let once = normalize((x * w, y * h), view);
                let twice = normalize((once.x * w, once.y * h), view);
                assert_eq!(once, twice, "re-normalizing {:?} in {:?}", once, view);
                assert!((0.0..=1.0).contains(&once.x) && (0.0..=1.0).contains(&once.y));
            }
        }
    }

    #[test]
    fn ndc_flips_y() {
        assert_eq!(NormalizedPosition { x: 0.0, y: 0.0 }.to_ndc(), Vec2::new(-1.0, 1.0));
        assert_eq!(NormalizedPosition { x: 1.0, y: 1.0 }.to_ndc(), Vec2::new(1.0, -1.0));
        assert_eq!(NormalizedPosition { x: 0.5, y: 0.5 }.to_ndc(), Vec2::ZERO);
    }
}
