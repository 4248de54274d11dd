//=========================================================================
// Geometry
//=========================================================================
//
// Indexed triangle geometry and the ray/triangle query used for picking.
//
// Architecture:
//   Ray (world) → inverse(world matrix) → Ray (local) → triangles → t
//
// Intersection uses Möller–Trumbore. Hits behind the ray origin and
// degenerate triangles are skipped.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Mat4, Vec3};

//=== Constants ===========================================================

const EPSILON: f32 = 1e-6;

/// Relative `t` spacing under which two hits are one crossing.
const SAME_CROSSING: f32 = 1e-5;

//=== Ray =================================================================

/// Half-line used for pointer picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Normalized direction.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    ///
    /// Returns `None` for a zero-length or non-finite direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        if !origin.is_finite() {
            return None;
        }
        Some(Self { origin, direction })
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Transforms the ray by an affine matrix (direction is not renormalized).
    pub(crate) fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
        }
    }
}

//=== Geometry ============================================================

/// Indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub indices: Vec<[u32; 3]>,
}

impl Geometry {
    pub fn new(positions: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Self {
        Self { positions, indices }
    }

    /// Axis-aligned box centered on the origin.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);

        let positions = vec![
            Vec3::new(-hx, -hy, -hz),
            Vec3::new(hx, -hy, -hz),
            Vec3::new(hx, hy, -hz),
            Vec3::new(-hx, hy, -hz),
            Vec3::new(-hx, -hy, hz),
            Vec3::new(hx, -hy, hz),
            Vec3::new(hx, hy, hz),
            Vec3::new(-hx, hy, hz),
        ];

        let indices = vec![
            // back
            [0, 2, 1], [0, 3, 2],
            // front
            [4, 5, 6], [4, 6, 7],
            // left
            [0, 4, 7], [0, 7, 3],
            // right
            [1, 2, 6], [1, 6, 5],
            // bottom
            [0, 1, 5], [0, 5, 4],
            // top
            [3, 7, 6], [3, 6, 2],
        ];

        Self { positions, indices }
    }

    /// Flat quad in the XY plane facing +Z.
    pub fn plane(width: f32, height: f32) -> Self {
        let (hx, hy) = (width * 0.5, height * 0.5);
        Self {
            positions: vec![
                Vec3::new(-hx, -hy, 0.0),
                Vec3::new(hx, -hy, 0.0),
                Vec3::new(hx, hy, 0.0),
                Vec3::new(-hx, hy, 0.0),
            ],
            indices: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Intersects a ray expressed in this geometry's local space.
    ///
    /// Returns `(t, face)` pairs nearest first, where `t` is measured in
    /// units of the given ray's direction. A crossing through an edge or
    /// vertex shared by several faces is reported once, for the first such
    /// face. Faces referencing out-of-range vertices are skipped.
    pub fn intersect_local(&self, ray: &Ray) -> Vec<(f32, usize)> {
        let mut hits = Vec::new();

        for (face, tri) in self.indices.iter().enumerate() {
            let vertex = |i: u32| self.positions.get(i as usize).copied();
            let (Some(a), Some(b), Some(c)) = (vertex(tri[0]), vertex(tri[1]), vertex(tri[2])) else {
                continue;
            };

            if let Some(t) = ray_triangle(ray, a, b, c) {
                hits.push((t, face));
            }
        }

        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.dedup_by(|next, kept| next.0 - kept.0 <= SAME_CROSSING * kept.0.max(1.0));
        hits
    }
}

//=== Ray / Triangle ======================================================

/// Möller–Trumbore intersection, double-sided.
fn ray_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);

    // Parallel or degenerate
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t > EPSILON).then_some(t)
}

//=========================================================================
// Unit Tests
//=========================================================================
