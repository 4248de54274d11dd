//=========================================================================
// Interaction Prober
//=========================================================================
//
// Normalized cursor + camera + target subtree → distance-sorted hits.
//
// Flow:
//   NormalizedPosition → to_ndc() → camera.ray_from_ndc() → graph.raycast()
//
// Side-effect free. Any degeneracy (bad camera, missing node, meshes
// without geometry) yields an empty hit list.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::cursor::NormalizedPosition;
use crate::core::render::{HitRecord, NodeId, PerspectiveCamera, SceneGraph};

//=== probe() =============================================================

/// Casts a pick ray through `cursor` and intersects it with `target`.
///
/// Hits are ordered nearest first.
pub fn probe(
    cursor: NormalizedPosition,
    camera: &PerspectiveCamera,
    graph: &SceneGraph,
    target: NodeId,
) -> Vec<HitRecord> {
    match camera.ray_from_ndc(cursor.to_ndc()) {
        Some(ray) => graph.raycast(target, &ray),
        None => Vec::new(),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
