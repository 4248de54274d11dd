//=========================================================================
// Render Collaborator
//=========================================================================
//
// Minimal scene graph, camera and multi-pass composer that screen states
// draw through. Rasterization itself lives behind `RenderTarget`; the
// crate ships `HeadlessTarget`, which records frames.
//
// Architecture:
//   ScreenState
//     ├─ SceneGraph ──► raycast() (picking)
//     ├─ PerspectiveCamera
//     └─ Composer ──► [RenderPass, BloomPass, ...] ──► RenderTarget
//
//=========================================================================

//=== Module Declarations =================================================

mod camera;
mod composer;
mod geometry;
mod material;
mod scene_graph;
mod surface;

//=== Public API ==========================================================

pub use camera::PerspectiveCamera;
pub use composer::{BloomPass, Composer, Pass, RenderPass};
pub use geometry::{Geometry, Ray};
pub use material::{Color, Material, Texture};
pub use scene_graph::{HitRecord, Mesh, Model, ModelPart, Node, NodeId, NodeKind, SceneGraph, Transform};
pub use surface::{surface, DrawItem, DrawList, Effect, HeadlessTarget, RenderTarget, SurfaceHandle, Viewport};
