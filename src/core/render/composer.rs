//=========================================================================
// Composer
//=========================================================================
//
// Multi-pass frame composition with a single `render()` entry point.
//
// Flow (per call to `render`):
//   lock surface → for pass in passes: pass.render(...) → present()
//
// Pass order is insertion order. The surface lock is held for the whole
// frame so a resize from another thread cannot land mid-frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::camera::PerspectiveCamera;
use super::scene_graph::{NodeKind, SceneGraph};
use super::surface::{DrawItem, DrawList, Effect, RenderTarget, SurfaceHandle, Viewport};
use super::material::Color;

//=== Pass Trait ==========================================================

/// One stage of the composition pipeline.
pub trait Pass: Send {
    /// Short identifier for diagnostics.
    fn name(&self) -> &'static str;

    /// Executes the pass against the locked target.
    fn render(&mut self, graph: &SceneGraph, camera: &PerspectiveCamera, target: &mut dyn RenderTarget);

    /// Follows a surface resize. Passes without size-dependent state ignore it.
    fn set_size(&mut self, _viewport: Viewport) {}
}

//=== RenderPass ==========================================================

/// Draws every visible light and mesh of the scene graph.
#[derive(Debug, Default)]
pub struct RenderPass;

impl RenderPass {
    pub fn new() -> Self {
        Self
    }

    /// Flattens the visible part of a graph into a draw list.
    pub fn collect(graph: &SceneGraph, camera: &PerspectiveCamera) -> DrawList {
        let mut list = DrawList {
            view_projection: camera.view_projection(),
            ..DrawList::default()
        };

        for &root in graph.roots() {
            for id in graph.descendants(root) {
                if !graph.is_visible(id) {
                    continue;
                }
                let Some(node) = graph.node(id) else { continue };

                match &node.kind {
                    NodeKind::Group => {}
                    NodeKind::AmbientLight { color, intensity } => {
                        list.ambient.push(Color::rgb(
                            color.r * intensity,
                            color.g * intensity,
                            color.b * intensity,
                        ));
                    }
                    NodeKind::Mesh(mesh) => list.items.push(DrawItem {
                        node: id,
                        world: graph.world_matrix(id),
                        color: mesh.material.color,
                        textured: mesh.material.map.is_some(),
                    }),
                }
            }
        }

        list
    }
}

impl Pass for RenderPass {
    fn name(&self) -> &'static str {
        "render"
    }

    fn render(&mut self, graph: &SceneGraph, camera: &PerspectiveCamera, target: &mut dyn RenderTarget) {
        target.draw(&Self::collect(graph, camera));
    }
}

//=== BloomPass ===========================================================

/// Full-screen glow on bright regions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomPass {
    pub resolution: Viewport,
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
}

impl BloomPass {
    pub fn new(resolution: Viewport, strength: f32, radius: f32, threshold: f32) -> Self {
        Self { resolution, strength, radius, threshold }
    }
}

impl Pass for BloomPass {
    fn name(&self) -> &'static str {
        "bloom"
    }

    fn set_size(&mut self, viewport: Viewport) {
        self.resolution = viewport;
    }

    fn render(&mut self, _graph: &SceneGraph, _camera: &PerspectiveCamera, target: &mut dyn RenderTarget) {
        target.post_process(&Effect::Bloom {
            width: self.resolution.width,
            height: self.resolution.height,
            strength: self.strength,
            radius: self.radius,
            threshold: self.threshold,
        });
    }
}

//=== Composer ============================================================

/// Ordered pass list bound to a shared surface.
pub struct Composer {
    surface: SurfaceHandle,
    passes: Vec<Box<dyn Pass>>,
}

impl Composer {
    pub fn new(surface: SurfaceHandle) -> Self {
        Self { surface, passes: Vec::new() }
    }

    /// Appends a pass; passes run in insertion order.
    pub fn add_pass<P: Pass + 'static>(&mut self, pass: P) {
        debug!("Composer: adding pass '{}' at index {}", pass.name(), self.passes.len());
        self.passes.push(Box::new(pass));
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Resizes every pass.
    pub fn set_size(&mut self, viewport: Viewport) {
        for pass in &mut self.passes {
            pass.set_size(viewport);
        }
    }

    /// Runs every pass and presents the frame.
    pub fn render(&mut self, graph: &SceneGraph, camera: &PerspectiveCamera) {
        let mut target = self.surface.lock();
        for pass in &mut self.passes {
            pass.render(graph, camera, &mut *target);
        }
        target.present();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
