//=========================================================================
// Render Surface
//=========================================================================
//
// Boundary between the composer and whatever actually produces pixels.
//
// Architecture:
//   Composer ─► Pass ─► RenderTarget (trait)
//                            ├─ draw(DrawList)
//                            ├─ post_process(Effect)
//                            └─ present()
//
// The surface is shared: the context reads its size for cursor mapping,
// while each state's composer draws into it. `SurfaceHandle` wraps the
// target in a `parking_lot::Mutex` so both sides can reach it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use glam::Mat4;
use log::trace;
use parking_lot::Mutex;

//=== Internal Dependencies ===============================================

use super::material::Color;
use super::scene_graph::NodeId;

//=== Viewport ============================================================

/// Render target size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width / height, or 1.0 for a degenerate viewport.
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite() {
            self.width / self.height
        } else {
            1.0
        }
    }
}

//=== Draw Data ===========================================================

/// One visible mesh, flattened for the target.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub world: Mat4,
    pub color: Color,
    pub textured: bool,
}

/// Everything a scene pass hands to the target for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub view_projection: Mat4,
    /// Summed ambient contribution (color × intensity per light).
    pub ambient: Vec<Color>,
    pub items: Vec<DrawItem>,
}

/// Full-screen effect applied after the scene is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Bloom {
        width: f32,
        height: f32,
        strength: f32,
        radius: f32,
        threshold: f32,
    },
}

//=== RenderTarget ========================================================

/// Destination for composed frames.
pub trait RenderTarget: Send {
    /// Current size in physical pixels.
    fn size(&self) -> Viewport;

    /// Resizes the target (platform resize events).
    fn resize(&mut self, viewport: Viewport);

    /// Draws one scene pass.
    fn draw(&mut self, list: &DrawList);

    /// Applies a full-screen effect to what has been drawn so far.
    fn post_process(&mut self, effect: &Effect);

    /// Finishes the frame.
    fn present(&mut self);
}

/// Shared, lockable render target.
pub type SurfaceHandle = Arc<Mutex<dyn RenderTarget>>;

/// Wraps a target into a shareable handle.
pub fn surface<T: RenderTarget + 'static>(target: T) -> SurfaceHandle {
    Arc::new(Mutex::new(target))
}

//=== HeadlessTarget ======================================================

/// Target that records frames instead of rasterizing them.
///
/// Used by the headless runner and by tests to observe what a state drew.
#[derive(Debug, Clone)]
pub struct HeadlessTarget {
    viewport: Viewport,
    frames_presented: u64,
    current: Vec<DrawList>,
    current_effects: Vec<Effect>,
    last_frame: Vec<DrawList>,
    last_effects: Vec<Effect>,
}

impl HeadlessTarget {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            frames_presented: 0,
            current: Vec::new(),
            current_effects: Vec::new(),
            last_frame: Vec::new(),
            last_effects: Vec::new(),
        }
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Scene passes drawn in the most recently presented frame.
    pub fn last_frame(&self) -> &[DrawList] {
        &self.last_frame
    }

    /// Effects applied in the most recently presented frame.
    pub fn last_effects(&self) -> &[Effect] {
        &self.last_effects
    }
}

impl RenderTarget for HeadlessTarget {
    fn size(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn draw(&mut self, list: &DrawList) {
        self.current.push(list.clone());
    }

    fn post_process(&mut self, effect: &Effect) {
        self.current_effects.push(*effect);
    }

    fn present(&mut self) {
        self.frames_presented += 1;
        self.last_frame = std::mem::take(&mut self.current);
        self.last_effects = std::mem::take(&mut self.current_effects);
        trace!(
            "Headless frame {} ({} passes, {} effects)",
            self.frames_presented,
            self.last_frame.len(),
            self.last_effects.len()
        );
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_falls_back_for_degenerate_sizes() {
        assert_eq!(Viewport::new(800.0, 400.0).aspect(), 2.0);
        assert_eq!(Viewport::new(0.0, 400.0).aspect(), 1.0);
        assert_eq!(Viewport::new(800.0, f32::NAN).aspect(), 1.0);
    }

    #[test]
    fn present_rotates_current_frame() {
        let mut target = HeadlessTarget::new(Viewport::new(10.0, 10.0));
        target.draw(&DrawList::default());
        assert!(target.last_frame().is_empty());

        target.present();
        assert_eq!(target.frames_presented(), 1);
        assert_eq!(target.last_frame().len(), 1);

        target.present();
        assert!(target.last_frame().is_empty());
    }

    #[test]
    fn handle_shares_one_target() {
        let handle = surface(HeadlessTarget::new(Viewport::new(10.0, 10.0)));
        let other = Arc::clone(&handle);

        other.lock().resize(Viewport::new(20.0, 5.0));

        assert_eq!(handle.lock().size(), Viewport::new(20.0, 5.0));
    }
}
