//=========================================================================
// Animation Collaborator
//=========================================================================
//
// Tween service advanced once per tick by the owning screen state.
//
// Architecture:
//   ScreenState
//     └─ Tweens (AnimationService)
//          └─ advance(dt, &mut SceneGraph) → Tween::step() → Property::set()
//
// Tweens targeting nodes that no longer exist are skipped, not removed.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::render::SceneGraph;

//=== Module Declarations =================================================

mod tween;

//=== Public API ==========================================================

pub use tween::{ease, Easing, Property, Repeat, Tween};

/// Handle returned by [`AnimationService::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(u32);

//=== AnimationService ====================================================

/// Time-driven property animation over a scene graph.
pub trait AnimationService: Send {
    fn add(&mut self, tween: Tween) -> TweenId;

    /// Advances every tween by `dt` seconds and writes values into `graph`.
    fn advance(&mut self, dt: f32, graph: &mut SceneGraph);

    /// Rewinds every tween to its start.
    fn restart_all(&mut self);

    fn clear(&mut self);

    fn get(&self, id: TweenId) -> Option<&Tween>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//=== Tweens ==============================================================

/// Default animation service: a flat list of tweens.
#[derive(Debug, Default)]
pub struct Tweens {
    entries: Vec<(TweenId, Tween)>,
    next_id: u32,
}

impl Tweens {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnimationService for Tweens {
    fn add(&mut self, tween: Tween) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, tween));
        id
    }

    fn advance(&mut self, dt: f32, graph: &mut SceneGraph) {
        for (id, tween) in &mut self.entries {
            let value = tween.step(dt);
            match graph.transform_mut(tween.node) {
                Some(transform) => tween.property.set(transform, value),
                None => trace!("Tween {:?} targets missing node {:?}", id, tween.node),
            }
        }
    }

    fn restart_all(&mut self) {
        for (_, tween) in &mut self.entries {
            tween.restart();
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn get(&self, id: TweenId) -> Option<&Tween> {
        self.entries.iter().find(|(entry, _)| *entry == id).map(|(_, tween)| tween)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
