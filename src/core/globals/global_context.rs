//=========================================================================
// Global Context
//=========================================================================
//
// Shared data container for screen states.
//
// Contains state data that screen states read:
// - input: pointer snapshot (position, edge-triggered clicks)
// - surface: render target handle (pixel dimensions, drawing)
// - assets: readiness gate for the asynchronously loaded bundle
// - audio: listener that hands out sound handles
// - time: frame clock
//
// Mutated only by the owning scheduler between ticks.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

//=== Internal Dependencies ===============================================

use crate::core::assets::AssetGate;
use crate::core::audio::AudioListener;
use crate::core::input::{InputEvent, StateTracker};
use crate::core::render::{surface, HeadlessTarget, SurfaceHandle, Viewport};

//=== FrameClock ==========================================================

/// Tick timing in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    /// Seconds since the previous tick.
    pub delta: f32,
    /// Seconds since the first tick.
    pub elapsed: f32,
    /// Number of completed ticks.
    pub frame: u64,
}

impl FrameClock {
    fn advance(&mut self, delta: f32) {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.delta = delta;
        self.elapsed += delta;
        self.frame += 1;
    }
}

//=== GlobalContext =======================================================

/// Shared context data passed read-only into every lifecycle call.
///
/// # Available Data
///
/// - `input`: Pointer state (position, buttons clicked/held/released)
/// - `surface`: Shared render target
/// - `assets`: Asset readiness gate
/// - `audio`: Sound handle factory
/// - `time`: Delta/elapsed time of the current tick
pub struct GlobalContext {
    /// Pointer state tracker for the current frame.
    pub input: StateTracker,

    /// Render target the states' composers draw into.
    pub surface: SurfaceHandle,

    /// One-shot notification for the asset bundle.
    pub assets: Arc<AssetGate>,

    /// Audio listener for creating sound handles.
    pub audio: AudioListener,

    /// Frame timing.
    pub time: FrameClock,

    /// Input events for the current frame.
    ///
    /// Filled by the orchestrator from platform batches and folded into
    /// `input` at the start of the tick.
    pub(crate) frame_events: Vec<Vec<InputEvent>>,
}

impl GlobalContext {
    /// Creates a context around existing collaborators.
    pub fn new(surface: SurfaceHandle, assets: Arc<AssetGate>, audio: AudioListener) -> Self {
        Self {
            input: StateTracker::new(),
            surface,
            assets,
            audio,
            time: FrameClock::default(),
            frame_events: Vec::new(),
        }
    }

    /// Context with a recording surface, a fresh gate and silent audio.
    pub fn headless(viewport: Viewport) -> Self {
        Self::new(
            surface(HeadlessTarget::new(viewport)),
            Arc::new(AssetGate::new()),
            AudioListener::silent(),
        )
    }

    /// Current render target size in pixels.
    pub fn viewport(&self) -> Viewport {
        self.surface.lock().size()
    }

    //--- Scheduler API ----------------------------------------------------

    /// Starts a new tick: folds `batches` into the input snapshot and
    /// advances the clock by `delta` seconds.
    pub fn begin_frame(&mut self, batches: &[Vec<InputEvent>], delta: f32) {
        self.input.apply_frame(batches);
        self.time.advance(delta);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::MouseButton;

    #[test]
    fn headless_context_reports_viewport() {
        let ctx = GlobalContext::headless(Viewport::new(640.0, 480.0));
        assert_eq!(ctx.viewport(), Viewport::new(640.0, 480.0));
        assert!(!ctx.assets.is_ready());
    }

    #[test]
    fn begin_frame_updates_input_and_clock() {
        let mut ctx = GlobalContext::headless(Viewport::new(100.0, 100.0));
        let batch = vec![
            InputEvent::MouseMoved { x: 10.0, y: 20.0 },
            InputEvent::MouseButtonDown {
                button: MouseButton::Left,
            },
        ];

        ctx.begin_frame(&[batch], 0.5);
        assert!(ctx.input.is_button_clicked(MouseButton::Left));
        assert_eq!(ctx.input.cursor_position(), (10.0, 20.0));
        assert_eq!(ctx.time.delta, 0.5);

        ctx.begin_frame(&[], 0.25);
        assert!(!ctx.input.is_button_clicked(MouseButton::Left), "Held button is not a new click");
        assert_eq!(ctx.input.cursor_position(), (10.0, 20.0));
        assert_eq!(ctx.time.elapsed, 0.75);
        assert_eq!(ctx.time.frame, 2);
    }

    #[test]
    fn clock_ignores_bad_deltas() {
        let mut ctx = GlobalContext::headless(Viewport::new(1.0, 1.0));
        ctx.begin_frame(&[], -1.0);
        ctx.begin_frame(&[], f32::NAN);
        assert_eq!(ctx.time.elapsed, 0.0);
    }
}
