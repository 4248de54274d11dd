//=========================================================================
// Core Systems Orchestrator
//
// Central coordinator for the screen-state systems running on the logic
// (non-platform) thread.
//
// Responsibilities:
// - Own the GlobalSystems (state machine) and the GlobalContext
// - Receive platform events via the bounded crossbeam channel
// - Maintain deterministic pacing using a fixed tick rate (TPS)
// - Start the initial state and exit the active one on shutdown
//
// Notes:
// The orchestrator runs independently from the platform layer. Each tick
// folds the frame's input into the context, advances the clock by a fixed
// 1/TPS and ticks the state machine. Communication with the platform
// occurs only through message passing.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::io;
use std::thread;
use std::time::{Duration, Instant};

//=== External Crates =====================================================

use crossbeam_channel::Receiver;
use log::{debug, info};

//=== Internal Modules ====================================================

pub mod animation;
pub mod assets;
pub mod audio;
pub mod globals;
pub mod input;
pub mod interaction;
pub(crate) mod platform_bridge;
pub mod render;
pub mod state;

use crate::error::StateError;
use globals::{GlobalContext, GlobalSystems};
use input::InputEvent;
use platform_bridge::{EventCollector, PlatformEvent, TickControl};
use state::{EventId, StateKey};

//=== CoreSystemsOrchestrator =============================================
//
// Manages the lifetime and update scheduling of the core systems.
//
pub(crate) struct CoreSystemsOrchestrator<K: StateKey, E: EventId> {
    systems: GlobalSystems<K, E>,
    context: GlobalContext,
}

impl<K: StateKey, E: EventId> CoreSystemsOrchestrator<K, E> {
    //--- Construction -----------------------------------------------------

    pub fn new(context: GlobalContext) -> Self {
        Self {
            systems: GlobalSystems::new(),
            context,
        }
    }

    /// Runs user initialization against the systems.
    pub fn init_systems<F>(&mut self, init_fn: F)
    where
        F: FnOnce(&mut GlobalSystems<K, E>),
    {
        init_fn(&mut self.systems);
    }

    //--- Lifecycle --------------------------------------------------------

    /// Validates the state machine and enters the initial state.
    pub fn start(&mut self) -> Result<(), StateError> {
        self.systems.start(&self.context)
    }

    /// Runs one tick with the given input batches.
    pub fn tick(&mut self, batches: Vec<Vec<InputEvent>>, delta: f32) {
        self.context.frame_events = batches;
        self.systems.update(&mut self.context, delta);
    }

    /// Exits the active state.
    pub fn shutdown(&mut self) {
        self.systems.shutdown(&self.context);
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn context(&self) -> &GlobalContext {
        &self.context
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Spawns the logic thread that ticks the systems at a fixed rate.
    //
    // Each tick:
    //  1. Collects platform events (input batches, resize, close)
    //  2. Applies the latest resize to the surface
    //  3. Updates the systems
    //  4. Sleeps to maintain fixed pacing
    //  5. Exits the active state when a shutdown signal is received
    //
    pub fn spawn_core_thread(mut self, receiver: Receiver<PlatformEvent>, tps: f64) -> io::Result<thread::JoinHandle<()>> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);
        let delta = frame_duration.as_secs_f32();

        thread::Builder::new().name("core".into()).spawn(move || {
            let mut collector = EventCollector::new(receiver);

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather platform events ------------------------
                if collector.collect_frame() == TickControl::Exit {
                    info!("Core thread exiting.");
                    break;
                }

                //--- Step 2: Resize ----------------------------------------
                if let Some(viewport) = collector.take_resize() {
                    debug!("Resizing surface to {}x{}", viewport.width, viewport.height);
                    self.context.surface.lock().resize(viewport);
                }

                //--- Step 3: Update systems --------------------------------
                self.tick(collector.take_batches(), delta);

                //--- Step 4: Maintain deterministic pacing ----------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }

            //--- Step 5: Leave the active state ---------------------------
            self.shutdown();
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossbeam_channel::bounded;
    use parking_lot::Mutex;

    use super::*;
    use crate::core::input::MouseButton;
    use crate::core::render::Viewport;
    use crate::core::state::{Emitter, ScreenState};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Screen {
        Only,
    }

    impl StateKey for Screen {}

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Signal {
        Never,
    }

    impl EventId for Signal {}

    #[derive(Default)]
    struct Probe {
        clicks: Arc<Mutex<u32>>,
        exits: Arc<Mutex<u32>>,
    }

    impl ScreenState<Signal> for Probe {
        fn update(&mut self, ctx: &GlobalContext, _emit: &mut Emitter<Signal>) {
            if ctx.input.is_button_clicked(MouseButton::Left) {
                *self.clicks.lock() += 1;
            }
        }

        fn exit(&mut self, _ctx: &GlobalContext) {
            *self.exits.lock() += 1;
        }
    }

    fn orchestrator() -> (CoreSystemsOrchestrator<Screen, Signal>, Arc<Mutex<u32>>, Arc<Mutex<u32>>) {
        let state = Probe::default();
        let clicks = Arc::clone(&state.clicks);
        let exits = Arc::clone(&state.exits);

        let mut orchestrator = CoreSystemsOrchestrator::new(GlobalContext::headless(Viewport::new(800.0, 600.0)));
        orchestrator.init_systems(|systems| systems.state_machine.register_initial(Screen::Only, state));
        (orchestrator, clicks, exits)
    }

    fn click_batch() -> Vec<Vec<InputEvent>> {
        vec![vec![InputEvent::MouseButtonDown {
            button: MouseButton::Left,
        }]]
    }

    #[test]
    fn tick_feeds_input_to_active_state() {
        let (mut orchestrator, clicks, _) = orchestrator();
        orchestrator.start().unwrap();

        orchestrator.tick(click_batch(), 1.0 / 60.0);
        orchestrator.tick(Vec::new(), 1.0 / 60.0);

        assert_eq!(*clicks.lock(), 1);
        assert_eq!(orchestrator.context().time.frame, 2);
    }

    #[test]
    fn core_thread_exits_state_on_window_close() {
        let (mut orchestrator, clicks, exits) = orchestrator();
        orchestrator.start().unwrap();
        let (tx, rx) = bounded(8);

        let handle = orchestrator.spawn_core_thread(rx, 240.0).unwrap();
        tx.send(PlatformEvent::Inputs {
            discrete: click_batch().remove(0),
            continuous: Vec::new(),
        })
        .unwrap();
        thread::sleep(Duration::from_millis(50));
        tx.send(PlatformEvent::WindowClosed).unwrap();
        handle.join().unwrap();

        assert_eq!(*clicks.lock(), 1);
        assert_eq!(*exits.lock(), 1);
    }

    #[test]
    fn core_thread_applies_resize() {
        let (mut orchestrator, _, _) = orchestrator();
        orchestrator.start().unwrap();
        let surface = Arc::clone(&orchestrator.context().surface);
        let (tx, rx) = bounded(8);

        let handle = orchestrator.spawn_core_thread(rx, 240.0).unwrap();
        tx.send(PlatformEvent::Resized { width: 1280, height: 720 }).unwrap();
        thread::sleep(Duration::from_millis(50));
        drop(tx);
        handle.join().unwrap();

        assert_eq!(surface.lock().size(), Viewport::new(1280.0, 720.0));
    }
}
