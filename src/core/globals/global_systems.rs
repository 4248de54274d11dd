//=========================================================================
// Global Systems
//=========================================================================
//
// Container for engine-level systems with logic.
//
// Contains the state machine that drives the screen states. Systems
// operate on GlobalContext data.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::GlobalContext;
use crate::core::state::{EventId, StateKey, StateMachine};
use crate::error::StateError;

//=== GlobalSystems =======================================================

/// Container for engine-level logic systems.
///
/// # Available Systems
///
/// - `state_machine`: Screen state registration, transitions and lifecycle
pub struct GlobalSystems<K: StateKey, E: EventId> {
    /// The driver for screen states.
    ///
    /// Register states and the transition table here during
    /// [`crate::Engine::init`].
    pub state_machine: StateMachine<K, E>,
}

impl<K: StateKey, E: EventId> GlobalSystems<K, E> {
    /// Creates a new systems container with an empty state machine.
    ///
    /// This is typically called internally by the engine. Users should access
    /// systems via [`crate::Engine::init`] instead.
    pub(crate) fn new() -> Self {
        Self {
            state_machine: StateMachine::new(),
        }
    }

    /// Enters the initial state.
    pub(crate) fn start(&mut self, context: &GlobalContext) -> Result<(), StateError> {
        self.state_machine.start(context)
    }

    //--- Update Loop ------------------------------------------------------

    /// Updates all engine systems for the current frame.
    ///
    /// # Processing Pipeline
    ///
    /// 1. **Input**: folds the frame's platform batches into `context.input`
    /// 2. **Clock**: advances `context.time` by `delta`
    /// 3. **States**: ticks the state machine (update + transition)
    pub(crate) fn update(&mut self, context: &mut GlobalContext, delta: f32) {
        // 1-2. Input snapshot and clock
        let batches = std::mem::take(&mut context.frame_events);
        context.begin_frame(&batches, delta);

        // 3. Active state update and transition
        self.state_machine.tick(context);
    }

    /// Exits the active state.
    pub(crate) fn shutdown(&mut self, context: &GlobalContext) {
        self.state_machine.stop(context);
    }
}
