//=========================================================================
// Input Buffer
//
// Collects pointer events between two redraws into two categories:
// discrete and continuous. Acts as a transient event aggregator between
// the winit callbacks and the channel to the core thread.
//
// Responsibilities:
// - Store incoming platform events per frame
// - Deduplicate repeated discrete inputs (e.g., MouseButtonDown)
// - Coalesce continuous inputs (e.g., MouseMoved) to the latest value
// - Hand both lists over via `drain()`
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::collections::HashSet;

//=== Internal Modules ====================================================
use crate::core::input::InputEvent;

//=== InputBuffer Struct ==================================================
//
// Internally maintains:
// - `discrete`: ordered, one-shot inputs (button down/up)
// - `continuous`: last-known state of continuous inputs (cursor position)
//
pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    continuous: HashSet<InputEvent>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------
    pub fn new() -> Self {
        const DISCRETE_BASE: usize = 32;
        const CONTINUOUS_BASE: usize = 4;

        Self {
            discrete: Vec::with_capacity(DISCRETE_BASE),
            continuous: HashSet::with_capacity(CONTINUOUS_BASE),
        }
    }

    //--- Continuous Event Handling ---------------------------------------
    //
    // The latest event always replaces any previous one of the same kind.
    //
    pub fn push_continuous(&mut self, event: InputEvent) {
        self.continuous.replace(event);
    }

    //--- Discrete Event Handling -----------------------------------------
    //
    // Duplicate consecutive events are ignored to prevent flooding.
    //
    pub fn push_discrete(&mut self, event: InputEvent) {
        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    //--- Drain ------------------------------------------------------------
    //
    // Returns `(discrete, continuous)` and clears the buffer, or `None`
    // when nothing was buffered this frame.
    //
    pub fn drain(&mut self) -> Option<(Vec<InputEvent>, Vec<InputEvent>)> {
        if self.is_empty() {
            return None;
        }
        let discrete = std::mem::take(&mut self.discrete);
        let continuous = self.continuous.drain().collect();
        Some((discrete, continuous))
    }

    //--- Utilities --------------------------------------------------------
    pub fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.continuous.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
