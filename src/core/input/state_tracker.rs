//=========================================================================
// State Tracker
//=========================================================================
//
// Pointer state with per-frame click tracking.
//
// Architecture:
//   InputEvent → process_events() → HashSet (buttons held) → query
//
// Frame lifecycle: clear() → process_events() → query
//
// Clicks are edge-triggered: `is_button_clicked` is true only on the
// frame the button went down, never while it is held.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, MouseButton};

//=== StateTracker ========================================================

/// Tracks persistent pointer state (buttons held, position) and the
/// buttons pressed this frame.
pub struct StateTracker {
    //--- Persistent State (survives frame boundary) ----------------------
    buttons_down: HashSet<MouseButton>,
    cursor_position: (f32, f32),

    //--- Frame Deltas (reset each frame via clear()) --------------------
    buttons_pressed_this_frame: HashSet<MouseButton>,
}

impl StateTracker {
    /// Creates a tracker with no buttons held and the cursor at the origin.
    pub fn new() -> Self {
        Self {
            buttons_down: HashSet::new(),
            cursor_position: (0.0, 0.0),
            buttons_pressed_this_frame: HashSet::new(),
        }
    }

    //--- Frame Processing -------------------------------------------------

    /// Runs a full frame: clears clicks, then applies every batch in order.
    pub(crate) fn apply_frame(&mut self, batches: &[Vec<InputEvent>]) {
        self.clear();
        for batch in batches {
            self.process_events(batch);
        }
    }

    /// Clears the clicks of the previous frame.
    pub(crate) fn clear(&mut self) {
        self.buttons_pressed_this_frame.clear();
    }

    /// Processes input events, updating internal state.
    pub(crate) fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.process_event(event);
        }
    }

    //--- Internal Helpers -------------------------------------------------
    fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::MouseButtonDown { button } => {
                // Only an up → down transition counts as a click
                if self.buttons_down.insert(*button) {
                    self.buttons_pressed_this_frame.insert(*button);
                }
            }

            InputEvent::MouseButtonUp { button } => {
                self.buttons_down.remove(button);
            }

            InputEvent::MouseMoved { x, y } => {
                self.cursor_position = (*x, *y);
            }
        }
    }

    //=====================================================================
    // Query API - Buttons
    //=====================================================================

    /// Returns `true` if the button was clicked this frame (edge-triggered).
    pub fn is_button_clicked(&self, button: MouseButton) -> bool {
        self.buttons_pressed_this_frame.contains(&button)
    }

    //=====================================================================
    // Query API - Cursor
    //=====================================================================

    /// Cursor position in physical pixels (top-left origin).
    pub fn cursor_position(&self) -> (f32, f32) {
        self.cursor_position
    }
}

//--- Trait Implementations -----------------------------------------------

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
