//=========================================================================
// Input
//
// Pointer input snapshot exposed to screen states through the context.
//
// The platform thread produces `InputEvent` batches; the core thread folds
// each frame's batches into a `StateTracker` before any state updates, so
// every state sees the same snapshot for the whole tick.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
mod state_tracker;

//=== Public API ==========================================================

pub use event::{InputEvent, MouseButton};
pub use state_tracker::StateTracker;
