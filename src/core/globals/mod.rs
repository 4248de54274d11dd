//=========================================================================
// Global Engine State
//=========================================================================
//
// Separates systems (logic components) from context (shared data).
//
// Architecture:
//   GlobalSystems: StateMachine (owned by orchestrator)
//   GlobalContext: StateTracker + surface + asset gate + audio + clock
//                  (passed read-only to screen states)
//
//=========================================================================

//=== Module Declarations =================================================

mod global_context;
mod global_systems;

//=== Public API ==========================================================

pub use global_context::{FrameClock, GlobalContext};
pub use global_systems::GlobalSystems;
