//=========================================================================
// Interaction
//=========================================================================
//
// Pointer hit-testing used by screen states each tick.
//
// Components:
// - `cursor`: pixel position → clamped unit-square position
// - `probe`: unit-square position + camera → ray → sorted hits
//
//=========================================================================

//=== Module Declarations =================================================

mod cursor;
mod probe;

//=== Public API ==========================================================

pub use cursor::{normalize, NormalizedPosition};
pub use probe::probe;
