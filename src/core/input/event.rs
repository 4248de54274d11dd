//=========================================================================
// Input Event Types
//
// Engine-side representation of pointer input.
//
// The platform layer (winit) converts OS events into these types before
// they cross the thread boundary, so core code never depends on the
// windowing backend.
//
// Event Flow:
// ```text
// Platform Layer (winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    StateTracker (per-frame snapshot)
//         ↓
//    ScreenState::update (cursor + click queries)
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::hash::{Hash, Hasher};

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// `Left` is the primary button used for click-to-select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button / wheel click.
    Middle,

    /// Any other button, by platform index.
    Other(u16),
}

//=== InputEvent ==========================================================

/// A single normalized pointer event.
///
/// Button events are discrete (order matters); `MouseMoved` is continuous
/// and may be coalesced to the latest position per frame.
#[derive(Debug, Clone, Copy)]
pub enum InputEvent {
    /// Button transitioned up → down.
    MouseButtonDown { button: MouseButton },

    /// Button transitioned down → up.
    MouseButtonUp { button: MouseButton },

    /// Cursor moved to a position in physical pixels (top-left origin).
    MouseMoved { x: f32, y: f32 },
}

//=========================================================================
// Equality and Hashing
//
// `MouseMoved` compares equal regardless of coordinates so a HashSet of
// continuous events keeps only the latest position. Button events compare
// by variant and button.
//=========================================================================

impl PartialEq for InputEvent {
    fn eq(&self, other: &Self) -> bool {
        use InputEvent::*;
        match (self, other) {
            (MouseButtonDown { button: a }, MouseButtonDown { button: b }) => a == b,
            (MouseButtonUp { button: a }, MouseButtonUp { button: b }) => a == b,
            (MouseMoved { .. }, MouseMoved { .. }) => true,
            _ => false,
        }
    }
}

impl Eq for InputEvent {}

impl Hash for InputEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);

        match self {
            Self::MouseButtonDown { button } | Self::MouseButtonUp { button } => {
                button.hash(state);
            }
            Self::MouseMoved { .. } => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
