//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-core interface types.
//
// Defines the contract for communication between platform and core threads.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== PlatformEvent =======================================================

/// Events sent from platform to core over the bounded channel.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlatformEvent {
    /// Batched input events for a frame.
    Inputs {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    /// Window inner size changed (physical pixels).
    Resized { width: u32, height: u32 },

    /// Window close requested.
    WindowClosed,
}
