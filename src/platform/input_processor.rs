//=========================================================================
// Input Processor
//=========================================================================
//
// Converts platform-specific winit events into engine InputEvents.
//
// Architecture:
//   Winit Events → InputProcessor → InputEvent (engine type) → InputBuffer
//
// Only the pointer is tracked: cursor movement and mouse buttons.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::event::{ElementState, MouseButton as WinitMouseButton};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, MouseButton};

//=== InputProcessor ======================================================

/// Converts winit pointer events to engine InputEvents.
pub(crate) struct InputProcessor;

impl InputProcessor {
    pub(crate) fn new() -> Self {
        Self
    }

    /// Converts a winit mouse button event.
    pub(crate) fn process_mouse_button(&self, button: WinitMouseButton, state: ElementState) -> InputEvent {
        let button = MouseButton::from(button);

        match state {
            ElementState::Pressed => InputEvent::MouseButtonDown { button },
            ElementState::Released => InputEvent::MouseButtonUp { button },
        }
    }

    /// Creates a mouse move event (physical pixels, top-left origin).
    pub(crate) fn process_mouse_move(&self, x: f32, y: f32) -> InputEvent {
        InputEvent::MouseMoved { x, y }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts winit mouse buttons to engine mouse buttons.
///
/// Back/Forward map to `Other(3)`/`Other(4)`.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            WinitMouseButton::Back => MouseButton::Other(3),
            WinitMouseButton::Forward => MouseButton::Other(4),
            WinitMouseButton::Other(code) => MouseButton::Other(code),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_map_to_down_and_up() {
        let processor = InputProcessor::new();

        assert_eq!(
            processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed),
            InputEvent::MouseButtonDown {
                button: MouseButton::Left
            }
        );
        assert_eq!(
            processor.process_mouse_button(WinitMouseButton::Right, ElementState::Released),
            InputEvent::MouseButtonUp {
                button: MouseButton::Right
            }
        );
    }

    #[test]
    fn extra_buttons_map_to_other() {
        assert_eq!(MouseButton::from(WinitMouseButton::Back), MouseButton::Other(3));
        assert_eq!(MouseButton::from(WinitMouseButton::Other(9)), MouseButton::Other(9));
    }

    #[test]
    fn mouse_move_keeps_coordinates() {
        let event = InputProcessor::new().process_mouse_move(12.5, 40.0);
        assert!(matches!(event, InputEvent::MouseMoved { x, y } if x == 12.5 && y == 40.0));
    }
}
