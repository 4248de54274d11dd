//=========================================================================
// Showroom
//=========================================================================
//
// Demo application built on the stage: a car on a turntable that
// highlights under the pointer and ends the game when clicked.
//
// States:
// ```text
//   Showroom ──GameEnded──► GameOver
//       ▲                      │
//       └──────Restart─────────┘
// ```
//
// Assets ("carModel", "carTexture", "carStartupSound", "carEngineSound")
// arrive through the readiness gate; `ProceduralAssets` synthesizes them.
//
//=========================================================================

//=== Module Declarations =================================================

mod assets;
mod game;
mod game_over;

//=== Public API ==========================================================

pub use assets::ProceduralAssets;
pub use game::GameState;
pub use game_over::GameOverState;

use crate::core::globals::GlobalSystems;
use crate::core::state::{EventId, StateKey, StateMachine};

//=== Asset Names =========================================================

pub const CAR_MODEL: &str = "carModel";
pub const CAR_TEXTURE: &str = "carTexture";
pub const CAR_STARTUP_SOUND: &str = "carStartupSound";
pub const CAR_ENGINE_SOUND: &str = "carEngineSound";

//=== Keys and Events =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShowroomScreen {
    Showroom,
    GameOver,
}

impl StateKey for ShowroomScreen {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShowroomEvent {
    /// The car was clicked.
    GameEnded,
    /// Any click on the game-over screen.
    Restart,
}

impl EventId for ShowroomEvent {}

//=== Setup ===============================================================

/// [`Engine::init`](crate::Engine::init) hook wiring the showroom.
pub fn install(systems: &mut GlobalSystems<ShowroomScreen, ShowroomEvent>) {
    register(&mut systems.state_machine);
}

/// Registers both screens and their transitions. `Showroom` is initial.
pub fn register(machine: &mut StateMachine<ShowroomScreen, ShowroomEvent>) {
    machine.register_initial(ShowroomScreen::Showroom, GameState::new());
    machine.register(ShowroomScreen::GameOver, GameOverState::new());

    machine
        .on(ShowroomScreen::Showroom, ShowroomEvent::GameEnded, ShowroomScreen::GameOver)
        .on(ShowroomScreen::GameOver, ShowroomEvent::Restart, ShowroomScreen::Showroom);
}
