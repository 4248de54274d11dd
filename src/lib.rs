//=========================================================================
// Aetheric Stage - Library Root
//
// This crate defines the public API surface of the Aetheric Stage: an
// interactive-scene controller built around screen states.
//
// Responsibilities:
// - Expose the engine facade (`Engine`, `EngineBuilder`)
// - Expose the screen-state contract and its driver (`core::state`)
// - Keep OS integration (`platform`) hidden from end users
// - Ship the showroom demo states
//
// Typical usage:
// ```no_run
// use aetheric_stage::prelude::*;
// use aetheric_stage::showroom::{self, ProceduralAssets, ShowroomEvent, ShowroomScreen};
//
// fn main() -> Result<(), EngineError> {
//     EngineBuilder::<ShowroomScreen, ShowroomEvent>::new()
//         .with_assets(ProceduralAssets::new())
//         .build()
//         .init(showroom::install)
//         .run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the stage systems: screen states and their driver,
// input, hit-testing, asset readiness and the render/animation/audio
// collaborators. `showroom` is the bundled demo built on top of it.
//
pub mod config;
pub mod core;
pub mod error;
pub mod prelude;
pub mod showroom;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the winit window and event loop and is not part of
// the public API surface. `engine` wires the threads together.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
