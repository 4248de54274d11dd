//=========================================================================
// Screen States
//=========================================================================
//
// Finite-state-machine abstraction every interactive screen implements.
//
// Architecture:
//   StateMachine<K, E>
//     ├─ slots: HashMap<K, Box<dyn ScreenState<E>>> + lifecycle
//     ├─ table: TransitionTable<K, E>   ((K, E) → K, static)
//     └─ active: Option<K>
//
// Lifecycle per state:
//   Unconstructed ─construct─► Inactive ─enter─► Active ─exit─► Inactive ─enter─► ...
//
// Per tick:
//   active.update(ctx, emitter) → emitter.event() → table.next() →
//   exit(current) → construct(next, once) → enter(next) → swap
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::globals::GlobalContext;

//=== Module Declarations =================================================

mod machine;
mod policy;
mod transition_table;

//=== Public API ==========================================================

pub use machine::StateMachine;
pub use policy::{Construction, MachinePolicy, Retention};
pub use transition_table::TransitionTable;

//=== Marker Traits =======================================================

/// Identity of a registered screen state.
///
/// Typically implemented by a game-specific enum.
pub trait StateKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

/// Symbolic transition trigger emitted by a screen state.
pub trait EventId: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

//=== Emitter =============================================================

/// Collects the transition event a state emits during one `update`.
///
/// At most one event is kept per tick. The first emit wins; later emits
/// in the same tick are dropped with a warning.
#[derive(Debug)]
pub struct Emitter<E: EventId> {
    event: Option<E>,
}

impl<E: EventId> Emitter<E> {
    pub fn new() -> Self {
        Self { event: None }
    }

    /// Requests a transition.
    pub fn emit(&mut self, event: E) {
        match self.event {
            None => self.event = Some(event),
            Some(first) => warn!("Ignoring second event {:?} this tick (already emitted {:?})", event, first),
        }
    }

    /// The event emitted this tick, if any.
    pub fn event(&self) -> Option<E> {
        self.event
    }
}

impl<E: EventId> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

//=== ScreenState Trait ===================================================

/// One screen or mode of the application.
///
/// The driver guarantees the call order `construct` (once per residency)
/// → `enter` → `update`* → `exit`, repeated for every activation. All
/// hooks except `update` have empty defaults.
///
/// Hooks never fail: a state whose resources are not ready simply skips
/// the dependent work.
///
/// # Minimal Implementation
///
/// ```rust
/// # use aetheric_stage::prelude::*;
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Signal { Done }
/// impl EventId for Signal {}
///
/// struct Splash;
///
/// impl ScreenState<Signal> for Splash {
///     fn update(&mut self, ctx: &GlobalContext, emit: &mut Emitter<Signal>) {
///         if ctx.input.is_button_clicked(MouseButton::Left) {
///             emit.emit(Signal::Done);
///         }
///     }
/// }
/// ```
pub trait ScreenState<E: EventId>: Send {
    /// Allocates owned resources. Must not block on asset readiness.
    fn construct(&mut self, _context: &GlobalContext) {}

    /// Starts entry side effects. Safe after a previous `exit`.
    fn enter(&mut self, _context: &GlobalContext) {}

    /// Called every tick while active. Rendering is its last action.
    fn update(&mut self, context: &GlobalContext, emit: &mut Emitter<E>);

    /// Stops entry side effects. Safe without a previous `enter`.
    fn exit(&mut self, _context: &GlobalContext) {}

    /// Releases owned resources under [`Retention::DisposeOnExit`].
    ///
    /// The state is constructed again before its next `enter`.
    fn dispose(&mut self, _context: &GlobalContext) {}
}

//=========================================================================
// Unit Tests
//=========================================================================
