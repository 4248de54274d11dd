//=========================================================================
// Transition Table
//=========================================================================
//
// Static mapping (current state, event) → next state.
//
// Built once during setup and validated when the machine starts, so a
// typo in a state key fails at startup rather than on the first click.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::warn;

//=== Internal Dependencies ===============================================

use super::{EventId, StateKey};
use crate::error::StateError;

//=== TransitionTable =====================================================

/// Lookup table of legal transitions.
///
/// # Example
///
/// ```rust
/// # use aetheric_stage::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Screen { Play, Over }
/// # impl StateKey for Screen {}
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Signal { Ended, Restart }
/// # impl EventId for Signal {}
/// let table = TransitionTable::new()
///     .on(Screen::Play, Signal::Ended, Screen::Over)
///     .on(Screen::Over, Signal::Restart, Screen::Play);
///
/// assert_eq!(table.next(Screen::Play, Signal::Ended), Some(Screen::Over));
/// assert_eq!(table.next(Screen::Play, Signal::Restart), None);
/// ```
#[derive(Debug, Clone)]
pub struct TransitionTable<K: StateKey, E: EventId> {
    edges: HashMap<(K, E), K>,
}

impl<K: StateKey, E: EventId> TransitionTable<K, E> {
    pub fn new() -> Self {
        Self { edges: HashMap::new() }
    }

    //--- Building ---------------------------------------------------------

    /// Adds `from --event--> to`, builder style.
    pub fn on(mut self, from: K, event: E, to: K) -> Self {
        self.insert(from, event, to);
        self
    }

    /// Adds `from --event--> to`, replacing (with a warning) any existing edge.
    pub fn insert(&mut self, from: K, event: E, to: K) {
        if let Some(previous) = self.edges.insert((from, event), to) {
            warn!("Transition {:?} --{:?}--> {:?} replaced by {:?}", from, event, previous, to);
        }
    }

    //--- Query API --------------------------------------------------------

    /// Next state for `event` while in `from`, or `None` if unmapped.
    pub fn next(&self, from: K, event: E) -> Option<K> {
        self.edges.get(&(from, event)).copied()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Every state key the table mentions, as source or target.
    pub fn referenced_keys(&self) -> impl Iterator<Item = K> + '_ {
        self.edges.iter().flat_map(|(&(from, _), &to)| [from, to])
    }

    //--- Validation -------------------------------------------------------

    /// Checks that every referenced key passes `is_registered`.
    pub fn validate<F>(&self, is_registered: F) -> Result<(), StateError>
    where
        F: Fn(&K) -> bool,
    {
        match self.referenced_keys().find(|key| !is_registered(key)) {
            Some(missing) => Err(StateError::Unregistered(format!("{:?}", missing))),
            None => Ok(()),
        }
    }
}

impl<K: StateKey, E: EventId> Default for TransitionTable<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
