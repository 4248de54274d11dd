//=========================================================================
// State Machine Driver
//=========================================================================
//
// Owns every registered screen state, routes `update` to the active one
// and performs transitions at the end of the tick that requested them.
//
// States are stored in a HashMap by key with a per-slot lifecycle flag,
// so a state keeps its resources between activations (unless the
// retention policy says otherwise).
//
// Transition order (all inside one tick):
//   current.exit() → [current.dispose()] → next.construct() (if needed) → next.enter()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, error, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::{Construction, Emitter, EventId, MachinePolicy, Retention, ScreenState, StateKey, TransitionTable};
use crate::core::globals::GlobalContext;
use crate::error::StateError;

//=== Lifecycle ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Unconstructed,
    Inactive,
    Active,
}

struct Slot<E: EventId> {
    state: Box<dyn ScreenState<E>>,
    lifecycle: Lifecycle,
}

impl<E: EventId> Slot<E> {
    fn ensure_constructed(&mut self, context: &GlobalContext) {
        if self.lifecycle == Lifecycle::Unconstructed {
            self.state.construct(context);
            self.lifecycle = Lifecycle::Inactive;
        }
    }
}

//=== StateMachine ========================================================

/// Drives one active [`ScreenState`] at a time over a static transition table.
///
/// # Example
///
/// ```rust
/// # use aetheric_stage::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Screen { Play, Over }
/// # impl StateKey for Screen {}
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Signal { Ended }
/// # impl EventId for Signal {}
/// # struct Idle;
/// # impl ScreenState<Signal> for Idle {
/// #     fn update(&mut self, _ctx: &GlobalContext, _emit: &mut Emitter<Signal>) {}
/// # }
/// let ctx = GlobalContext::headless(Viewport::new(800.0, 600.0));
/// let mut machine = StateMachine::new();
/// machine.register_initial(Screen::Play, Idle);
/// machine.register(Screen::Over, Idle);
/// machine.set_table(TransitionTable::new().on(Screen::Play, Signal::Ended, Screen::Over));
///
/// machine.start(&ctx).unwrap();
/// machine.tick(&ctx);
/// assert_eq!(machine.active(), Some(Screen::Play));
/// ```
pub struct StateMachine<K: StateKey, E: EventId> {
    slots: HashMap<K, Slot<E>>,
    table: TransitionTable<K, E>,
    initial: Option<K>,
    active: Option<K>,
    policy: MachinePolicy,
}

impl<K: StateKey, E: EventId> StateMachine<K, E> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty machine with the default policy.
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            table: TransitionTable::new(),
            initial: None,
            active: None,
            policy: MachinePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MachinePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn set_policy(&mut self, policy: MachinePolicy) {
        self.policy = policy;
    }

    pub fn policy(&self) -> &MachinePolicy {
        &self.policy
    }

    //--- Registration -----------------------------------------------------

    /// Registers a state under `key`. The state is boxed for storage.
    ///
    /// Re-registering a key replaces the old state (with a warning), except
    /// for the active state, which cannot be replaced while running.
    pub fn register<T>(&mut self, key: K, state: T)
    where
        T: ScreenState<E> + 'static,
    {
        if self.active == Some(key) {
            warn!("State {:?} is active and cannot be replaced", key);
            return;
        }

        let slot = Slot {
            state: Box::new(state),
            lifecycle: Lifecycle::Unconstructed,
        };
        if self.slots.insert(key, slot).is_some() {
            warn!("State {:?} was already registered and has been replaced", key);
        }
    }

    /// Registers a state and marks it as the initial state.
    pub fn register_initial<T>(&mut self, key: K, state: T)
    where
        T: ScreenState<E> + 'static,
    {
        self.register(key, state);
        self.set_initial(key);
    }

    pub fn set_initial(&mut self, key: K) {
        if let Some(previous) = self.initial.replace(key) {
            if previous != key {
                debug!("Initial state changed from {:?} to {:?}", previous, key);
            }
        }
    }

    /// Replaces the transition table.
    pub fn set_table(&mut self, table: TransitionTable<K, E>) {
        self.table = table;
    }

    /// Adds a single `from --event--> to` edge.
    pub fn on(&mut self, from: K, event: E, to: K) -> &mut Self {
        self.table.insert(from, event, to);
        self
    }

    pub fn table(&self) -> &TransitionTable<K, E> {
        &self.table
    }

    //--- Start / Stop -----------------------------------------------------

    /// Validates the setup and enters the initial state.
    ///
    /// # Errors
    ///
    /// - [`StateError::AlreadyStarted`] if a state is already active
    /// - [`StateError::NoInitialState`] if no initial state was set
    /// - [`StateError::Unregistered`] if the initial state or any state in
    ///   the transition table was never registered
    pub fn start(&mut self, context: &GlobalContext) -> Result<(), StateError> {
        if let Some(active) = self.active {
            return Err(StateError::AlreadyStarted(format!("{:?}", active)));
        }

        let initial = self.initial.ok_or(StateError::NoInitialState)?;
        if !self.slots.contains_key(&initial) {
            return Err(StateError::Unregistered(format!("{:?}", initial)));
        }
        self.table.validate(|key| self.slots.contains_key(key))?;

        if self.policy.construction == Construction::Eager {
            debug!("Constructing {} state(s) eagerly", self.slots.len());
            for slot in self.slots.values_mut() {
                slot.ensure_constructed(context);
            }
        }

        info!(
            "Starting state machine in {:?} ({} states, {} transitions)",
            initial,
            self.slots.len(),
            self.table.len()
        );
        self.activate(initial, context);
        Ok(())
    }

    /// Exits the active state and leaves the machine idle.
    pub fn stop(&mut self, context: &GlobalContext) {
        if let Some(active) = self.active.take() {
            debug!("Stopping state machine (exiting {:?})", active);
            self.deactivate(active, context);
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Updates the active state and applies the transition it requested.
    ///
    /// Returns the new active key when a transition happened. Unmapped
    /// events are ignored (or panic under `strict_transitions`).
    pub fn tick(&mut self, context: &GlobalContext) -> Option<K> {
        let current = self.active?;
        let Some(slot) = self.slots.get_mut(&current) else {
            error!("Active state {:?} is not registered", current);
            return None;
        };

        let mut emitter = Emitter::new();
        slot.state.update(context, &mut emitter);

        let event = emitter.event()?;
        let Some(next) = self.table.next(current, event) else {
            if self.policy.strict_transitions {
                panic!("No transition from {:?} on {:?}", current, event);
            }
            debug!("Ignoring event {:?} in {:?} (no transition)", event, current);
            return None;
        };

        if !self.slots.contains_key(&next) {
            error!("Transition {:?} --{:?}--> {:?} targets an unregistered state", current, event, next);
            return None;
        }

        debug!("Transition {:?} --{:?}--> {:?}", current, event, next);
        self.deactivate(current, context);
        self.activate(next, context);
        Some(next)
    }

    //--- Query API --------------------------------------------------------

    /// Next state for `event` from the active state, without transitioning.
    pub fn transition(&self, event: E) -> Option<K> {
        self.active.and_then(|current| self.table.next(current, event))
    }

    pub fn active(&self) -> Option<K> {
        self.active
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_registered(&self, key: K) -> bool {
        self.slots.contains_key(&key)
    }

    pub fn is_constructed(&self, key: K) -> bool {
        self.slots
            .get(&key)
            .is_some_and(|slot| slot.lifecycle != Lifecycle::Unconstructed)
    }

    //--- Internal Helpers -------------------------------------------------

    fn activate(&mut self, key: K, context: &GlobalContext) {
        let Some(slot) = self.slots.get_mut(&key) else {
            warn!("Attempted to enter unregistered state {:?}", key);
            return;
        };

        slot.ensure_constructed(context);
        slot.state.enter(context);
        slot.lifecycle = Lifecycle::Active;
        self.active = Some(key);
        trace!("Entered {:?}", key);
    }

    fn deactivate(&mut self, key: K, context: &GlobalContext) {
        let Some(slot) = self.slots.get_mut(&key) else { return };

        slot.state.exit(context);
        slot.lifecycle = Lifecycle::Inactive;

        if self.policy.retention == Retention::DisposeOnExit {
            slot.state.dispose(context);
            slot.lifecycle = Lifecycle::Unconstructed;
            trace!("Disposed {:?}", key);
        }

        if self.active == Some(key) {
            self.active = None;
        }
    }
}

impl<K: StateKey, E: EventId> Default for StateMachine<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::core::render::Viewport;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Screen {
        A,
        B,
        C,
    }

    impl StateKey for Screen {}

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Signal {
        Go,
        Back,
        Nowhere,
    }

    impl EventId for Signal {}

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Construct(Screen),
        Enter(Screen),
        Update(Screen),
        Exit(Screen),
        Dispose(Screen),
    }

    type Log = Arc<Mutex<Vec<Call>>>;

    /// Records every hook and emits whatever is queued in `script`.
    struct Recorder {
        key: Screen,
        log: Log,
        script: Arc<Mutex<Vec<Signal>>>,
    }

    impl ScreenState<Signal> for Recorder {
        fn construct(&mut self, _ctx: &GlobalContext) {
            self.log.lock().push(Call::Construct(self.key));
        }
        fn enter(&mut self, _ctx: &GlobalContext) {
            self.log.lock().push(Call::Enter(self.key));
        }
        fn update(&mut self, _ctx: &GlobalContext, emit: &mut Emitter<Signal>) {
            self.log.lock().push(Call::Update(self.key));
            for signal in self.script.lock().drain(..) {
                emit.emit(signal);
            }
        }
        fn exit(&mut self, _ctx: &GlobalContext) {
            self.log.lock().push(Call::Exit(self.key));
        }
        fn dispose(&mut self, _ctx: &GlobalContext) {
            self.log.lock().push(Call::Dispose(self.key));
        }
    }

    struct Fixture {
        ctx: GlobalContext,
        machine: StateMachine<Screen, Signal>,
        log: Log,
        script_a: Arc<Mutex<Vec<Signal>>>,
        script_b: Arc<Mutex<Vec<Signal>>>,
    }

    fn fixture(policy: MachinePolicy) -> Fixture {
        let log: Log = Arc::default();
        let script_a = Arc::new(Mutex::new(Vec::new()));
        let script_b = Arc::new(Mutex::new(Vec::new()));

        let mut machine = StateMachine::new().with_policy(policy);
        machine.register_initial(
            Screen::A,
            Recorder {
                key: Screen::A,
                log: Arc::clone(&log),
                script: Arc::clone(&script_a),
            },
        );
        machine.register(
            Screen::B,
            Recorder {
                key: Screen::B,
                log: Arc::clone(&log),
                script: Arc::clone(&script_b),
            },
        );
        machine
            .on(Screen::A, Signal::Go, Screen::B)
            .on(Screen::B, Signal::Back, Screen::A);

        Fixture {
            ctx: GlobalContext::headless(Viewport::new(800.0, 600.0)),
            machine,
            log,
            script_a,
            script_b,
        }
    }

    //=====================================================================
    // Start
    //=====================================================================

    #[test]
    fn start_constructs_and_enters_initial_only() {
        let mut f = fixture(MachinePolicy::default());
        f.machine.start(&f.ctx).unwrap();

        assert_eq!(*f.log.lock(), vec![Call::Construct(Screen::A), Call::Enter(Screen::A)]);
        assert_eq!(f.machine.active(), Some(Screen::A));
        assert!(!f.machine.is_constructed(Screen::B));
    }

    #[test]
    fn eager_policy_constructs_everything_at_start() {
        let policy = MachinePolicy {
            construction: Construction::Eager,
            ..MachinePolicy::default()
        };
        let mut f = fixture(policy);
        f.machine.start(&f.ctx).unwrap();

        assert!(f.machine.is_constructed(Screen::B));
        let constructs = f.log.lock().iter().filter(|c| matches!(c, Call::Construct(_))).count();
        assert_eq!(constructs, 2);
    }

    #[test]
    fn start_without_initial_fails() {
        let mut machine = StateMachine::<Screen, Signal>::new();
        let ctx = GlobalContext::headless(Viewport::new(1.0, 1.0));
        assert_eq!(machine.start(&ctx), Err(StateError::NoInitialState));
    }

    #[test]
    fn start_with_unregistered_initial_fails() {
        let mut f = fixture(MachinePolicy::default());
        f.machine.set_initial(Screen::C);
        assert_eq!(f.machine.start(&f.ctx), Err(StateError::Unregistered("C".into())));
        assert!(f.log.lock().is_empty());
    }

    #[test]
    fn start_with_dangling_transition_fails() {
        let mut f = fixture(MachinePolicy::default());
        f.machine.on(Screen::B, Signal::Go, Screen::C);
        assert_eq!(f.machine.start(&f.ctx), Err(StateError::Unregistered("C".into())));
        assert!(!f.machine.is_running());
    }

    #[test]
    fn start_twice_fails() {
        let mut f = fixture(MachinePolicy::default());
        f.machine.start(&f.ctx).unwrap();
        assert_eq!(f.machine.start(&f.ctx), Err(StateError::AlreadyStarted("A".into())));
    }

    //=====================================================================
    // Tick / Transitions
    //=====================================================================

    #[test]
    fn tick_before_start_is_noop() {
        let mut f = fixture(MachinePolicy::default());
        assert_eq!(f.machine.tick(&f.ctx), None);
        assert!(f.log.lock().is_empty());
    }

    #[test]
    fn mapped_event_runs_exit_construct_enter_in_order() {
        let mut f = fixture(MachinePolicy::default());
        f.machine.start(&f.ctx).unwrap();
        f.log.lock().clear();

        f.script_a.lock().push(Signal::Go);
        assert_eq!(f.machine.tick(&f.ctx), Some(Screen::B));

        assert_eq!(
            *f.log.lock(),
            vec![
                Call::Update(Screen::A),
                Call::Exit(Screen::A),
                Call::Construct(Screen::B),
                Call::Enter(Screen::B),
            ]
        );
        assert_eq!(f.machine.active(), Some(Screen::B));
    }

    #[test]
    fn reentry_does_not_reconstruct() {
        let mut f = fixture(MachinePolicy::default());
        f.machine.start(&f.ctx).unwrap();

        f.script_a.lock().push(Signal::Go);
        f.machine.tick(&f.ctx);
        f.script_b.lock().push(Signal::Back);
        f.machine.tick(&f.ctx);
        f.script_a.lock().push(Signal::Go);
        f.machine.tick(&f.ctx);

        let log = f.log.lock();
        let constructs_b = log.iter().filter(|c| **c == Call::Construct(Screen::B)).count();
        let enters_b = log.iter().filter(|c| **c == Call::Enter(Screen::B)).count();
        assert_eq!(constructs_b, 1);
        assert_eq!(enters_b, 2);
    }

    #[test]
    fn unmapped_event_leaves_state_unchanged() {
        let mut f = fixture(MachinePolicy::default());
        f.machine.start(&f.ctx).unwrap();
        f.log.lock().clear();

        f.script_a.lock().push(Signal::Nowhere);
        assert_eq!(f.machine.tick(&f.ctx), None);

        assert_eq!(f.machine.active(), Some(Screen::A));
        assert_eq!(*f.log.lock(), vec![Call::Update(Screen::A)]);
    }

    #[test]
    #[should_panic(expected = "No transition from A on Nowhere")]
    fn strict_mode_panics_on_unmapped_event() {
        let policy = MachinePolicy {
            strict_transitions: true,
            ..MachinePolicy::default()
        };
        let mut f = fixture(policy);
        f.machine.start(&f.ctx).unwrap();

        f.script_a.lock().push(Signal::Nowhere);
        f.machine.tick(&f.ctx);
    }

    #[test]
    fn second_emit_in_same_tick_is_ignored() {
        let mut f = fixture(MachinePolicy::default());
        f.machine.start(&f.ctx).unwrap();

        f.script_a.lock().extend([Signal::Nowhere, Signal::Go]);
        assert_eq!(f.machine.tick(&f.ctx), None);
        assert_eq!(f.machine.active(), Some(Screen::A));
    }

    #[test]
    fn new_state_is_updated_on_next_tick() {
        let mut f = fixture(MachinePolicy::default());
        f.machine.start(&f.ctx).unwrap();

        f.script_a.lock().push(Signal::Go);
        f.machine.tick(&f.ctx);
        assert!(!f.log.lock().contains(&Call::Update(Screen::B)));

        f.machine.tick(&f.ctx);
        assert_eq!(f.log.lock().last(), Some(&Call::Update(Screen::B)));
    }

    #[test]
    fn self_transition_exits_and_reenters() {
        let mut f = fixture(MachinePolicy::default());
        f.machine.on(Screen::A, Signal::Nowhere, Screen::A);
        f.machine.start(&f.ctx).unwrap();
        f.log.lock().clear();

        f.script_a.lock().push(Signal::Nowhere);
        assert_eq!(f.machine.tick(&f.ctx), Some(Screen::A));
        assert_eq!(
            *f.log.lock(),
            vec![Call::Update(Screen::A), Call::Exit(Screen::A), Call::Enter(Screen::A)]
        );
    }

    #[test]
    fn transition_query_does_not_switch() {
        let mut f = fixture(MachinePolicy::default());
        assert_eq!(f.machine.transition(Signal::Go), None);
        f.machine.start(&f.ctx).unwrap();
        assert_eq!(f.machine.transition(Signal::Go), Some(Screen::B));
        assert_eq!(f.machine.transition(Signal::Back), None);
        assert_eq!(f.machine.active(), Some(Screen::A));
    }

    //=====================================================================
    // Retention / Stop
    //=====================================================================

    #[test]
    fn dispose_on_exit_reconstructs_on_reentry() {
        let policy = MachinePolicy {
            retention: Retention::DisposeOnExit,
            ..MachinePolicy::default()
        };
        let mut f = fixture(policy);
        f.machine.start(&f.ctx).unwrap();

        f.script_a.lock().push(Signal::Go);
        f.machine.tick(&f.ctx);
        assert!(!f.machine.is_constructed(Screen::A));

        f.script_b.lock().push(Signal::Back);
        f.machine.tick(&f.ctx);

        let log = f.log.lock();
        assert!(log.contains(&Call::Dispose(Screen::A)));
        assert_eq!(log.iter().filter(|c| **c == Call::Construct(Screen::A)).count(), 2);
    }

    #[test]
    fn stop_exits_active_state() {
        let mut f = fixture(MachinePolicy::default());
        f.machine.start(&f.ctx).unwrap();
        f.machine.stop(&f.ctx);

        assert_eq!(f.log.lock().last(), Some(&Call::Exit(Screen::A)));
        assert!(!f.machine.is_running());
        assert!(f.machine.is_constructed(Screen::A));
    }

    #[test]
    fn active_state_cannot_be_replaced() {
        let mut f = fixture(MachinePolicy::default());
        f.machine.start(&f.ctx).unwrap();

        let other: Log = Arc::default();
        f.machine.register(
            Screen::A,
            Recorder {
                key: Screen::A,
                log: Arc::clone(&other),
                script: Arc::default(),
            },
        );
        f.machine.tick(&f.ctx);

        assert!(other.lock().is_empty());
    }
}
