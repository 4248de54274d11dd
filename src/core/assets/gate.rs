//=========================================================================
// Readiness Gate
//=========================================================================
//
// One-shot, multi-waiter notification for asynchronously loaded assets.
//
// States:
//   Pending(waiters) ──fire(payload)──► Fired(payload)   (terminal)
//
// Rules:
// - on_ready() while Pending queues the callback (FIFO)
// - on_ready() while Fired runs the callback immediately, on the caller
// - fire() drains the queue exactly once; a second fire is a contract
//   violation reported loudly
//
// Callbacks always run outside the lock: a callback may register further
// callbacks, and a registration racing with fire() lands either in the
// drained queue or in the Fired branch, never both and never neither.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::{debug, error};
use parking_lot::Mutex;

//=== Internal Dependencies ===============================================

use crate::error::AssetError;

//=== Types ===============================================================

/// Callback waiting for the gate payload.
pub type ReadyCallback<T> = Box<dyn FnOnce(&T) + Send + 'static>;

enum GateState<T> {
    Pending(Vec<ReadyCallback<T>>),
    Fired(T),
}

//=== ReadinessGate =======================================================

/// One-shot notification carrying a cloneable payload.
pub struct ReadinessGate<T: Clone + Send + 'static> {
    state: Mutex<GateState<T>>,
}

impl<T: Clone + Send + 'static> ReadinessGate<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState::Pending(Vec::new())),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Runs `callback` exactly once with the payload.
    ///
    /// If the gate already fired, `callback` runs before this returns.
    pub fn on_ready<F>(&self, callback: F)
    where
        F: FnOnce(&T) + Send + 'static,
    {
        let payload = {
            let mut state = self.state.lock();
            match &mut *state {
                GateState::Pending(waiters) => {
                    waiters.push(Box::new(callback));
                    return;
                }
                GateState::Fired(payload) => payload.clone(),
            }
        };

        callback(&payload);
    }

    //--- Firing -----------------------------------------------------------

    /// Fires the gate, invoking every queued callback in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::AlreadyFired`] (and logs at error level) if the
    /// gate has fired before. The cached payload is left untouched.
    pub fn try_fire(&self, payload: T) -> Result<(), AssetError> {
        let waiters = {
            let mut state = self.state.lock();
            match std::mem::replace(&mut *state, GateState::Fired(payload.clone())) {
                GateState::Pending(waiters) => waiters,
                GateState::Fired(original) => {
                    *state = GateState::Fired(original);
                    error!("Readiness gate fired twice; asset collaborator contract violated");
                    return Err(AssetError::AlreadyFired);
                }
            }
        };

        debug!("Readiness gate fired, notifying {} waiter(s)", waiters.len());
        for callback in waiters {
            callback(&payload);
        }

        Ok(())
    }

    /// Fires the gate.
    ///
    /// # Panics
    ///
    /// Panics if the gate has already fired.
    pub fn fire(&self, payload: T) {
        if let Err(err) = self.try_fire(payload) {
            panic!("{}", err);
        }
    }

    //--- Query API --------------------------------------------------------

    pub fn is_ready(&self) -> bool {
        matches!(*self.state.lock(), GateState::Fired(_))
    }

    /// Number of callbacks still waiting (0 once fired).
    pub fn pending_count(&self) -> usize {
        match &*self.state.lock() {
            GateState::Pending(waiters) => waiters.len(),
            GateState::Fired(_) => 0,
        }
    }

    /// Clone of the payload, if fired.
    pub fn payload(&self) -> Option<T> {
        match &*self.state.lock() {
            GateState::Fired(payload) => Some(payload.clone()),
            GateState::Pending(_) => None,
        }
    }
}

//--- Trait Implementations -----------------------------------------------

impl<T: Clone + Send + 'static> Default for ReadinessGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> fmt::Debug for ReadinessGate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadinessGate")
            .field("ready", &self.is_ready())
            .field("pending", &self.pending_count())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn() -> ReadyCallback<u32>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let make = move || -> ReadyCallback<u32> {
            let sink = Arc::clone(&sink);
            Box::new(move |value: &u32| sink.lock().push(*value))
        };
        (seen, make)
    }

    //--- Before / After Fire ----------------------------------------------

    #[test]
    fn registration_before_fire_runs_once_on_fire() {
        let gate = ReadinessGate::new();
        let (seen, make) = recorder();

        gate.on_ready(make());
        assert!(seen.lock().is_empty(), "must not run before fire");
        assert_eq!(gate.pending_count(), 1);

        gate.fire(7);

        assert_eq!(*seen.lock(), vec![7]);
        assert_eq!(gate.pending_count(), 0);
    }

    #[test]
    fn registration_after_fire_runs_immediately_with_cached_payload() {
        let gate = ReadinessGate::new();
        gate.fire(42);

        let (seen, make) = recorder();
        gate.on_ready(make());

        assert_eq!(*seen.lock(), vec![42]);
        assert_eq!(gate.payload(), Some(42));
    }

    #[test]
    fn waiters_run_in_registration_order() {
        let gate = ReadinessGate::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let order = Arc::clone(&order);
            gate.on_ready(move |_: &u32| order.lock().push(i));
        }
        gate.fire(0);

        assert_eq!(*order.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn callback_may_register_another_callback() {
        let gate = Arc::new(ReadinessGate::new());
        let (seen, make) = recorder();

        let inner_gate = Arc::clone(&gate);
        let inner = make();
        gate.on_ready(move |_: &u32| inner_gate.on_ready(inner));
        gate.fire(3);

        assert_eq!(*seen.lock(), vec![3]);
    }

    //--- Double Fire ------------------------------------------------------

    #[test]
    fn second_try_fire_is_rejected_and_payload_kept() {
        let gate = ReadinessGate::new();
        gate.fire(1);

        assert_eq!(gate.try_fire(2), Err(AssetError::AlreadyFired));
        assert_eq!(gate.payload(), Some(1));
    }

    #[test]
    #[should_panic(expected = "readiness gate fired more than once")]
    fn second_fire_panics() {
        let gate = ReadinessGate::new();
        gate.fire(1);
        gate.fire(2);
    }

    #[test]
    fn double_fire_does_not_rerun_waiters() {
        let gate = ReadinessGate::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        gate.on_ready(move |_: &u32| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        gate.fire(1);
        let _ = gate.try_fire(2);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    //--- Concurrency ------------------------------------------------------

    #[test]
    fn concurrent_registrations_each_run_exactly_once() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 200;

        let gate = Arc::new(ReadinessGate::new());
        let count = Arc::new(AtomicUsize::new(0));
        let start = Arc::new(Barrier::new(THREADS + 1));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let gate = Arc::clone(&gate);
                let count = Arc::clone(&count);
                let start = Arc::clone(&start);
                thread::spawn(move || {
                    start.wait();
                    for _ in 0..PER_THREAD {
                        let count = Arc::clone(&count);
                        gate.on_ready(move |value: &u32| {
                            assert_eq!(*value, 99);
                            count.fetch_add(1, Ordering::SeqCst);
                        });
                    }
                })
            })
            .collect();

        start.wait();
        gate.fire(99);

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(count.load(Ordering::SeqCst), THREADS * PER_THREAD);
        assert_eq!(gate.pending_count(), 0);
    }
}
