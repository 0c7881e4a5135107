//! One-shot future/promise pair with cancellation and the broken-promise
//! state.
//!
//! Grounded on `jar::concurrency::future`/`promise`
//! (`lib_shared/inc/jar/concurrency/future.hpp`). `set_value`/`set_exception`/
//! `cancel` race to a single terminal state transition, decided inside the
//! same mutex that guards the payload rather than a separate atomic state
//! flag — the payload itself must move under a lock regardless, so folding
//! the transition check into that lock still gives "exactly one transition
//! wins" with one critical section instead of two synchronization points.
use std::sync::{Arc, Condvar, Mutex};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    Value,
    Error,
    Cancelled,
    Broken,
}

/// The outcome of a successfully-resolved future: either a produced value or
/// an explicit "the pipeline was cancelled" sentinel. For `V = ()` this is
/// an ok-or-cancelled shape for void results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FutureResult<V> {
    Value(V),
    Cancelled,
}

impl<V> FutureResult<V> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FutureResult::Cancelled)
    }

    /// Returns the value, panicking if this is the cancelled sentinel.
    pub fn unwrap(self) -> V {
        match self {
            FutureResult::Value(v) => v,
            FutureResult::Cancelled => panic!("called `FutureResult::unwrap()` on a cancelled result"),
        }
    }
}

enum Payload<V> {
    None,
    Value(FutureResult<V>),
    Error(Error),
    Taken,
}

struct Shared<V> {
    state: Mutex<State>,
    payload: Mutex<Payload<V>>,
    condition: Condvar,
}

impl<V> Shared<V> {
    fn new() -> Self {
        Self {
            state: Mutex::new(State::Init),
            payload: Mutex::new(Payload::None),
            condition: Condvar::new(),
        }
    }

    fn is_ready(state: &State) -> bool {
        *state != State::Init
    }

    /// Attempts the single allowed `Init -> target` transition, storing
    /// `payload` first. No-op (and returns `false`) if already terminal.
    fn transition(&self, target: State, payload: Payload<V>) -> bool {
        let mut state = self.state.lock().unwrap();
        if *state != State::Init {
            return false;
        }
        *self.payload.lock().unwrap() = payload;
        *state = target;
        drop(state);
        self.condition.notify_all();
        true
    }

    fn wait(&self) {
        let state = self.state.lock().unwrap();
        let _guard = self
            .condition
            .wait_while(state, |s| !Self::is_ready(s))
            .unwrap();
    }

    fn get(&self) -> Result<FutureResult<V>, Error> {
        self.wait();
        let state = *self.state.lock().unwrap();
        match state {
            State::Value | State::Cancelled => {
                let mut payload = self.payload.lock().unwrap();
                match std::mem::replace(&mut *payload, Payload::Taken) {
                    Payload::Value(v) => Ok(v),
                    Payload::Taken => panic!("future payload already consumed"),
                    _ => unreachable!("state/payload mismatch"),
                }
            }
            State::Error => {
                let mut payload = self.payload.lock().unwrap();
                match std::mem::replace(&mut *payload, Payload::Taken) {
                    Payload::Error(e) => Err(e),
                    Payload::Taken => panic!("future payload already consumed"),
                    _ => unreachable!("state/payload mismatch"),
                }
            }
            State::Broken => Err(Error::BrokenPromise),
            State::Init => unreachable!("wait() only returns once ready"),
        }
    }

    fn is_cancelled(&self) -> bool {
        *self.state.lock().unwrap() == State::Cancelled
    }
}

/// The consumer half of a one-shot value transfer.
///
/// Not [`Clone`]: a future has exactly one consumer. [`Promise::future`] may
/// be called more than once, though — repeated calls yield independent
/// `Future` handles sharing the same state, so every caller observes the
/// same outcome.
pub struct Future<V> {
    shared: Option<Arc<Shared<V>>>,
}

impl<V> Future<V> {
    fn new(shared: Arc<Shared<V>>) -> Self {
        Self { shared: Some(shared) }
    }

    /// A future with no backing shared state — [`Future::is_valid`] returns
    /// `false`; every other method panics if called.
    pub fn invalid() -> Self {
        Self { shared: None }
    }

    pub fn is_valid(&self) -> bool {
        self.shared.is_some()
    }

    /// Blocks until the producing promise reaches a terminal state.
    pub fn wait(&self) {
        self.shared.as_ref().expect("future is invalid").wait()
    }

    /// Waits, then consumes the result. Calling this a second time after a
    /// successful consumption panics.
    pub fn get(&self) -> Result<FutureResult<V>, Error> {
        self.shared.as_ref().expect("future is invalid").get()
    }

    /// Forwards cancellation to the shared state. A no-op if the state has
    /// already reached a terminal value/error.
    pub fn cancel(&self) {
        if let Some(shared) = &self.shared {
            shared.transition(State::Cancelled, Payload::Value(FutureResult::Cancelled));
        }
    }
}

/// The producer half of a one-shot value transfer.
pub struct Promise<V> {
    shared: Arc<Shared<V>>,
}

impl<V> Default for Promise<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Promise<V> {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::new()),
        }
    }

    /// Returns a [`Future`] sharing this promise's state.
    pub fn future(&self) -> Future<V> {
        Future::new(self.shared.clone())
    }

    /// Resolves the future with `value`. A no-op if already terminal.
    pub fn set_value(&self, value: V) {
        self.shared
            .transition(State::Value, Payload::Value(FutureResult::Value(value)));
    }

    /// Resolves the future with `error`. A no-op if already terminal.
    pub fn set_exception(&self, error: Error) {
        self.shared.transition(State::Error, Payload::Error(error));
    }

    /// Resolves the future as cancelled. A no-op if already terminal.
    pub fn cancel(&self) {
        self.shared
            .transition(State::Cancelled, Payload::Value(FutureResult::Cancelled));
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.is_cancelled()
    }
}

impl<V> Drop for Promise<V> {
    fn drop(&mut self) {
        // No-op if some other transition already happened.
        self.shared.transition(State::Broken, Payload::None);
    }
}
