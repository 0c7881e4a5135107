//! `start(sender)` and `wait(sender)`: the two ways to actually run a
//! sender.
//!
//! Grounded on `jar::concurrency::start`/`wait` (`start.hpp`, `wait.hpp`).
use crate::future::Future;

use super::receiver::ValueReceiver;
use super::sender::{OperationState, Sender};

/// Connects `sender` to a throwaway [`ValueReceiver`] and starts it
/// immediately, discarding the result. Fire-and-forget.
pub fn start<S>(sender: S)
where
    S: Sender,
    S::Output: Send + 'static,
{
    let receiver = ValueReceiver::<S::Output>::new();
    let state = sender.connect(receiver);
    state.start();
}

/// Connects `sender` to a [`ValueReceiver`], starts it, and returns the
/// paired future immediately — the caller decides if and when to block on
/// it via [`Future::wait`] / [`Future::get`].
pub fn wait<S>(sender: S) -> Future<S::Output>
where
    S: Sender,
    S::Output: Send + 'static,
{
    let receiver = ValueReceiver::<S::Output>::new();
    let future = receiver.future();
    let state = sender.connect(receiver);
    state.start();
    future
}
