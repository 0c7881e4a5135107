//! The `Sender` / `OperationState` contract: a sender describes work, and
//! connecting it to a receiver produces an inert `OperationState` that must
//! be started to actually run anything.
//!
//! Grounded on the `connect`/`start` split used throughout
//! `lib_shared/inc/jar/concurrency/{schedule,then,start,wait}.hpp`.

/// An inert, started-once unit of work produced by [`Sender::connect`].
pub trait OperationState {
    fn start(self);
}

/// Describes asynchronous work that produces a `Self::Output` (or fails, or
/// is cancelled) once connected to a receiver and started.
///
/// Uses a generic associated type so each concrete sender can pick its own
/// `OperationState` type per receiver without boxing.
pub trait Sender {
    type Output;
    type State<R>: OperationState
    where
        R: super::receiver::Receiver<Self::Output> + Send + 'static;

    fn connect<R>(self, receiver: R) -> Self::State<R>
    where
        R: super::receiver::Receiver<Self::Output> + Send + 'static;
}
