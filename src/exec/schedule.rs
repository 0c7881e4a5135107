//! `schedule(scheduler)`: a sender that completes with `()` once `scheduler`
//! has run it.
//!
//! Grounded on `jar::concurrency::schedule`/`details::schedule_sender`
//! (`schedule.hpp`).
use super::receiver::Receiver;
use super::sender::{OperationState, Sender};
use super::Scheduler;

pub struct ScheduleSender<S> {
    scheduler: S,
}

/// Wraps a [`Scheduler`] as a [`Sender`] whose completion means "this closure
/// has been handed to the scheduler and run".
pub fn schedule<S: Scheduler + Send + 'static>(scheduler: S) -> ScheduleSender<S> {
    ScheduleSender { scheduler }
}

pub struct ScheduleState<R, S> {
    receiver: R,
    scheduler: S,
}

impl<R, S> OperationState for ScheduleState<R, S>
where
    R: Receiver<()> + Send + 'static,
    S: Scheduler + Send + 'static,
{
    fn start(self) {
        let ScheduleState { receiver, scheduler } = self;
        scheduler.schedule(Box::new(move || {
            if receiver.is_cancelled() {
                receiver.cancel();
            } else {
                receiver.complete(());
            }
        }));
    }
}

impl<S: Scheduler + Send + 'static> Sender for ScheduleSender<S> {
    type Output = ();
    type State<R>
        = ScheduleState<R, S>
    where
        R: Receiver<()> + Send + 'static;

    fn connect<R>(self, receiver: R) -> Self::State<R>
    where
        R: Receiver<()> + Send + 'static,
    {
        ScheduleState {
            receiver,
            scheduler: self.scheduler,
        }
    }
}
