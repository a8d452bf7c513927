//! Main loop: lets a host's own UI thread act as the designated thread.
//!
//! Create the [`MainLoop`] on the UI thread, keep the [`DisplaySink`]
//! there, and call [`MainLoop::run_pending`] from the host's event loop
//! whenever a drain has been scheduled.

use super::dispatcher::{DispatchState, Dispatcher, Drain};
use crate::sink::DisplaySink;
use crate::surface::Surface;
use crossbeam_channel::{bounded, Receiver};
use std::marker::PhantomData;
use std::rc::Rc;
use std::time::Duration;

/// Drain scheduler bound to the thread that created it.
///
/// `MainLoop` is neither `Send` nor `Sync`, so drains can only ever run on
/// the thread it was created on.
#[derive(Debug)]
pub struct MainLoop {
    /// Consumer end of the dispatcher.
    drain: Drain,
    /// Wake notifications from the dispatcher.
    wake_rx: Receiver<()>,
    /// Pins the loop to its creating thread.
    _not_send: PhantomData<Rc<()>>,
}

impl MainLoop {
    /// Create a main loop on the current thread and the dispatcher that
    /// feeds it.
    pub fn new() -> (Self, Dispatcher) {
        // One pending wake is enough; the dispatcher wakes at most once
        // per drain cycle.
        let (wake_tx, wake_rx) = bounded::<()>(1);
        let (dispatcher, drain) = Dispatcher::new(move || {
            let _ = wake_tx.try_send(());
        });

        (
            Self {
                drain,
                wake_rx,
                _not_send: PhantomData,
            },
            dispatcher,
        )
    }

    /// Check if a drain has been scheduled and not yet run.
    pub fn is_scheduled(&self) -> bool {
        self.drain.state() == DispatchState::Scheduled
    }

    /// Get the wake receiver for event-driven loops.
    ///
    /// Use this with `select!` alongside the host's other event sources:
    ///
    /// ```ignore
    /// select! {
    ///     recv(main_loop.wake_receiver()) -> _ => { main_loop.run_pending(&mut sink); }
    ///     recv(host_events) -> event => handle(event),
    /// }
    /// ```
    #[inline]
    pub const fn wake_receiver(&self) -> &Receiver<()> {
        &self.wake_rx
    }

    /// Run a drain if one is scheduled (non-blocking).
    ///
    /// Returns the number of operations applied.
    pub fn run_pending<S: Surface>(&self, sink: &mut DisplaySink<S>) -> usize {
        // Consume the wake so the next cycle can signal again.
        let _ = self.wake_rx.try_recv();
        if self.is_scheduled() {
            self.drain.run(sink)
        } else {
            0
        }
    }

    /// Wait up to `timeout` for a drain to be scheduled, then run it.
    ///
    /// Returns the number of operations applied.
    pub fn wait_pending<S: Surface>(&self, sink: &mut DisplaySink<S>, timeout: Duration) -> usize {
        if self.is_scheduled() || self.wake_rx.recv_timeout(timeout).is_ok() {
            self.run_pending(sink)
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::Viewport;
    use std::thread;

    #[test]
    fn test_nothing_scheduled() {
        let (main_loop, _dispatcher) = MainLoop::new();
        let mut sink = DisplaySink::detached();
        assert!(!main_loop.is_scheduled());
        assert_eq!(main_loop.run_pending(&mut sink), 0);
    }

    #[test]
    fn test_drain_completeness() {
        let (main_loop, dispatcher) = MainLoop::new();
        let mut sink = DisplaySink::detached();

        dispatcher.append("HELLO");
        dispatcher.append(" WORLD");
        dispatcher.truncate_tail(6);
        dispatcher.append("!");
        assert!(main_loop.is_scheduled());

        assert_eq!(main_loop.run_pending(&mut sink), 4);
        assert_eq!(sink.content(), "HELLO!");
        assert_eq!(dispatcher.state(), DispatchState::Idle);
        assert_eq!(main_loop.run_pending(&mut sink), 0);
    }

    #[test]
    fn test_wait_for_background_producer() {
        let (main_loop, dispatcher) = MainLoop::new();
        let mut sink = DisplaySink::detached();

        let producer = thread::spawn(move || {
            for i in 0..100 {
                dispatcher.append(format!("{i}\n"));
            }
        });

        let mut applied = 0;
        while applied < 100 {
            applied += main_loop.wait_pending(&mut sink, Duration::from_secs(5));
        }
        producer.join().unwrap();

        let expected: String = (0..100).map(|i| format!("{i}\n")).collect();
        assert_eq!(sink.content(), expected);
        assert_eq!(sink.viewport(), Viewport::AT_END);
    }

    #[test]
    fn test_viewport_survives_truncation() {
        let (main_loop, dispatcher) = MainLoop::new();
        let mut sink = DisplaySink::detached();

        dispatcher.append("a\nb\nc\nd");
        main_loop.run_pending(&mut sink);
        sink.scroll_up(2);
        let before = sink.viewport();

        dispatcher.truncate_tail(2);
        main_loop.run_pending(&mut sink);
        assert_eq!(sink.content(), "a\nb\nc");
        assert_eq!(sink.viewport(), before);

        dispatcher.append("\nz");
        main_loop.run_pending(&mut sink);
        assert!(sink.viewport().is_at_end());
    }
}
