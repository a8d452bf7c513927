//! Looper Actor: a dedicated designated thread that owns the display sink.
//!
//! The looper sleeps until the dispatcher wakes it, drains the queue into
//! the sink, and goes back to sleep. Use this when the bridge should own
//! its UI thread; use [`MainLoop`](super::MainLoop) when the host already
//! has one.

use super::dispatcher::{Dispatcher, Drain};
use crate::error::BridgeError;
use crate::sink::DisplaySink;
use crate::surface::Surface;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Signals delivered to the looper thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LooperSignal {
    /// Run a drain pass.
    Drain,
    /// Drain what is left and exit.
    Shutdown,
}

/// Configuration for the looper thread.
#[derive(Debug, Clone)]
pub struct LooperConfig {
    /// Name given to the designated thread.
    pub thread_name: String,
    /// Stack size for the designated thread (platform default if `None`).
    pub stack_size: Option<usize>,
}

impl Default for LooperConfig {
    fn default() -> Self {
        Self {
            thread_name: "logbridge-ui".to_string(),
            stack_size: None,
        }
    }
}

/// Handle to the designated thread.
pub struct LooperThread<S> {
    /// Handle to the looper thread.
    handle: Option<JoinHandle<DisplaySink<S>>>,
    /// Signal sender, kept for shutdown.
    signals: Sender<LooperSignal>,
}

impl<S: Surface + Send + 'static> LooperThread<S> {
    /// Spawn the looper thread, moving `sink` onto it.
    ///
    /// Returns the looper handle and the dispatcher producers submit to.
    pub fn spawn(
        sink: DisplaySink<S>,
        config: LooperConfig,
    ) -> Result<(Self, Dispatcher), BridgeError> {
        let (signals, signal_rx) = unbounded::<LooperSignal>();

        let wake_tx = signals.clone();
        let (dispatcher, drain) = Dispatcher::new(move || {
            let _ = wake_tx.send(LooperSignal::Drain);
        });

        let mut builder = thread::Builder::new().name(config.thread_name.clone());
        if let Some(size) = config.stack_size {
            builder = builder.stack_size(size);
        }

        let handle = builder
            .spawn(move || Self::run_loop(&signal_rx, &drain, sink))
            .map_err(|source| {
                tracing::error!(thread = %config.thread_name, error = %source, "failed to spawn looper");
                BridgeError::Spawn {
                    name: config.thread_name.clone(),
                    source,
                }
            })?;

        Ok((
            Self {
                handle: Some(handle),
                signals,
            },
            dispatcher,
        ))
    }

    /// Drain everything already submitted, stop the thread and hand back
    /// the sink.
    pub fn shutdown(mut self) -> Result<DisplaySink<S>, BridgeError> {
        let _ = self.signals.send(LooperSignal::Shutdown);
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| {
                tracing::error!("looper thread panicked");
                BridgeError::DesignatedThreadPanicked
            }),
            None => Err(BridgeError::DesignatedThreadPanicked),
        }
    }

    /// Main looper loop.
    fn run_loop(
        signals: &Receiver<LooperSignal>,
        drain: &Drain,
        mut sink: DisplaySink<S>,
    ) -> DisplaySink<S> {
        tracing::info!("designated thread started");

        // recv only fails once the looper handle and every dispatcher are gone.
        while let Ok(signal) = signals.recv() {
            drain.run(&mut sink);
            if signal == LooperSignal::Shutdown {
                break;
            }
        }

        tracing::info!("designated thread stopped");
        sink
    }
}

impl<S> Drop for LooperThread<S> {
    fn drop(&mut self) {
        if self.handle.is_some() {
            let _ = self.signals.send(LooperSignal::Shutdown);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::PendingOperation;
    use crate::sink::Viewport;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    /// Records which thread each callback ran on.
    #[derive(Debug, Default)]
    struct ThreadProbe {
        threads: Arc<Mutex<Vec<Option<String>>>>,
    }

    impl Surface for ThreadProbe {
        fn text_changed(&mut self, _text: &str) {
            let name = thread::current().name().map(str::to_string);
            self.threads.lock().unwrap().push(name);
        }
    }

    /// Wait until the looper has emptied the queue. False on timeout.
    fn wait_until_drained(dispatcher: &Dispatcher) -> bool {
        let deadline = Instant::now() + Duration::from_secs(10);
        while dispatcher.pending() > 0 {
            if Instant::now() >= deadline {
                return false;
            }
            thread::yield_now();
        }
        true
    }

    #[test]
    fn test_looper_applies_in_order() {
        let (looper, dispatcher) =
            LooperThread::spawn(DisplaySink::detached(), LooperConfig::default()).unwrap();

        dispatcher.append("HELLO");
        dispatcher.append(" WORLD");
        dispatcher.truncate_tail(6);
        dispatcher.submit(PendingOperation::from("!"));

        let sink = looper.shutdown().unwrap();
        assert_eq!(sink.content(), "HELLO!");
        assert_eq!(sink.viewport(), Viewport::AT_END);
    }

    #[test]
    fn test_mutations_run_on_designated_thread() {
        let threads = Arc::new(Mutex::new(Vec::new()));
        let probe = ThreadProbe {
            threads: Arc::clone(&threads),
        };
        let config = LooperConfig {
            thread_name: "ui-probe".to_string(),
            ..LooperConfig::default()
        };
        let (looper, dispatcher) = LooperThread::spawn(DisplaySink::new(probe), config).unwrap();

        let producer = {
            let dispatcher = dispatcher.clone();
            thread::spawn(move || {
                for _ in 0..10 {
                    dispatcher.append("x");
                }
            })
        };
        producer.join().unwrap();
        looper.shutdown().unwrap();

        let seen = threads.lock().unwrap();
        assert_eq!(seen.len(), 10);
        assert!(seen.iter().all(|name| name.as_deref() == Some("ui-probe")));
    }

    #[test]
    fn test_interleaved_producers_each_appear_once() {
        let (looper, dispatcher) =
            LooperThread::spawn(DisplaySink::detached(), LooperConfig::default()).unwrap();

        let a = {
            let dispatcher = dispatcher.clone();
            thread::spawn(move || dispatcher.append("X"))
        };
        let b = {
            let dispatcher = dispatcher.clone();
            thread::spawn(move || dispatcher.append("Y"))
        };
        a.join().unwrap();
        b.join().unwrap();

        let sink = looper.shutdown().unwrap();
        assert_eq!(sink.content().matches('X').count(), 1);
        assert_eq!(sink.content().matches('Y').count(), 1);
        assert_eq!(sink.content().len(), 2);
    }

    #[test]
    fn test_drains_while_running() {
        let (looper, dispatcher) =
            LooperThread::spawn(DisplaySink::detached(), LooperConfig::default()).unwrap();

        dispatcher.append("first");
        assert!(wait_until_drained(&dispatcher));

        let sink = looper.shutdown().unwrap();
        assert_eq!(sink.content(), "first");
    }

    #[test]
    fn test_submits_racing_a_drain_are_never_stranded() {
        const PRODUCERS: usize = 8;
        const SUBMITS: usize = 500;

        let (looper, dispatcher) =
            LooperThread::spawn(DisplaySink::detached(), LooperConfig::default()).unwrap();

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|_| {
                let dispatcher = dispatcher.clone();
                thread::spawn(move || {
                    for _ in 0..SUBMITS {
                        dispatcher.append("x");
                        // A lost wake leaves the queue non-empty forever.
                        if !wait_until_drained(&dispatcher) {
                            return false;
                        }
                    }
                    true
                })
            })
            .collect();

        for producer in producers {
            assert!(producer.join().unwrap(), "operation left in queue");
        }

        let sink = looper.shutdown().unwrap();
        assert_eq!(sink.content().len(), PRODUCERS * SUBMITS);
    }

    #[test]
    fn test_submit_after_shutdown_is_dropped() {
        let (looper, dispatcher) =
            LooperThread::spawn(DisplaySink::detached(), LooperConfig::default()).unwrap();
        let sink = looper.shutdown().unwrap();

        dispatcher.append("too late");
        assert_eq!(sink.content(), "");
    }
}
