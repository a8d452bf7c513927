//! Bridge: composition root tying native producers to the display sink.
//!
//! [`LogBridge`] owns the designated thread and the sink on it. Native code
//! never sees either; it only gets a [`LogHandle`], which maps the two
//! native calls onto dispatcher submissions:
//!
//! | Native call                | Operation             |
//! |----------------------------|-----------------------|
//! | `OnLogMessage(message)`    | `Append(message)`     |
//! | `PopLastMessage(length)`   | `TruncateTail(length)`|
//!
//! The one-shot startup call that hands the native side its application
//! path is modelled by [`NativeEntry`].

use crate::actor::{Dispatcher, LooperConfig, LooperThread, PendingOperation};
use crate::error::BridgeError;
use crate::sink::{DisplaySink, SinkConfig};
use crate::surface::Surface;
use std::path::PathBuf;
use std::thread;

/// Configuration for a [`LogBridge`].
#[derive(Debug, Clone, Default)]
pub struct BridgeConfig {
    /// Display sink configuration.
    pub sink: SinkConfig,
    /// Designated thread configuration.
    pub looper: LooperConfig,
}

/// Producer handle given to native code.
///
/// Cheap to clone and usable from any thread. Every call returns
/// immediately.
#[derive(Debug, Clone)]
pub struct LogHandle {
    dispatcher: Dispatcher,
}

impl LogHandle {
    /// Wrap a dispatcher.
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Append a message to the log.
    pub fn on_log_message(&self, message: impl Into<String>) {
        self.dispatcher.submit(PendingOperation::Append(message.into()));
    }

    /// Remove the last `length` units of text from the log.
    pub fn pop_last_message(&self, length: usize) {
        self.dispatcher.submit(PendingOperation::TruncateTail(length));
    }

    /// The underlying dispatcher.
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl From<Dispatcher> for LogHandle {
    fn from(dispatcher: Dispatcher) -> Self {
        Self::new(dispatcher)
    }
}

/// The native side's startup entry point.
///
/// Called once with the application's data path and a handle for logging.
/// There is no return channel.
pub trait NativeEntry: Send + 'static {
    /// Start the native side.
    fn call_into_native(self, app_path: PathBuf, log: LogHandle);
}

impl<F> NativeEntry for F
where
    F: FnOnce(PathBuf, LogHandle) + Send + 'static,
{
    fn call_into_native(self, app_path: PathBuf, log: LogHandle) {
        self(app_path, log);
    }
}

/// Owns the designated thread and the display sink living on it.
pub struct LogBridge<S> {
    /// The designated thread.
    looper: LooperThread<S>,
    /// Producer handle, cloned out to callers.
    handle: LogHandle,
}

impl<S: Surface + Send + 'static> LogBridge<S> {
    /// Start a bridge with default configuration.
    pub fn start(surface: S) -> Result<Self, BridgeError> {
        Self::with_config(surface, BridgeConfig::default())
    }

    /// Start a bridge with custom configuration.
    pub fn with_config(surface: S, config: BridgeConfig) -> Result<Self, BridgeError> {
        let sink = DisplaySink::with_config(surface, config.sink);
        let (looper, dispatcher) = LooperThread::spawn(sink, config.looper)?;

        Ok(Self {
            looper,
            handle: LogHandle::new(dispatcher),
        })
    }

    /// Get a producer handle.
    pub fn handle(&self) -> LogHandle {
        self.handle.clone()
    }

    /// Hand the native side its application path on a thread of its own.
    ///
    /// Fire-and-forget: nothing is returned, and a failure to spawn the
    /// native thread is only logged.
    pub fn launch_native(&self, entry: impl NativeEntry, app_path: impl Into<PathBuf>) {
        let app_path = app_path.into();
        let log = self.handle();

        tracing::info!(app_path = %app_path.display(), "launching native entry");
        let spawned = thread::Builder::new()
            .name("logbridge-native".to_string())
            .spawn(move || entry.call_into_native(app_path, log));

        if let Err(e) = spawned {
            tracing::error!(error = %e, "failed to spawn native thread");
        }
    }

    /// Stop the designated thread once everything submitted so far has
    /// been applied, and return the sink.
    pub fn shutdown(self) -> Result<DisplaySink<S>, BridgeError> {
        self.looper.shutdown()
    }
}
