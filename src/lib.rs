//! # Logbridge
//!
//! An ordered log pipe from native producer threads to a single UI thread.
//!
//! Native code may log from any thread at any rate; the text view it feeds
//! may only be touched from one designated thread. Logbridge sits between
//! the two.
//!
//! ## Core Concepts
//!
//! - **Display sink**: owns the log text and keeps the view on the latest
//!   line after every append; never locks
//! - **Dispatcher**: non-blocking submit from any thread, FIFO delivery to
//!   the designated thread
//! - **Drain**: one pass of the designated thread that empties the queue
//! - **Clamped truncation**: taking back more text than exists clears the
//!   log instead of failing
//!
//! ## Example
//!
//! ```rust
//! use logbridge::{LogBridge, NullSurface};
//!
//! let bridge = LogBridge::start(NullSurface)?;
//! let log = bridge.handle();
//!
//! std::thread::spawn(move || {
//!     log.on_log_message("HELLO WORLD");
//!     log.pop_last_message(6);
//! })
//! .join()
//! .unwrap();
//!
//! let sink = bridge.shutdown()?;
//! assert_eq!(sink.content(), "HELLO ");
//! # Ok::<(), logbridge::BridgeError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod bridge;
pub mod error;
pub mod ffi;
pub mod logger;
pub mod sink;
pub mod surface;

// Re-exports for convenience
pub use actor::{
    DispatchState, Dispatcher, Drain, LooperConfig, LooperThread, MainLoop, PendingOperation, Waker,
};
pub use bridge::{BridgeConfig, LogBridge, LogHandle, NativeEntry};
pub use error::BridgeError;
pub use logger::MessageLogger;
pub use sink::{DisplaySink, SinkConfig, TruncateUnit, Viewport};
pub use surface::{NullSurface, Surface, TerminalConfig, TerminalSurface};
