//! Actor Model: Message-passing between producer threads and the
//! designated thread.
//!
//! - **Dispatcher**: thread-safe, non-blocking submit from any thread
//! - **Drain**: applies queued operations to the display sink in FIFO order
//! - **Looper / Main Loop**: the designated thread, owned by the bridge or
//!   by the host
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐  PendingOperation  ┌──────────────┐
//! │Producer Thread│ ─────────────────▶ │              │   wake   ┌──────────────┐
//! └───────────────┘                    │  Dispatcher  │ ───────▶ │  Designated  │
//! ┌───────────────┐  PendingOperation  │    (queue)   │          │    Thread    │
//! │Producer Thread│ ─────────────────▶ │              │ ◀─────── │   (drain)    │
//! └───────────────┘                    └──────────────┘  FIFO    └──────┬───────┘
//!                                                                       │ apply
//!                                                                       ▼
//!                                                                ┌──────────────┐
//!                                                                │ Display Sink │
//!                                                                └──────────────┘
//! ```

mod dispatcher;
mod looper;
mod main_loop;
mod messages;

pub use dispatcher::{DispatchState, Dispatcher, Drain, Waker};
pub use looper::{LooperConfig, LooperThread};
pub use main_loop::MainLoop;
pub use messages::PendingOperation;
