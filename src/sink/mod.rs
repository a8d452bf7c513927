//! Display sink: the single-writer side of the bridge.
//!
//! ```rust
//! use logbridge::sink::DisplaySink;
//!
//! let mut sink = DisplaySink::detached();
//! sink.append("HELLO WORLD");
//! sink.truncate_tail(6);
//! assert_eq!(sink.content(), "HELLO ");
//! ```

mod display;
mod log_buffer;
mod viewport;

pub use display::{DisplaySink, SinkConfig};
pub use log_buffer::{LogBuffer, TruncateUnit};
pub use viewport::Viewport;
