//! Message logger: producer-side helper that can take back its last line.
//!
//! Progress output often rewrites the line it just printed ("3/10",
//! "4/10", ...). [`MessageLogger`] remembers how long its last message was
//! so [`MessageLogger::pop_last_message`] can remove exactly that much.

use crate::bridge::LogHandle;
use crate::sink::TruncateUnit;
use std::fmt;

/// Longest message, in bytes, that is forwarded in one piece.
pub const MAX_MESSAGE_BYTES: usize = 4095;

/// Logs messages through a [`LogHandle`] and tracks the last one's length.
#[derive(Debug, Clone)]
pub struct MessageLogger {
    /// Where messages go.
    log: LogHandle,
    /// Unit the display sink measures truncations in.
    unit: TruncateUnit,
    /// Length of the last message, in `unit`.
    last_len: usize,
}

impl MessageLogger {
    /// Create a logger measuring lengths in characters.
    pub const fn new(log: LogHandle) -> Self {
        Self::with_unit(log, TruncateUnit::Chars)
    }

    /// Create a logger measuring lengths in `unit`.
    ///
    /// `unit` must match the display sink's configuration.
    pub const fn with_unit(log: LogHandle, unit: TruncateUnit) -> Self {
        Self {
            log,
            unit,
            last_len: 0,
        }
    }

    /// Whether the last message can be taken back.
    pub const fn is_message_popping_supported() -> bool {
        true
    }

    /// Length of the last message, in the configured unit.
    pub const fn last_message_len(&self) -> usize {
        self.last_len
    }

    /// Log a message, cut at [`MAX_MESSAGE_BYTES`].
    pub fn message(&mut self, text: &str) {
        let text = clip_to_bytes(text, MAX_MESSAGE_BYTES);
        self.last_len = self.unit.measure(text);
        self.log.on_log_message(text);
    }

    /// Log a formatted message.
    ///
    /// ```ignore
    /// logger.message_fmt(format_args!("{done}/{total}"));
    /// ```
    pub fn message_fmt(&mut self, args: fmt::Arguments<'_>) {
        match args.as_str() {
            Some(text) => self.message(text),
            None => self.message(&args.to_string()),
        }
    }

    /// Remove the last message from the log. A second pop with no message
    /// in between does nothing.
    pub fn pop_last_message(&mut self) {
        let len = std::mem::take(&mut self.last_len);
        if len > 0 {
            self.log.pop_last_message(len);
        }
    }
}

/// Longest prefix of `text` that is at most `max` bytes and ends on a char
/// boundary.
fn clip_to_bytes(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::MainLoop;
    use crate::sink::{DisplaySink, SinkConfig};
    use crate::surface::NullSurface;

    #[test]
    fn test_pop_removes_last_message() {
        let (main_loop, dispatcher) = MainLoop::new();
        let mut logger = MessageLogger::new(LogHandle::new(dispatcher));
        let mut sink = DisplaySink::detached();

        logger.message("Running tests\n");
        logger.message("1/3");
        for i in 2..=3 {
            logger.pop_last_message();
            logger.message_fmt(format_args!("{i}/3"));
        }
        main_loop.run_pending(&mut sink);

        assert_eq!(sink.content(), "Running tests\n3/3");
        assert_eq!(logger.last_message_len(), 3);
        assert!(MessageLogger::is_message_popping_supported());
    }

    #[test]
    fn test_double_pop_is_noop() {
        let (main_loop, dispatcher) = MainLoop::new();
        let mut logger = MessageLogger::new(LogHandle::new(dispatcher));
        let mut sink = DisplaySink::detached();

        logger.message("keep ");
        logger.message("drop");
        logger.pop_last_message();
        logger.pop_last_message();
        main_loop.run_pending(&mut sink);

        assert_eq!(sink.content(), "keep ");
    }

    #[test]
    fn test_long_message_is_clipped() {
        let (_main_loop, dispatcher) = MainLoop::new();
        let mut logger = MessageLogger::new(LogHandle::new(dispatcher.clone()));

        logger.message(&"é".repeat(3000));
        // 2047 two-byte chars fit in 4095 bytes.
        assert_eq!(logger.last_message_len(), 2047);
        assert_eq!(dispatcher.pending(), 1);
    }

    #[test]
    fn test_length_in_utf16() {
        let (main_loop, dispatcher) = MainLoop::new();
        let mut logger = MessageLogger::with_unit(LogHandle::new(dispatcher), TruncateUnit::Utf16);
        let config = SinkConfig {
            truncate_unit: TruncateUnit::Utf16,
        };
        let mut sink = DisplaySink::with_config(NullSurface, config);

        logger.message("crabs: ");
        logger.message("🦀🦀");
        assert_eq!(logger.last_message_len(), 4);
        logger.pop_last_message();
        main_loop.run_pending(&mut sink);

        assert_eq!(sink.content(), "crabs: ");
    }

    #[test]
    fn test_clip_to_bytes() {
        assert_eq!(clip_to_bytes("abc", 2), "ab");
        assert_eq!(clip_to_bytes("aé", 2), "a");
        assert_eq!(clip_to_bytes("abc", 10), "abc");
    }
}
