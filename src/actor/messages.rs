//! Message types for actor communication.
//!
//! Producers hand these to the dispatcher; the designated thread applies
//! them to the display sink in the order they were queued.

/// A mutation of the log, submitted from any producer thread.
///
/// Immutable once created. Ownership moves from the producer into the
/// queue and then to the designated thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PendingOperation {
    /// Append text to the end of the log.
    Append(String),

    /// Remove the last `n` units of text from the log.
    TruncateTail(usize),
}

impl PendingOperation {
    /// Build an append from text that may be absent. Absent text appends
    /// the empty string.
    pub fn append_or_empty(text: Option<String>) -> Self {
        Self::Append(text.unwrap_or_default())
    }

    /// Short name of the operation, for logging.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Append(_) => "append",
            Self::TruncateTail(_) => "truncate_tail",
        }
    }
}

impl From<&str> for PendingOperation {
    fn from(text: &str) -> Self {
        Self::Append(text.to_owned())
    }
}

impl From<String> for PendingOperation {
    fn from(text: String) -> Self {
        Self::Append(text)
    }
}
