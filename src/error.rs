//! Error types for setting up and tearing down the bridge.
//!
//! The log pipe itself is infallible: submitting, appending and truncating
//! never fail. Errors only surface while spawning the designated thread,
//! joining it, or taking over the terminal.

use std::io;
use thiserror::Error;

/// Errors raised while starting or stopping the bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The OS refused to spawn a thread.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        /// Name of the thread that could not be spawned.
        name: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The designated thread panicked while draining operations.
    #[error("designated thread panicked")]
    DesignatedThreadPanicked,

    /// Terminal setup or output failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_error_names_thread() {
        let err = BridgeError::Spawn {
            name: "logbridge-ui".to_string(),
            source: io::Error::new(io::ErrorKind::OutOfMemory, "no stack"),
        };
        assert_eq!(err.to_string(), "failed to spawn logbridge-ui thread: no stack");
    }

    #[test]
    fn test_terminal_error_from_io() {
        let err: BridgeError = io::Error::new(io::ErrorKind::BrokenPipe, "closed").into();
        assert!(matches!(err, BridgeError::Terminal(_)));
    }
}
