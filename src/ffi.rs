//! C Foreign Function Interface (FFI) for Logbridge.
//!
//! This module provides a C-compatible API so a native library can feed
//! the log from any of its threads. All functions are `extern "C"` with
//! stable ABI.
//!
//! # Safety
//!
//! Handle pointers must come from [`logbridge_new`] and must not be used
//! after [`logbridge_destroy`]. Callbacks run on the designated thread,
//! never on the caller's.
//!
//! # Example (C)
//!
//! ```c
//! #include "logbridge.h"
//!
//! static void on_text(void* ui, const char* text, size_t len) { ui_set_text(ui, text, len); }
//! static void on_scroll(void* ui) { ui_scroll_to_bottom(ui); }
//!
//! int main() {
//!     LogBridgeCallbacks callbacks = { my_ui, on_text, on_scroll };
//!     LogBridgeHandle* log = logbridge_new(callbacks);
//!     if (!log) return 1;
//!
//!     logbridge_on_log_message(log, "Running tests...");
//!     logbridge_pop_last_message(log, 3);
//!
//!     logbridge_destroy(log);
//!     return 0;
//! }
//! ```

// FFI modules intentionally use unsafe and no_mangle
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]
#![allow(clippy::missing_safety_doc)]

use crate::bridge::{LogBridge, LogHandle};
use crate::surface::Surface;
use std::ffi::{c_void, CStr};
use std::os::raw::{c_char, c_int};
use std::ptr;

// =============================================================================
// Opaque Handle Types
// =============================================================================

/// Opaque handle to a running bridge.
pub struct LogBridgeHandle {
    bridge: LogBridge<CallbackSurface>,
    log: LogHandle,
}

// =============================================================================
// Result Codes and Callbacks
// =============================================================================

/// Result codes for FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogBridgeResult {
    /// Operation succeeded.
    Ok = 0,
    /// Null handle passed.
    NullPointer = 1,
}

/// Display callbacks, invoked on the designated thread.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct LogBridgeCallbacks {
    /// Passed back to every callback untouched.
    pub user_data: *mut c_void,
    /// The full log text changed. The text is not NUL-terminated and is
    /// only valid for the duration of the call. Fires once per operation
    /// with the whole log, so copying it costs the full log length each time.
    pub text_changed: Option<unsafe extern "C" fn(*mut c_void, *const c_char, usize)>,
    /// The view should scroll to the latest content.
    pub scroll_to_end: Option<unsafe extern "C" fn(*mut c_void)>,
}

/// Surface forwarding to C callbacks.
pub struct CallbackSurface {
    callbacks: LogBridgeCallbacks,
}

// The host promises `user_data` may be used from the designated thread.
unsafe impl Send for CallbackSurface {}

impl Surface for CallbackSurface {
    fn text_changed(&mut self, text: &str) {
        if let Some(callback) = self.callbacks.text_changed {
            unsafe { callback(self.callbacks.user_data, text.as_ptr().cast(), text.len()) };
        }
    }

    fn scroll_to_end(&mut self) {
        if let Some(callback) = self.callbacks.scroll_to_end {
            unsafe { callback(self.callbacks.user_data) };
        }
    }
}

// =============================================================================
// Bridge Functions
// =============================================================================

/// Start a bridge whose display is driven by `callbacks`.
///
/// Returns NULL if the designated thread cannot be started.
#[unsafe(no_mangle)]
pub extern "C" fn logbridge_new(callbacks: LogBridgeCallbacks) -> *mut LogBridgeHandle {
    match LogBridge::start(CallbackSurface { callbacks }) {
        Ok(bridge) => {
            let log = bridge.handle();
            Box::into_raw(Box::new(LogBridgeHandle { bridge, log }))
        }
        Err(e) => {
            tracing::error!(error = %e, "logbridge_new failed");
            ptr::null_mut()
        }
    }
}

/// Stop a bridge after applying everything already submitted.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn logbridge_destroy(handle: *mut LogBridgeHandle) {
    if handle.is_null() {
        return;
    }
    let handle = *Box::from_raw(handle);
    if let Err(e) = handle.bridge.shutdown() {
        tracing::error!(error = %e, "logbridge_destroy failed");
    }
}

/// Append a message to the log.
///
/// A NULL message appends nothing but still scrolls to the end. Invalid
/// UTF-8 is replaced with U+FFFD.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn logbridge_on_log_message(
    handle: *const LogBridgeHandle,
    message: *const c_char,
) -> LogBridgeResult {
    if handle.is_null() {
        return LogBridgeResult::NullPointer;
    }

    let text = if message.is_null() {
        String::new()
    } else {
        CStr::from_ptr(message).to_string_lossy().into_owned()
    };

    (*handle).log.on_log_message(text);
    LogBridgeResult::Ok
}

/// Remove the last `length` characters from the log.
///
/// A negative length does nothing.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn logbridge_pop_last_message(
    handle: *const LogBridgeHandle,
    length: c_int,
) -> LogBridgeResult {
    if handle.is_null() {
        return LogBridgeResult::NullPointer;
    }

    match usize::try_from(length) {
        Ok(length) => (*handle).log.pop_last_message(length),
        Err(_) => tracing::debug!(length, "ignoring negative pop length"),
    }
    LogBridgeResult::Ok
}

// =============================================================================
// Version Information
// =============================================================================

/// Get the Logbridge version string.
#[unsafe(no_mangle)]
pub extern "C" fn logbridge_version() -> *const c_char {
    static VERSION: &[u8] = b"0.1.0\0";
    VERSION.as_ptr().cast::<c_char>()
}
