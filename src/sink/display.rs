//! Display sink: applies log operations and keeps the view at the latest line.
//!
//! The sink does no locking. It is owned by the designated thread and
//! mutated only from there; the dispatcher is what serializes access.

use super::log_buffer::{LogBuffer, TruncateUnit};
use super::viewport::Viewport;
use crate::actor::PendingOperation;
use crate::surface::{NullSurface, Surface};

/// Configuration for the display sink.
#[derive(Debug, Clone, Default)]
pub struct SinkConfig {
    /// Unit used to measure tail truncations.
    pub truncate_unit: TruncateUnit,
}

/// The canonical log text, its scroll state, and the surface mirroring them.
#[derive(Debug)]
pub struct DisplaySink<S = NullSurface> {
    /// Configuration.
    config: SinkConfig,
    /// Authoritative text.
    buffer: LogBuffer,
    /// Scroll position.
    viewport: Viewport,
    /// Outbound display.
    surface: S,
}

impl DisplaySink<NullSurface> {
    /// Create a sink that is not attached to any display.
    pub fn detached() -> Self {
        Self::new(NullSurface)
    }
}

impl<S: Surface> DisplaySink<S> {
    /// Create a sink driving the given surface.
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, SinkConfig::default())
    }

    /// Create a sink with custom configuration.
    pub fn with_config(surface: S, config: SinkConfig) -> Self {
        Self {
            config,
            buffer: LogBuffer::new(),
            viewport: Viewport::AT_END,
            surface,
        }
    }

    /// The current log text.
    #[inline]
    pub fn content(&self) -> &str {
        self.buffer.as_str()
    }

    /// The current scroll position.
    #[inline]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The configured truncation unit.
    #[inline]
    pub const fn truncate_unit(&self) -> TruncateUnit {
        self.config.truncate_unit
    }

    /// Get a reference to the surface.
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Get a mutable reference to the surface.
    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Consume the sink, returning its surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Apply one operation.
    pub fn apply(&mut self, op: PendingOperation) {
        match op {
            PendingOperation::Append(text) => self.append(&text),
            PendingOperation::TruncateTail(count) => self.truncate_tail(count),
        }
    }

    /// Append text and snap the view to the end.
    pub fn append(&mut self, text: &str) {
        self.buffer.append(text);
        self.viewport.scroll_to_end();
        self.surface.text_changed(self.buffer.as_str());
        self.surface.scroll_to_end();
    }

    /// Remove the last `count` units of text, clamping at empty.
    ///
    /// The view is left where it was.
    pub fn truncate_tail(&mut self, count: usize) {
        if count == 0 {
            return;
        }

        let unit = self.config.truncate_unit;
        let before = self.buffer.len();
        if self.buffer.truncate_tail(count, unit) {
            tracing::debug!(count, ?unit, "truncation clamped to empty log");
        }
        if self.buffer.len() != before {
            self.surface.text_changed(self.buffer.as_str());
        }
    }

    /// Scroll the view up by `lines`.
    pub fn scroll_up(&mut self, lines: usize) {
        let total = self.buffer.line_count();
        self.viewport.scroll_up(lines, total);
    }

    /// Scroll the view down by `lines`.
    pub const fn scroll_down(&mut self, lines: usize) {
        self.viewport.scroll_down(lines);
    }

    /// Snap the view to the latest content.
    pub fn scroll_to_end(&mut self) {
        self.viewport.scroll_to_end();
        self.surface.scroll_to_end();
    }

    /// Ask the surface to show the current state.
    ///
    /// Failures are logged; the log itself is unaffected.
    pub fn present(&mut self) {
        if let Err(e) = self.surface.present(self.buffer.as_str(), self.viewport) {
            tracing::warn!(error = %e, "surface failed to present log");
        }
    }
}
