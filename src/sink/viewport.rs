//! Viewport: where the visible window sits within the log.

/// Scroll position, stored as a line offset from the end of the log.
///
/// An offset of 0 means the latest content is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    /// Lines scrolled up from the bottom (0 = at bottom).
    offset_from_end: usize,
}

impl Viewport {
    /// A viewport scrolled to the end.
    pub const AT_END: Self = Self { offset_from_end: 0 };

    /// Current offset from the end, in lines.
    #[inline]
    pub const fn offset_from_end(&self) -> usize {
        self.offset_from_end
    }

    /// Check if the latest content is visible.
    #[inline]
    pub const fn is_at_end(&self) -> bool {
        self.offset_from_end == 0
    }

    /// Scroll up by `lines`, never past the first of `total_lines`.
    pub fn scroll_up(&mut self, lines: usize, total_lines: usize) {
        let max_offset = total_lines.saturating_sub(1);
        self.offset_from_end = self.offset_from_end.saturating_add(lines).min(max_offset);
    }

    /// Scroll down by `lines`.
    pub const fn scroll_down(&mut self, lines: usize) {
        self.offset_from_end = self.offset_from_end.saturating_sub(lines);
    }

    /// Snap to the latest content.
    pub const fn scroll_to_end(&mut self) {
        self.offset_from_end = 0;
    }

    /// Range of line indices visible in a window `height` lines tall.
    ///
    /// An offset left larger than the log by a truncation shows the first
    /// line; the stored offset is not changed.
    pub fn visible_range(&self, total_lines: usize, height: usize) -> std::ops::Range<usize> {
        let offset = self.offset_from_end.min(total_lines.saturating_sub(1));
        let end = total_lines.saturating_sub(offset);
        let start = end.saturating_sub(height);
        start..end
    }
}
