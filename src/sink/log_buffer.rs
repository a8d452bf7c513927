//! Log buffer: the authoritative text behind the display.
//!
//! Content only grows through [`LogBuffer::append`] and only shrinks from
//! the tail through [`LogBuffer::truncate_tail`]. Truncation is measured in
//! a configurable [`TruncateUnit`] and always clamps instead of failing.

use unicode_segmentation::UnicodeSegmentation;

/// What one unit of a tail truncation removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TruncateUnit {
    /// Unicode scalar values (`char`s).
    #[default]
    Chars,
    /// Extended grapheme clusters.
    Graphemes,
    /// UTF-16 code units, as counted by Java and JavaScript strings.
    Utf16,
}

impl TruncateUnit {
    /// Measure `text` in this unit.
    pub fn measure(self, text: &str) -> usize {
        match self {
            Self::Chars => text.chars().count(),
            Self::Graphemes => text.graphemes(true).count(),
            Self::Utf16 => text.encode_utf16().count(),
        }
    }
}

/// Append-only text with tail truncation.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    /// The text content.
    content: String,
}

impl LogBuffer {
    /// Create an empty log buffer.
    pub const fn new() -> Self {
        Self {
            content: String::new(),
        }
    }

    /// The current text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Length of the text in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if the buffer holds no text.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Number of lines the text spans. An empty buffer still has one line.
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    /// Append text to the end of the buffer.
    pub fn append(&mut self, text: &str) {
        self.content.push_str(text);
    }

    /// Remove the last `count` units of text.
    ///
    /// Removing more than is present clears the buffer. Returns `true` if
    /// the request had to be clamped.
    pub fn truncate_tail(&mut self, count: usize, unit: TruncateUnit) -> bool {
        if count == 0 {
            return false;
        }

        let (cut, clamped) = self.tail_boundary(count, unit);
        self.content.truncate(cut);
        clamped
    }

    /// Find the byte offset that keeps everything but the last `count` units.
    fn tail_boundary(&self, count: usize, unit: TruncateUnit) -> (usize, bool) {
        match unit {
            TruncateUnit::Chars => self
                .content
                .char_indices()
                .rev()
                .nth(count - 1)
                .map_or((0, self.content.chars().count() < count), |(i, _)| (i, false)),
            TruncateUnit::Graphemes => self
                .content
                .grapheme_indices(true)
                .rev()
                .nth(count - 1)
                .map_or((0, self.content.graphemes(true).count() < count), |(i, _)| {
                    (i, false)
                }),
            TruncateUnit::Utf16 => {
                // A cut inside a surrogate pair takes the whole scalar value.
                let mut remaining = count;
                let mut cut = self.content.len();
                for (i, c) in self.content.char_indices().rev() {
                    if remaining == 0 {
                        break;
                    }
                    remaining = remaining.saturating_sub(c.len_utf16());
                    cut = i;
                }
                (cut, remaining > 0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str) -> LogBuffer {
        let mut buf = LogBuffer::new();
        buf.append(text);
        buf
    }

    #[test]
    fn test_append_order_is_observable() {
        let mut ab = LogBuffer::new();
        ab.append("A");
        ab.append("B");
        assert!(ab.as_str().ends_with("AB"));

        let mut ba = LogBuffer::new();
        ba.append("B");
        ba.append("A");
        assert!(ba.as_str().ends_with("BA"));
    }

    #[test]
    fn test_empty_append_is_noop() {
        let mut buf = buffer("log");
        buf.append("");
        assert_eq!(buf.as_str(), "log");
    }

    #[test]
    fn test_truncate_exact() {
        let mut buf = buffer("HELLO WORLD");
        let clamped = buf.truncate_tail(6, TruncateUnit::Chars);
        assert_eq!(buf.as_str(), "HELLO ");
        assert!(!clamped);
    }

    #[test]
    fn test_truncate_clamps_to_empty() {
        let mut buf = buffer("HELLO");
        let clamped = buf.truncate_tail(10, TruncateUnit::Chars);
        assert_eq!(buf.as_str(), "");
        assert!(clamped);
    }

    #[test]
    fn test_truncate_whole_content_is_not_clamped() {
        let mut buf = buffer("HELLO");
        assert!(!buf.truncate_tail(5, TruncateUnit::Chars));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_truncate_zero_is_noop() {
        let mut buf = buffer("HELLO");
        assert!(!buf.truncate_tail(0, TruncateUnit::Chars));
        assert_eq!(buf.as_str(), "HELLO");
    }

    #[test]
    fn test_truncate_empty_buffer() {
        let mut buf = LogBuffer::new();
        assert!(buf.truncate_tail(3, TruncateUnit::Utf16));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        let mut buf = buffer("naïve→");
        buf.truncate_tail(2, TruncateUnit::Chars);
        assert_eq!(buf.as_str(), "naïv");
    }

    #[test]
    fn test_truncate_graphemes() {
        // "e" + combining acute accent is one grapheme, two chars.
        let mut buf = buffer("cafe\u{301}!");
        buf.truncate_tail(2, TruncateUnit::Graphemes);
        assert_eq!(buf.as_str(), "caf");
    }

    #[test]
    fn test_truncate_utf16_surrogate_pair() {
        // The crab is two UTF-16 code units.
        let mut buf = buffer("ok🦀");
        buf.truncate_tail(2, TruncateUnit::Utf16);
        assert_eq!(buf.as_str(), "ok");

        // Cutting half a pair removes the whole scalar value.
        let mut buf = buffer("ok🦀");
        buf.truncate_tail(1, TruncateUnit::Utf16);
        assert_eq!(buf.as_str(), "ok");
    }

    #[test]
    fn test_measure_units() {
        let text = "cafe\u{301}🦀";
        assert_eq!(TruncateUnit::Chars.measure(text), 6);
        assert_eq!(TruncateUnit::Graphemes.measure(text), 5);
        assert_eq!(TruncateUnit::Utf16.measure(text), 7);
    }

    #[test]
    fn test_line_count() {
        assert_eq!(LogBuffer::new().line_count(), 1);
        assert_eq!(buffer("a\nb\n").line_count(), 3);
    }
}
