//! Terminal surface: shows the visible window of the log in the terminal.
//!
//! Each present redraws the whole screen in a single write. Lines longer
//! than the terminal are clipped at a grapheme boundary.

use super::Surface;
use crate::error::BridgeError;
use crate::sink::Viewport;
use crossterm::{
    cursor, execute, queue,
    style::Print,
    terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Stdout, Write};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Configuration for the terminal surface.
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Whether to use alternate screen buffer.
    pub alternate_screen: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            alternate_screen: true,
        }
    }
}

/// A surface that renders the log to stdout.
pub struct TerminalSurface {
    /// Configuration.
    config: TerminalConfig,
    /// Terminal handle.
    stdout: Stdout,
    /// Pre-allocated output buffer.
    output: Vec<u8>,
    /// Terminal width.
    width: u16,
    /// Terminal height.
    height: u16,
}

impl TerminalSurface {
    /// Take over the terminal with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal size cannot be read or the
    /// alternate screen cannot be entered.
    pub fn new() -> Result<Self, BridgeError> {
        Self::with_config(TerminalConfig::default())
    }

    /// Take over the terminal with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup fails.
    pub fn with_config(config: TerminalConfig) -> Result<Self, BridgeError> {
        let (width, height) = terminal::size()?;

        let mut stdout = io::stdout();
        if config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        execute!(stdout, cursor::Hide)?;

        Ok(Self {
            config,
            stdout,
            output: Vec::with_capacity(16 * 1024),
            width,
            height,
        })
    }

    /// Terminal width in columns.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Terminal height in rows.
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Handle a terminal resize.
    pub const fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Queue one screen row, clipped to the terminal width.
    fn queue_line(&mut self, row: u16, line: &str) -> io::Result<()> {
        let clipped = clip_to_width(line, usize::from(self.width));
        queue!(
            self.output,
            cursor::MoveTo(0, row),
            terminal::Clear(ClearType::CurrentLine),
            Print(clipped)
        )
    }
}

impl Surface for TerminalSurface {
    fn present(&mut self, text: &str, viewport: Viewport) -> io::Result<()> {
        self.output.clear();

        let lines: Vec<&str> = text.split('\n').collect();
        let range = viewport.visible_range(lines.len(), usize::from(self.height));

        let mut row = 0u16;
        for line in &lines[range] {
            self.queue_line(row, line.trim_end_matches('\r'))?;
            row += 1;
        }
        queue!(self.output, cursor::MoveTo(0, row), terminal::Clear(ClearType::FromCursorDown))?;

        // Single write per present
        self.stdout.write_all(&self.output)?;
        self.stdout.flush()
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, cursor::Show);
        if self.config.alternate_screen {
            let _ = execute!(self.stdout, LeaveAlternateScreen);
        }
    }
}

/// Longest prefix of `line` that fits in `width` columns.
fn clip_to_width(line: &str, width: usize) -> &str {
    let mut used = 0;
    for (i, grapheme) in line.grapheme_indices(true) {
        let w = UnicodeWidthStr::width(grapheme);
        if used + w > width {
            return &line[..i];
        }
        used += w;
    }
    line
}
