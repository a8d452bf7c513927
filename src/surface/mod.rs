//! Surface: the outbound seam to whatever actually shows the log.
//!
//! The display sink owns the text and the scroll position; a surface only
//! mirrors them. Every callback runs on the designated thread.

mod terminal;

pub use terminal::{TerminalConfig, TerminalSurface};

use crate::sink::Viewport;
use std::io;

/// A view that displays the log.
///
/// All methods have no-op defaults so a surface only implements what its
/// toolkit needs.
pub trait Surface {
    /// The log text changed. `text` is the full current content.
    ///
    /// Called once per applied operation, so a surface that copies `text`
    /// pays for the whole log each time. Surfaces that only need the final
    /// state should do their work in [`Surface::present`].
    fn text_changed(&mut self, text: &str) {
        let _ = text;
    }

    /// An append asked the view to show the latest content.
    fn scroll_to_end(&mut self) {}

    /// A drain pass finished; show the current state.
    fn present(&mut self, text: &str, viewport: Viewport) -> io::Result<()> {
        let _ = (text, viewport);
        Ok(())
    }
}

/// A surface that displays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl Surface for NullSurface {}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn text_changed(&mut self, text: &str) {
        (**self).text_changed(text);
    }

    fn scroll_to_end(&mut self) {
        (**self).scroll_to_end();
    }

    fn present(&mut self, text: &str, viewport: Viewport) -> io::Result<()> {
        (**self).present(text, viewport)
    }
}
