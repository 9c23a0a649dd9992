//! Console styling.

use crossterm::style::{Color, Stylize};
use crossterm::tty::IsTty;

/// Menu header and title lines
pub const HEADER: Color = Color::Magenta;
/// Confirmation after a successful action
pub const SUCCESS: Color = Color::Green;
/// Single-line failure reasons
pub const FAILURE: Color = Color::Red;
/// Subtask lines and other secondary detail
pub const DETAIL: Color = Color::DarkGrey;

/// Applies colors only when styling is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Palette { enabled }
    }

    pub fn plain() -> Self {
        Palette { enabled: false }
    }

    /// Styling on when stdout is a terminal and the user did not opt out.
    pub fn detect(no_color: bool) -> Self {
        Palette::new(!no_color && std::io::stdout().is_tty())
    }

    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }
}
