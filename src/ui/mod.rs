//! UI rendering module for fxconvert
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod converter;
pub mod currency_picker;
pub mod help_overlay;

pub use converter::render as render_converter;
pub use currency_picker::render as render_currency_picker;
pub use help_overlay::render as render_help_overlay;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Shared colour palette
pub(crate) mod colors {
    use ratatui::style::Color;

    /// Borders and section headers
    pub const HEADER: Color = Color::Cyan;
    /// Primary text
    pub const PRIMARY: Color = Color::White;
    /// Secondary/dimmed text
    pub const SECONDARY: Color = Color::Gray;
    /// Key hints and highlighted rows
    pub const SELECTED: Color = Color::Yellow;
    /// The conversion sentence
    pub const RESULT: Color = Color::Green;
    /// Failure notice
    pub const ERROR: Color = Color::Red;
}

/// Creates a rect of at most `width` x `height` centred in `area`
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
