//! Help overlay showing all keybindings
//!
//! Renders a centered modal overlay with keyboard shortcuts.

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{centered_rect, colors};
use crate::countdown::format_countdown;

/// Renders the help overlay on top of the current view
///
/// `expiry_secs` is how long a conversion stays on screen.
pub fn render(frame: &mut Frame, expiry_secs: u32) {
    let overlay_area = centered_rect(52, 21, frame.area());

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let lines = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Converter"),
        help_line("0-9 . -", "Edit the amount"),
        help_line("Backspace", "Delete last digit"),
        help_line("b / c", "Choose From / To currency"),
        help_line("s", "Swap From and To"),
        help_line("Enter", "Fetch rates and convert"),
        help_line("q, Esc", "Quit application"),
        Line::from(""),
        section("Currency picker"),
        help_line("type", "Filter by code or name"),
        help_line("↑ / ↓", "Move selection"),
        help_line("Enter", "Choose currency"),
        help_line("Esc", "Cancel"),
        Line::from(""),
        Line::from(Span::styled(
            format!("Conversions expire after {}", format_countdown(expiry_secs)),
            Style::default().fg(colors::SECONDARY),
        )),
        Line::from(Span::styled(
            "Press Esc or ? to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, overlay_area);
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

/// Creates a help line with key and description
fn help_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", key), Style::default().fg(colors::SELECTED)),
        Span::raw(description.to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn render_to_string(expiry_secs: u32) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| {
                render(frame, expiry_secs);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_help_overlay_renders() {
        let content = render_to_string(600);

        assert!(content.contains("Help"), "Should render help title");
        assert!(content.contains("Converter"), "Should show converter section");
        assert!(content.contains("Swap From and To"));
        assert!(content.contains("Conversions expire after 10:00"));
    }

    #[test]
    fn test_help_overlay_uses_configured_expiry() {
        let content = render_to_string(30);
        assert!(content.contains("Conversions expire after 0:30"));
    }
}
