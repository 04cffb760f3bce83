//! Currency picker overlay
//!
//! A centred modal with a search line and the filtered currency list.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{centered_rect, colors};
use crate::data::Currency;
use crate::picker::{filter_currencies, CurrencyPicker};

/// Shown when the query matches nothing
pub const EMPTY_RESULT_MESSAGE: &str = "No currencies found";

/// First row to draw so the highlighted row stays visible
fn scroll_offset(selected: usize, visible_rows: usize) -> usize {
    if visible_rows == 0 {
        return 0;
    }
    selected.saturating_sub(visible_rows - 1)
}

/// Renders the picker on top of the current view
pub fn render(frame: &mut Frame, picker: &CurrencyPicker, currencies: &[Currency]) {
    let overlay_area = centered_rect(50, 18, frame.area());
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(format!(" {} ", picker.side.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    let search = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(colors::SECONDARY)),
            Span::styled(picker.query.clone(), Style::default().fg(colors::PRIMARY)),
            Span::styled("_", Style::default().fg(colors::SELECTED)),
        ]),
        Line::from(""),
    ]);
    frame.render_widget(search, chunks[0]);

    let matches = filter_currencies(currencies, &picker.query);
    if matches.is_empty() {
        let empty = Paragraph::new(Span::styled(
            EMPTY_RESULT_MESSAGE,
            Style::default().fg(colors::SECONDARY),
        ));
        frame.render_widget(empty, chunks[1]);
        return;
    }

    let visible_rows = chunks[1].height as usize;
    let offset = scroll_offset(picker.selected, visible_rows);
    let lines: Vec<Line> = matches
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows)
        .map(|(i, currency)| {
            if i == picker.selected {
                Line::from(Span::styled(
                    format!("> {}", currency.search_name()),
                    Style::default()
                        .fg(colors::SELECTED)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(
                    format!("  {}", currency.search_name()),
                    Style::default().fg(colors::PRIMARY),
                ))
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::PickerSide;
    use ratatui::{backend::TestBackend, Terminal};

    fn currencies() -> Vec<Currency> {
        ["AUD", "BRL", "CAD", "CHF", "CNY", "CZK", "DKK", "EUR", "GBP", "HKD", "HUF", "IDR",
         "ILS", "INR", "ISK", "JPY", "KRW", "MXN", "MYR", "NOK", "NZD", "USD"]
            .iter()
            .map(|code| Currency::new(*code, format!("{} name", code)))
            .collect()
    }

    fn render_to_string(picker: &CurrencyPicker, list: &[Currency]) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, picker, list)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_scroll_offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 10), 0);
        assert_eq!(scroll_offset(9, 10), 0);
        assert_eq!(scroll_offset(10, 10), 1);
        assert_eq!(scroll_offset(21, 10), 12);
        assert_eq!(scroll_offset(5, 0), 0);
    }

    #[test]
    fn test_renders_title_and_highlight() {
        let list = currencies();
        let picker = CurrencyPicker::open(PickerSide::Base, &list, None);
        let content = render_to_string(&picker, &list);

        assert!(content.contains("From"));
        assert!(content.contains("Search:"));
        assert!(content.contains("> AUD AUD name"));
    }

    #[test]
    fn test_scrolls_to_selection_at_end_of_list() {
        let list = currencies();
        let current = Currency::new("USD", "");
        let picker = CurrencyPicker::open(PickerSide::Counter, &list, Some(&current));
        let content = render_to_string(&picker, &list);

        assert!(content.contains("> USD USD name"));
        assert!(!content.contains("AUD AUD name"));
    }

    #[test]
    fn test_empty_filter_shows_message() {
        let list = currencies();
        let mut picker = CurrencyPicker::open(PickerSide::Base, &list, None);
        picker.push_char('#');
        let content = render_to_string(&picker, &list);

        assert!(content.contains(EMPTY_RESULT_MESSAGE));
    }
}
