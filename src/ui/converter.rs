//! Converter screen rendering
//!
//! Shows the amount field, the selected pair, the conversion sentence with its
//! expiry countdown, and the fetch status.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::colors;
use crate::app::App;
use crate::data::Currency;

/// Notice shown for either kind of fetch failure
pub const ERROR_NOTICE: &str = "something went wrong...";

/// Renders the converter screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let main_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(Span::styled(
            " Currency Converter ",
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Amount
            Constraint::Length(1), // From
            Constraint::Length(1), // To
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Conversion sentence
            Constraint::Length(1), // Countdown
            Constraint::Length(1), // Status
            Constraint::Min(0),
            Constraint::Length(1), // Help bar
        ])
        .split(inner_area);

    render_amount(frame, chunks[0], app);
    render_currency_row(frame, chunks[1], "From", app.session().base());
    render_currency_row(frame, chunks[2], "To", app.session().counter());
    render_result(frame, chunks[4], chunks[5], app);
    render_status(frame, chunks[6], app);
    render_help_bar(frame, chunks[8]);
}

fn label(text: &str) -> Span<'static> {
    Span::styled(format!("{:<8}", text), Style::default().fg(colors::SECONDARY))
}

fn render_amount(frame: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        label("Amount"),
        Span::styled(
            app.amount_input().to_string(),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("_", Style::default().fg(colors::SELECTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_currency_row(frame: &mut Frame, area: Rect, title: &str, currency: Option<&Currency>) {
    let value = match currency {
        Some(c) => Span::styled(c.search_name(), Style::default().fg(colors::PRIMARY)),
        None => Span::styled("Select currency...", Style::default().fg(colors::SECONDARY)),
    };
    frame.render_widget(Paragraph::new(Line::from(vec![label(title), value])), area);
}

fn render_result(frame: &mut Frame, sentence_area: Rect, countdown_area: Rect, app: &App) {
    let session = app.session();
    let Some(sentence) = session.display_string() else {
        return;
    };

    let sentence = Paragraph::new(Span::styled(
        sentence,
        Style::default()
            .fg(colors::RESULT)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(sentence, sentence_area);

    if let Some(remaining) = session.countdown_label() {
        let mut spans = vec![
            Span::styled("Expires in: ", Style::default().fg(colors::SECONDARY)),
            Span::styled(remaining, Style::default().fg(colors::SELECTED)),
        ];
        if let Some(table) = session.rate_table() {
            spans.push(Span::styled(
                format!("  (rates as of {})", table.fetched_label()),
                Style::default().fg(colors::SECONDARY),
            ));
        }
        let countdown = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
        frame.render_widget(countdown, countdown_area);
    }
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let status = if session.is_fetching() {
        Span::styled("Fetching rates...", Style::default().fg(colors::HEADER))
    } else if session.error().is_some() {
        Span::styled(ERROR_NOTICE, Style::default().fg(colors::ERROR))
    } else {
        return;
    };
    frame.render_widget(Paragraph::new(status).alignment(Alignment::Center), area);
}

fn render_help_bar(frame: &mut Frame, area: Rect) {
    let help_line = Line::from(vec![
        Span::styled("0-9", Style::default().fg(colors::HEADER)),
        Span::styled(" Amount  ", Style::default().fg(colors::SECONDARY)),
        Span::styled("b/c", Style::default().fg(colors::HEADER)),
        Span::styled(" From/To  ", Style::default().fg(colors::SECONDARY)),
        Span::styled("s", Style::default().fg(colors::HEADER)),
        Span::styled(" Swap  ", Style::default().fg(colors::SECONDARY)),
        Span::styled("Enter", Style::default().fg(colors::HEADER)),
        Span::styled(" Convert  ", Style::default().fg(colors::SECONDARY)),
        Span::styled("?", Style::default().fg(colors::HEADER)),
        Span::styled(" Help  ", Style::default().fg(colors::SECONDARY)),
        Span::styled("q", Style::default().fg(colors::HEADER)),
        Span::styled(" Quit", Style::default().fg(colors::SECONDARY)),
    ]);
    frame.render_widget(Paragraph::new(help_line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppMessage;
    use crate::cli::StartupConfig;
    use crate::data::{CurrencyListClient, CurrencyListError, RateFetchError, RateTable, RatesClient};
    use ratatui::{backend::TestBackend, Terminal};
    use std::collections::HashMap;

    fn test_app() -> App {
        let mut app = App::with_clients(
            StartupConfig::default(),
            RatesClient::with_base_url("http://127.0.0.1:9/latest"),
            CurrencyListClient::without_cache(),
        );
        app.apply_currencies(Ok(vec![
            Currency::new("EUR", "Euro"),
            Currency::new("GBP", "British Pound Sterling"),
        ]));
        app
    }

    fn render_to_string(app: &App) -> String {
        let backend = TestBackend::new(80, 16);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_idle_screen_shows_inputs_only() {
        let app = test_app();
        let content = render_to_string(&app);

        assert!(content.contains("Currency Converter"));
        assert!(content.contains("Amount"));
        assert!(content.contains("100"));
        assert!(content.contains("GBP British Pound Sterling"));
        assert!(content.contains("EUR Euro"));
        assert!(!content.contains("equivalent"));
        assert!(!content.contains("Expires in"));
    }

    #[tokio::test]
    async fn test_active_screen_shows_sentence_and_countdown() {
        let mut app = test_app();
        app.handle_key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Enter,
            crossterm::event::KeyModifiers::NONE,
        ));
        app.start_conversion();
        // Nothing listens on port 9, so hand the table over directly
        app.handle_message(AppMessage::RatesFetched {
            base: "GBP".to_string(),
            result: Ok(RateTable::new(
                "GBP",
                HashMap::from([("EUR".to_string(), 1.15)]),
            )),
        });

        let content = render_to_string(&app);
        assert!(content.contains("100 GBP is equivalent to 115 EUR"));
        assert!(content.contains("Expires in: 10:00"));
        let fetched = app.session().rate_table().unwrap().fetched_label();
        assert!(content.contains(&format!("rates as of {}", fetched)));
    }

    #[tokio::test]
    async fn test_rate_error_shows_notice() {
        let mut app = test_app();
        app.handle_message(AppMessage::RatesFetched {
            base: "GBP".to_string(),
            result: Err(RateFetchError::Status(500)),
        });

        let content = render_to_string(&app);
        assert!(content.contains(ERROR_NOTICE));
    }

    #[test]
    fn test_currency_list_error_shows_same_notice() {
        let mut app = App::with_clients(
            StartupConfig::default(),
            RatesClient::new(),
            CurrencyListClient::without_cache(),
        );
        app.apply_currencies(Err(CurrencyListError::Status(503)));

        let content = render_to_string(&app);
        assert!(content.contains(ERROR_NOTICE));
        assert!(content.contains("Select currency..."));
    }
}
