//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * The layout is a two-row split: the card list (or a placeholder) on top
//!   and a one-line status bar at the bottom.
//! * Every card occupies [`CARD_HEIGHT`] rows.  The idle float moves the
//!   card's text down by its offset inside that fixed box, so the list never
//!   reflows while cards bob.

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::card::DisplayCard;
use crate::motion::FLOAT_AMPLITUDE;
use crate::surface::Content;

/// Text lines per card, plus room for the float.
pub const CARD_HEIGHT: usize = 3 + FLOAT_AMPLITUDE as usize;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let message = match &app.content {
        Content::Cards(_) => None,
        Content::Placeholder(p) => Some(p.to_string()),
        Content::Loading => Some("Loading articles…".to_string()),
    };
    match message {
        Some(message) => draw_message(frame, main_area, &message),
        None => draw_cards(app, frame, main_area),
    }
    draw_status_bar(app, frame, status_area);
}

fn card_lines(card: &DisplayCard, offset: u16) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(CARD_HEIGHT);
    lines.extend((0..offset).map(|_| Line::raw("")));
    lines.push(Line::from(vec![
        Span::styled(format!("{:<11}", card.date), Style::default().fg(Color::DarkGray)),
        Span::styled(
            card.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::raw("           "),
        Span::styled(card.excerpt.clone(), Style::default().fg(Color::Gray)),
    ]));
    lines.push(Line::from(vec![
        Span::raw("           "),
        Span::styled(card.image_url.clone(), Style::default().fg(Color::Cyan)),
    ]));
    while lines.len() < CARD_HEIGHT {
        lines.push(Line::raw(""));
    }
    lines
}

/// Render the card list.
fn draw_cards(app: &mut App, frame: &mut Frame, area: Rect) {
    let now = Instant::now();
    let items: Vec<ListItem> = app
        .cards()
        .iter()
        .enumerate()
        .map(|(i, card)| ListItem::new(card_lines(card, app.float_offset(i, now))))
        .collect();

    let list = List::new(items)
        .block(Block::default().title(" Latest articles ").borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Render a centred placeholder message in place of the list.
fn draw_message(frame: &mut Frame, area: Rect, message: &str) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(Block::default().borders(Borders::ALL).inner(area));

    frame.render_widget(
        Block::default().title(" Latest articles ").borders(Borders::ALL),
        area,
    );
    frame.render_widget(
        Paragraph::new(message)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        middle,
    );
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} articles", app.cards().len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  q: quit  ↑/↓: move  Enter: open  a: all articles  r: refresh"),
    ]));
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{card, cards_update};
    use crate::surface::{Placeholder, SurfaceUpdate};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    #[test]
    fn draw_does_not_panic_while_loading() {
        let text = render(&mut App::new());
        assert!(text.contains("Loading articles"));
    }

    #[test]
    fn draw_shows_cards() {
        let mut app = App::new();
        app.apply(cards_update(&["Harvest", "Seeds"]));

        let text = render(&mut app);
        assert!(text.contains("2024.06.03"));
        assert!(text.contains("Harvest"));
        assert!(text.contains("Seeds"));
        assert!(text.contains("images/concept.png"));
        assert!(text.contains("2 articles"), "status bar should show card count");
        assert!(text.contains("a: all articles"));
    }

    #[test]
    fn draw_shows_placeholder_message() {
        let mut app = App::new();
        app.apply(SurfaceUpdate {
            content: Content::Placeholder(Placeholder::NoEntries),
            motions: Vec::new(),
        });

        let text = render(&mut app);
        assert!(text.contains("No articles found."));
        assert!(text.contains("0 articles"));
    }

    #[test]
    fn card_height_is_constant_under_float() {
        let c = card("x");
        assert_eq!(card_lines(&c, 0).len(), CARD_HEIGHT);
        assert_eq!(card_lines(&c, FLOAT_AMPLITUDE).len(), CARD_HEIGHT);
        // floated card starts with a blank row
        assert_eq!(card_lines(&c, 1)[0], Line::raw(""));
    }
}
