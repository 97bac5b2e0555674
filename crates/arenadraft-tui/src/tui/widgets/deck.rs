// Deck widget: picked cards, one row per copy, grouped by mana cost.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use arenadraft_core::card::{Card, Language};

use super::pool::card_color;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let cards = state.deck_rows();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Deck ({} cards)", cards.len()));

    if cards.is_empty() {
        let paragraph = Paragraph::new("  No picks yet. Pick cards from the Pool tab.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let language = state.snapshot.language;
    let header = Row::new(vec![
        Cell::from("CMC"),
        Cell::from("Name"),
        Cell::from("Col"),
        Cell::from("Set"),
    ])
    .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let first_of_group = i == 0 || cards[i - 1].cmc != card.cmc;
            deck_row(card, language, first_of_group)
        })
        .collect();
    let widths = [
        Constraint::Length(4),
        Constraint::Min(18),
        Constraint::Length(5),
        Constraint::Length(5),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let mut table_state = TableState::default().with_selected(Some(state.deck_selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// The mana cost is only printed on the first row of each group.
fn deck_row(card: &Card, language: Language, first_of_group: bool) -> Row<'static> {
    let cmc = if first_of_group {
        card.cmc.to_string()
    } else {
        String::new()
    };
    Row::new(vec![
        Cell::from(cmc),
        Cell::from(card.display_name(language).to_string()),
        Cell::from(card.color_string()).style(Style::default().fg(card_color(card))),
        Cell::from(card.set.to_uppercase()),
    ])
}
