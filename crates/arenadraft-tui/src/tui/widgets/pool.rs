// Card pool widget: remaining pool cards after filtering and sorting.
//
// Columns: copies left, name (in the display language), colors, mana cost,
// set and rarity. The selected row is what Enter picks.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use arenadraft_core::card::{Card, Color as ManaColor, Language};
use arenadraft_core::draft::views::PoolEntry;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let snapshot = &state.snapshot;
    if snapshot.card_pool.is_none() {
        let message = if snapshot.started {
            "  Loading card pool..."
        } else {
            "  The card pool is dealt when the session starts."
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Pool"));
        frame.render_widget(paragraph, area);
        return;
    }

    let entries = state.pool_rows();
    let language = snapshot.language;

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Name"),
        Cell::from("Col"),
        Cell::from("CMC"),
        Cell::from("Set"),
        Cell::from("Rarity"),
    ])
    .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = entries.iter().map(|e| pool_row(e, language)).collect();
    let widths = [
        Constraint::Length(3),
        Constraint::Min(18),
        Constraint::Length(5),
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    "Pool ({} cards, by {})",
                    entries.len(),
                    state.card_order().label()
                )),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let mut table_state = TableState::default().with_selected(Some(state.pool_selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn pool_row(entry: &PoolEntry, language: Language) -> Row<'static> {
    let card = &entry.card;
    Row::new(vec![
        Cell::from(format!("{}x", entry.count)),
        Cell::from(card.display_name(language).to_string()),
        Cell::from(card.color_string()).style(Style::default().fg(card_color(card))),
        Cell::from(card.cmc.to_string()),
        Cell::from(card.set.to_uppercase()),
        Cell::from(card.rarity.clone().unwrap_or_default()),
    ])
}

/// Terminal color for a card: its single color, gold for multicolor, gray
/// for colorless.
pub fn card_color(card: &Card) -> Color {
    match card.color_identity.as_slice() {
        [] => Color::Gray,
        [single] => mana_color(*single),
        _ => Color::Yellow,
    }
}

fn mana_color(color: ManaColor) -> Color {
    match color {
        ManaColor::White => Color::White,
        ManaColor::Blue => Color::Blue,
        ManaColor::Black => Color::Magenta,
        ManaColor::Red => Color::Red,
        ManaColor::Green => Color::Green,
    }
}
