// Lobby widget: players in the session and their ready flags.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use arenadraft_core::draft::views::LobbyEntry;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let snapshot = &state.snapshot;
    let block = Block::default().borders(Borders::ALL).title(title(state));

    if snapshot.session_id.is_none() {
        let paragraph = Paragraph::new("  No session. Press s to join one or N to create one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let entries = state.lobby_rows();
    if entries.is_empty() {
        let paragraph = Paragraph::new("  Waiting for lobby...")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![Cell::from("Player"), Cell::from("Status")])
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = entries.iter().map(lobby_row).collect();
    let widths = [Constraint::Min(20), Constraint::Length(10)];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray));

    let mut table_state = TableState::default().with_selected(Some(state.lobby_scroll));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn title(state: &ViewState) -> String {
    let snapshot = &state.snapshot;
    match (&snapshot.session_id, snapshot.started) {
        (Some(id), true) => format!("Lobby {id} (started)"),
        (Some(id), false) => format!("Lobby {id}"),
        (None, _) => "Lobby".to_string(),
    }
}

fn lobby_row(entry: &LobbyEntry) -> Row<'static> {
    let name = if entry.is_self {
        format!("{} (you)", display_name(entry))
    } else {
        display_name(entry).to_string()
    };
    let (status, color) = ready_label(entry.ready);
    let mut style = Style::default();
    if entry.is_self {
        style = style.add_modifier(Modifier::BOLD);
    }
    Row::new(vec![
        Cell::from(name),
        Cell::from(status).style(Style::default().fg(color)),
    ])
    .style(style)
}

/// Players may register without a name; fall back to their id.
pub fn display_name(entry: &LobbyEntry) -> &str {
    if entry.name.is_empty() {
        &entry.player_id
    } else {
        &entry.name
    }
}

pub fn ready_label(ready: bool) -> (&'static str, Color) {
    if ready {
        ("ready", Color::Green)
    } else {
        ("waiting", Color::Yellow)
    }
}
