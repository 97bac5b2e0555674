// Status bar widget: connection, session, player, card counts and tabs.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use arenadraft_app::protocol::{AppSnapshot, ConnectionStatus};
use arenadraft_core::draft::views;

use crate::tui::{TabId, ViewState};

/// Render the status bar into the given area.
///
/// Layout: [connection dot] [session summary] | [tab bar]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    let (dot, dot_color) = connection_indicator(state.snapshot.connection);
    spans.push(Span::styled(format!(" {} ", dot), Style::default().fg(dot_color)));

    spans.push(Span::styled(
        session_summary(&state.snapshot),
        Style::default().fg(Color::White),
    ));
    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.extend(tab_spans(state.active_tab));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Return the connection dot character and its color.
pub fn connection_indicator(status: ConnectionStatus) -> (&'static str, Color) {
    match status {
        ConnectionStatus::Connected => ("●", Color::Green),
        ConnectionStatus::Connecting => ("●", Color::Yellow),
        ConnectionStatus::Disconnected => ("●", Color::Red),
    }
}

/// One-line summary, e.g.
/// `Session abc | Player p1 (ready) | Coll 250 (2026-10-16) | Pool 45 | Deck 12 | EN`.
/// The date is when the collection was imported (UTC).
pub fn session_summary(snapshot: &AppSnapshot) -> String {
    let session = snapshot.session_id.as_deref().unwrap_or("--");
    let player = match snapshot.player_id.as_deref() {
        Some(id) if snapshot.started => format!("{id} (drafting)"),
        Some(id) if snapshot.own_ready => format!("{id} (ready)"),
        Some(id) => id.to_string(),
        None => "--".to_string(),
    };
    let pool = views::total(snapshot.card_pool.as_ref());
    let deck = views::total(snapshot.picks.as_ref());
    let collection = match snapshot.collection_date {
        Some(date) => format!(
            "{} ({})",
            snapshot.collection_total,
            date.format("%Y-%m-%d")
        ),
        None => snapshot.collection_total.to_string(),
    };
    format!(
        "Session {session} | Player {player} | Coll {collection} | Pool {} | Deck {deck} | {}",
        pool.saturating_sub(deck),
        snapshot.language.code().to_uppercase()
    )
}

/// Tab indicator spans with the active tab highlighted.
/// E.g. "[1:Lobby] [2:Pool] [3:Deck]"
pub fn tab_spans(active: TabId) -> Vec<Span<'static>> {
    let tabs = [
        (TabId::Lobby, "1:Lobby"),
        (TabId::Pool, "2:Pool"),
        (TabId::Deck, "3:Deck"),
    ];

    let mut spans = Vec::new();
    for (tab_id, label) in tabs {
        let style = if tab_id == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}]", label), style));
        spans.push(Span::raw(" "));
    }
    spans
}
