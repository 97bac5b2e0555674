// Filter sidebar: color and mana-cost toggles, sort order, language.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use arenadraft_core::card::Color as ManaColor;
use arenadraft_core::draft::filter::{ViewFilter, CMC_BUCKETS, CMC_HIGH_BUCKET};

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines = vec![Line::from(Span::styled(
        "Colors",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    lines.push(Line::from(color_spans(&state.filter)));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Mana cost",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(cmc_spans(&state.filter)));
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("Order ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(state.card_order().label()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Lang  ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(state.snapshot.language.name()),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Filters"));
    frame.render_widget(paragraph, area);
}

pub fn toggle_style(enabled: bool) -> Style {
    if enabled {
        Style::default().fg(Color::Black).bg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// `W U B R G C`, each lit when its toggle is on.
pub fn color_spans(filter: &ViewFilter) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for color in ManaColor::ALL {
        spans.push(Span::styled(
            color.symbol().to_string(),
            toggle_style(filter.color_enabled(color)),
        ));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled("C", toggle_style(filter.colorless)));
    spans
}

/// `0 1 2 3 4 5 6+`, each lit when its toggle is on.
pub fn cmc_spans(filter: &ViewFilter) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for bucket in 0..CMC_BUCKETS {
        let label = if bucket == CMC_HIGH_BUCKET {
            format!("{bucket}+")
        } else {
            bucket.to_string()
        };
        spans.push(Span::styled(label, toggle_style(filter.cmc[bucket])));
        if bucket != CMC_HIGH_BUCKET {
            spans.push(Span::raw(" "));
        }
    }
    spans
}
