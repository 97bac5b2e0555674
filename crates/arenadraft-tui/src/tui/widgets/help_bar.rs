// Bottom rows: the last alert and the key hints.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use arenadraft_app::protocol::{Alert, AlertLevel};

use crate::tui::{TabId, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        help_text(state.active_tab),
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

pub fn render_alert(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = match &state.alert {
        Some(alert) => alert_line(alert),
        None => Line::raw(""),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn alert_line(alert: &Alert) -> Line<'static> {
    let (tag, color) = match alert.level {
        AlertLevel::Info => ("info", Color::Cyan),
        AlertLevel::Error => ("error", Color::Red),
    };
    Line::from(vec![
        Span::styled(
            format!(" {tag}: "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(alert.message.clone()),
    ])
}

/// Key hints for the active tab.
pub fn help_text(tab: TabId) -> &'static str {
    match tab {
        TabId::Lobby => " q:Quit 1-3:Tabs s:Session N:New n:Register i:Import y:Ready x:Leave l:Lang",
        TabId::Pool => " q:Quit 1-3:Tabs j/k:Move Enter:Pick wubrgc:Colors 0-6:CMC o:Order l:Lang",
        TabId::Deck => " q:Quit 1-3:Tabs j/k:Move Enter:Unpick e:Export l:Lang",
    }
}
