// Single-line text prompt overlay (session id, player name, log path).

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::Prompt;

const PROMPT_WIDTH: u16 = 60;
const PROMPT_HEIGHT: u16 = 3;

pub fn render(frame: &mut Frame, area: Rect, prompt: &Prompt) {
    let dialog_area = centered_rect(PROMPT_WIDTH, PROMPT_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(prompt.kind.title());

    let line = Line::from(vec![
        Span::raw(visible_tail(&prompt.text, dialog_area.width.saturating_sub(3))),
        Span::styled("_", Style::default().fg(Color::Cyan)),
    ]);
    let paragraph = Paragraph::new(line)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

/// The last `width` characters of `text`, so the cursor stays in view.
pub fn visible_tail(text: &str, width: u16) -> String {
    let count = text.chars().count();
    let skip = count.saturating_sub(width as usize);
    text.chars().skip(skip).collect()
}

/// Compute a centered rectangle of the given size within `area`, clamped to
/// the available space.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width);
    let clamped_height = height.min(area.height);

    let vertical = Layout::vertical([Constraint::Length(clamped_height)])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(clamped_width)])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}
