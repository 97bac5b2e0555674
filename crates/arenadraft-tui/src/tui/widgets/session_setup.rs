// Create-session overlay: format options for a new session, sent with Enter.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use arenadraft_core::card::Color as ManaColor;
use arenadraft_core::protocol::{ColorOptions, RarityOptions, SessionOptions};

use super::filters::toggle_style;
use super::prompt::centered_rect;

const DIALOG_WIDTH: u16 = 44;
const DIALOG_HEIGHT: u16 = 9;

pub fn render(frame: &mut Frame, area: Rect, options: &SessionOptions) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" New session ");

    let lines = vec![
        Line::from(vec![
            label("Singleton  [s] "),
            Span::raw(checkbox(options.singleton)),
        ]),
        Line::from(vec![
            label("Pauper     [p] "),
            Span::raw(checkbox(options.pauper)),
        ]),
        Line::from(vec![
            label("Set       [←→] "),
            Span::styled(
                set_label(&options.set).to_string(),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from([vec![label("Only colors    ")], color_spans(&options.color)].concat()),
        Line::from([vec![label("Only rarity    ")], rarity_spans(&options.rarity)].concat()),
        Line::raw(""),
        Line::from(Span::styled(
            "Enter create  Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

fn label(text: &'static str) -> Span<'static> {
    Span::styled(text, Style::default().add_modifier(Modifier::BOLD))
}

fn checkbox(on: bool) -> &'static str {
    if on {
        "[x]"
    } else {
        "[ ]"
    }
}

fn set_label(set: &str) -> &str {
    if set.is_empty() {
        "any"
    } else {
        set
    }
}

/// `W U B R G C`, lit when the pool is restricted to that color.
fn color_spans(color: &ColorOptions) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for mana in ManaColor::ALL {
        spans.push(Span::styled(
            mana.symbol().to_string(),
            toggle_style(color.lookup(mana)),
        ));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled("C", toggle_style(color.colorless)));
    spans
}

/// `1:C 2:U 3:R 4:M`, lit when the pool is restricted to that rarity.
fn rarity_spans(rarity: &RarityOptions) -> Vec<Span<'static>> {
    let flags = [
        ("1:C", rarity.common),
        ("2:U", rarity.uncommon),
        ("3:R", rarity.rare),
        ("4:M", rarity.mythic),
    ];
    let mut spans = Vec::new();
    for (i, (text, on)) in flags.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(text, toggle_style(on)));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialog_text(options: &SessionOptions) -> String {
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), options))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn empty_set_reads_as_any() {
        assert_eq!(set_label(""), "any");
        assert_eq!(set_label("dom"), "dom");
    }

    #[test]
    fn render_shows_chosen_options() {
        let options = SessionOptions {
            singleton: true,
            set: "rna".into(),
            ..Default::default()
        };
        let text = dialog_text(&options);
        assert!(text.contains("New session"));
        assert!(text.contains("Singleton  [s] [x]"));
        assert!(text.contains("Pauper     [p] [ ]"));
        assert!(text.contains("rna"));
    }

    #[test]
    fn lit_colors_follow_the_options() {
        let mut color = ColorOptions::default();
        color.toggle(ManaColor::Green);
        let spans = color_spans(&color);
        let lit: Vec<&str> = spans
            .iter()
            .filter(|s| s.style == toggle_style(true))
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(lit, vec!["G"]);
    }

    #[test]
    fn render_survives_a_tiny_terminal() {
        let backend = ratatui::backend::TestBackend::new(20, 4);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let options = SessionOptions::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &options))
            .unwrap();
    }
}
