// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +---------------------------------+----------------+
// | Main Panel (Lobby/Pool/Deck)    | Filters (26)   |
// |                                 |                |
// +---------------------------------+----------------+
// | Alert (1 row)                                     |
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Fixed width of the filter sidebar.
const SIDEBAR_WIDTH: u16 = 26;

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Session, player, counts, connection and tabs.
    pub status_bar: Rect,
    /// Tab-switched content area.
    pub main_panel: Rect,
    /// Filter toggles and sort order.
    pub sidebar: Rect,
    /// Last alert from the controller.
    pub alert_bar: Rect,
    /// Keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(6),    // main + sidebar
            Constraint::Length(1), // alert
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vertical[1]);

    AppLayout {
        status_bar: vertical[0],
        main_panel: horizontal[0],
        sidebar: horizontal[1],
        alert_bar: vertical[2],
        help_bar: vertical[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_fills_standard_terminal() {
        let layout = build_layout(Rect::new(0, 0, 120, 40));

        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.alert_bar.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.main_panel.height, 37);
        assert_eq!(layout.sidebar.width, SIDEBAR_WIDTH);
        assert_eq!(layout.main_panel.width + layout.sidebar.width, 120);
    }

    #[test]
    fn zones_are_stacked_in_order() {
        let layout = build_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.status_bar.y, 0);
        assert_eq!(layout.main_panel.y, 1);
        assert_eq!(layout.sidebar.y, 1);
        assert_eq!(layout.alert_bar.y, 22);
        assert_eq!(layout.help_bar.y, 23);
        assert_eq!(layout.sidebar.x, layout.main_panel.x + layout.main_panel.width);
    }
}
