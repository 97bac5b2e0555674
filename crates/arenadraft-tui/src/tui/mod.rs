// TUI module: ratatui-based terminal dashboard for the draft session.
//
// Architecture:
// - `ViewState` holds the latest controller snapshot plus purely local view
//   state (active tab, selections, filter toggles, prompt text, the options
//   of a session being set up).
// - `apply_ui_update` folds controller updates into the view state.
// - `run` owns the terminal: it renders on a fixed tick and turns key
//   presses into `UserCommand`s via `input::handle_key`.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;

use arenadraft_app::protocol::{Alert, AppSnapshot, UiUpdate, UserCommand};
use arenadraft_core::card::Card;
use arenadraft_core::draft::filter::ViewFilter;
use arenadraft_core::draft::order::CardOrder;
use arenadraft_core::draft::views::{self, LobbyEntry, PoolEntry};
use arenadraft_core::protocol::SessionOptions;

use layout::build_layout;

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// Main panel tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabId {
    #[default]
    Lobby,
    Pool,
    Deck,
}

/// What a text prompt collects when submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Session,
    Register,
    LogPath,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::Session => " Session id ",
            PromptKind::Register => " Player name (empty = default) ",
            PromptKind::LogPath => " Arena log file ",
        }
    }
}

/// An open single-line text prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub text: String,
}

/// Local state for the TUI render loop.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub snapshot: AppSnapshot,
    pub active_tab: TabId,
    pub pool_selected: usize,
    pub deck_selected: usize,
    pub lobby_scroll: usize,
    pub filter: ViewFilter,
    /// Sort order picked with `o`; until then the configured one applies.
    pub order_override: Option<CardOrder>,
    pub alert: Option<Alert>,
    pub confirm_quit: bool,
    pub prompt: Option<Prompt>,
    /// Options of the session being set up with `N`.
    pub session_setup: Option<SessionOptions>,
}

impl ViewState {
    /// Replace the controller-owned part of the view and clamp selections
    /// to the new row counts.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        self.snapshot = snapshot;
        self.clamp_selection();
    }

    pub fn card_order(&self) -> CardOrder {
        self.order_override.unwrap_or(self.snapshot.card_order)
    }

    pub fn toggle_order(&mut self) {
        self.order_override = Some(self.card_order().toggle());
    }

    /// Pool rows as shown on the Pool tab: filtered, then sorted.
    pub fn pool_rows(&self) -> Vec<PoolEntry> {
        views::card_pool_view(
            self.snapshot.card_pool.as_ref(),
            self.snapshot.picks.as_ref(),
            &self.snapshot.catalog,
            &self.filter,
            self.card_order(),
        )
    }

    /// Deck rows as shown on the Deck tab: one row per copy, grouped by
    /// mana cost.
    pub fn deck_rows(&self) -> Vec<Card> {
        let deck = views::deck_unsorted(self.snapshot.picks.as_ref(), &self.snapshot.catalog);
        views::deck_by_cmc(&deck).into_values().flatten().collect()
    }

    pub fn lobby_rows(&self) -> Vec<LobbyEntry> {
        views::lobby(
            self.snapshot.session_details.as_ref(),
            self.snapshot.player_id.as_deref(),
        )
    }

    pub fn clamp_selection(&mut self) {
        self.pool_selected = clamp(self.pool_selected, self.pool_rows().len());
        self.deck_selected = clamp(self.deck_selected, self.deck_rows().len());
        self.lobby_scroll = clamp(self.lobby_scroll, self.lobby_rows().len());
    }
}

fn clamp(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

/// Apply a controller update to the view state.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => state.apply_snapshot(*snapshot),
        UiUpdate::Alert(alert) => state.alert = Some(alert),
        UiUpdate::ConnectionStatus(status) => state.snapshot.connection = status,
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    match state.active_tab {
        TabId::Lobby => widgets::lobby::render(frame, layout.main_panel, state),
        TabId::Pool => widgets::pool::render(frame, layout.main_panel, state),
        TabId::Deck => widgets::deck::render(frame, layout.main_panel, state),
    }
    widgets::filters::render(frame, layout.sidebar, state);
    widgets::help_bar::render_alert(frame, layout.alert_bar, state);
    widgets::help_bar::render(frame, layout.help_bar, state);

    if let Some(prompt) = &state.prompt {
        widgets::prompt::render(frame, frame.area(), prompt);
    }
    if let Some(options) = &state.session_setup {
        widgets::session_setup::render(frame, frame.area(), options);
    }
    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop until the user quits or the controller goes away.
///
/// Initializes the terminal, installs a panic hook that restores it, then
/// selects over controller updates, keyboard input and the render tick.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    // ~30fps
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Controller is shutting down
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!("Terminal input error: {e}");
                        break;
                    }
                    None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use arenadraft_app::protocol::{AlertLevel, ConnectionStatus};
    use arenadraft_core::card::Color;
    use arenadraft_core::catalog::Catalog;
    use arenadraft_core::protocol::{PlayerSummary, SessionSnapshot};

    pub(crate) fn card(id: &str, name: &str, cmc: u32, colors: Vec<Color>) -> Card {
        Card {
            id: id.into(),
            name: name.into(),
            printed_name: Default::default(),
            image_uris: Default::default(),
            set: "m19".into(),
            cmc,
            collector_number: id.into(),
            color_identity: colors,
            rarity: None,
        }
    }

    /// A snapshot with a three-card pool, one copy of `shock` picked, and a
    /// two-player lobby.
    pub(crate) fn sample_snapshot() -> AppSnapshot {
        let catalog = Catalog::from_cards(vec![
            card("1", "Shock", 1, vec![Color::Red]),
            card("2", "Opt", 1, vec![Color::Blue]),
            card("3", "Ornithopter", 0, vec![]),
        ]);
        let pool: BTreeMap<String, u32> =
            [("1".to_string(), 2), ("2".to_string(), 1), ("3".to_string(), 1)].into();
        let picks: BTreeMap<String, u32> = [("1".to_string(), 1)].into();
        let mut players = BTreeMap::new();
        players.insert(
            "p1".to_string(),
            PlayerSummary {
                name: "Alice".into(),
                ready: true,
            },
        );
        players.insert(
            "p2".to_string(),
            PlayerSummary {
                name: "Bob".into(),
                ready: false,
            },
        );
        AppSnapshot {
            session_id: Some("s1".into()),
            player_id: Some("p1".into()),
            card_pool: Some(pool),
            picks: Some(picks),
            catalog: Arc::new(catalog),
            session_details: Some(SessionSnapshot {
                players,
                started: true,
                ..Default::default()
            }),
            started: true,
            own_ready: true,
            ..Default::default()
        }
    }

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert_eq!(state.active_tab, TabId::Lobby);
        assert_eq!(state.pool_selected, 0);
        assert!(state.alert.is_none());
        assert!(state.prompt.is_none());
        assert!(!state.confirm_quit);
        assert_eq!(state.filter, ViewFilter::default());
        assert!(state.pool_rows().is_empty());
        assert!(state.deck_rows().is_empty());
    }

    #[test]
    fn snapshot_feeds_derived_rows() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Snapshot(Box::new(sample_snapshot())));

        let pool = state.pool_rows();
        assert_eq!(pool.len(), 3);
        let shock = pool.iter().find(|e| e.card.id == "1").map(|e| e.count);
        assert_eq!(shock, Some(1));

        let deck = state.deck_rows();
        assert_eq!(deck.len(), 1);
        assert_eq!(deck[0].name, "Shock");

        let lobby = state.lobby_rows();
        assert_eq!(lobby.len(), 2);
        assert!(lobby.iter().any(|e| e.is_self && e.name == "Alice"));
    }

    #[test]
    fn snapshot_clamps_selection() {
        let mut state = ViewState::default();
        state.pool_selected = 10;
        state.deck_selected = 4;
        state.apply_snapshot(sample_snapshot());
        assert_eq!(state.pool_selected, 2);
        assert_eq!(state.deck_selected, 0);
    }

    #[test]
    fn filter_hides_pool_rows() {
        let mut state = ViewState::default();
        state.apply_snapshot(sample_snapshot());
        state.filter.toggle_colorless();
        state.filter.toggle_color(Color::Blue);
        let names: Vec<String> = state.pool_rows().into_iter().map(|e| e.card.name).collect();
        assert_eq!(names, vec!["Shock".to_string()]);
    }

    #[test]
    fn order_override_starts_from_configured_order() {
        let mut state = ViewState::default();
        let mut snapshot = sample_snapshot();
        snapshot.card_order = CardOrder::Cmc;
        state.apply_snapshot(snapshot);
        assert_eq!(state.card_order(), CardOrder::Cmc);
        state.toggle_order();
        assert_eq!(state.card_order(), CardOrder::Color);
        state.toggle_order();
        assert_eq!(state.card_order(), CardOrder::Cmc);
    }

    #[test]
    fn alert_and_connection_updates() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Alert(Alert::error("boom")));
        assert_eq!(state.alert.as_ref().map(|a| a.level), Some(AlertLevel::Error));

        apply_ui_update(
            &mut state,
            UiUpdate::ConnectionStatus(ConnectionStatus::Connected),
        );
        assert_eq!(state.snapshot.connection, ConnectionStatus::Connected);
    }

    #[test]
    fn render_frame_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.apply_snapshot(sample_snapshot());
        for tab in [TabId::Lobby, TabId::Pool, TabId::Deck] {
            state.active_tab = tab;
            terminal.draw(|frame| render_frame(frame, &state)).unwrap();
        }
        state.prompt = Some(Prompt {
            kind: PromptKind::Session,
            text: "abc".into(),
        });
        state.confirm_quit = true;
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();

        state.prompt = None;
        state.confirm_quit = false;
        state.session_setup = Some(SessionOptions::default());
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
    }
}
