// Controller flow tests.
//
// These drive `AppState` through its public handlers with a fake session
// service. Requests spawned by the controller are read back from the API
// channel and fed in by hand, so each step of a flow is explicit.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use arenadraft_app::app::{self, ApiEvent, AppState};
use arenadraft_app::protocol::{AlertLevel, ConnectionStatus, UiUpdate, UserCommand};
use arenadraft_core::api::{ApiError, SessionApi};
use arenadraft_core::card::{Card, CardCounts, Language};
use arenadraft_core::catalog::Catalog;
use arenadraft_core::channel::ChannelEvent;
use arenadraft_core::config::{Config, RegistrationMode};
use arenadraft_core::draft::order::CardOrder;
use arenadraft_core::draft::state::DraftState;
use arenadraft_core::protocol::{PlayerSummary, SessionOptions, SessionSnapshot};
use arenadraft_core::store::{Store, StoreKey};

// ===========================================================================
// Fake session service
// ===========================================================================

#[derive(Default)]
struct FakeApi {
    /// `None` makes every session lookup fail with "session not found".
    snapshot: Option<SessionSnapshot>,
    pool: CardCounts,
    new_player_id: Option<String>,
    new_session_id: Option<String>,
    pool_requests: AtomicUsize,
}

fn not_found() -> ApiError {
    ApiError::Server("session not found".into())
}

#[async_trait]
impl SessionApi for FakeApi {
    async fn create_session(
        &self,
        _collection: &CardCounts,
        _options: &SessionOptions,
    ) -> Result<String, ApiError> {
        self.new_session_id
            .clone()
            .ok_or_else(|| ApiError::Server("could not create session".into()))
    }

    async fn get_session(&self, _session: &str) -> Result<SessionSnapshot, ApiError> {
        self.snapshot.clone().ok_or_else(not_found)
    }

    async fn register_player(
        &self,
        _session: &str,
        _name: &str,
        _collection: &CardCounts,
    ) -> Result<String, ApiError> {
        self.new_player_id.clone().ok_or_else(not_found)
    }

    async fn set_ready(
        &self,
        _session: &str,
        player: &str,
        ready: bool,
    ) -> Result<SessionSnapshot, ApiError> {
        let mut snapshot = self.snapshot.clone().ok_or_else(not_found)?;
        if let Some(p) = snapshot.players.get_mut(player) {
            p.ready = ready;
        }
        Ok(snapshot)
    }

    async fn fetch_card_pool(&self, _session: &str, _player: &str) -> Result<CardCounts, ApiError> {
        self.pool_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.pool.clone())
    }

    async fn fetch_catalog(&self) -> Result<Catalog, ApiError> {
        Ok(Catalog::default())
    }
}

// ===========================================================================
// Test helpers
// ===========================================================================

struct Harness {
    state: AppState,
    api: Arc<FakeApi>,
    api_rx: mpsc::Receiver<ApiEvent>,
    _channel_rx: mpsc::Receiver<ChannelEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    ui_rx: mpsc::Receiver<UiUpdate>,
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("arenadraft_app_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn test_config(dir: &std::path::Path) -> Config {
    let catalog_path = dir.join("cards.json");
    std::fs::write(
        &catalog_path,
        r#"{"70001": {"name": "Opt", "set": "xln", "cmc": 1.0, "collector_number": "65", "color_identity": ["U"]}}"#,
    )
    .unwrap();
    Config {
        // Nothing listens here; lobby sockets fail to connect, which the
        // tests never wait for.
        base_url: "http://127.0.0.1:1/".into(),
        catalog_path: Some(catalog_path),
        db_path: dir.join("state.db"),
        registration: RegistrationMode::Http,
        player_name: "Player".into(),
        language: Language::English,
        card_order: CardOrder::Color,
        export_path: dir.join("deck.txt"),
    }
}

fn harness(name: &str, api: FakeApi, draft: DraftState) -> Harness {
    let dir = scratch(name);
    let api = Arc::new(api);
    let (api_tx, api_rx) = mpsc::channel(64);
    let (channel_tx, channel_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(1024);
    let store = Store::open(":memory:").unwrap();
    let state = AppState::new(
        test_config(&dir),
        draft,
        store,
        api.clone() as Arc<dyn SessionApi>,
        api_tx,
        channel_tx,
    )
    .unwrap();
    Harness {
        state,
        api,
        api_rx,
        _channel_rx: channel_rx,
        ui_tx,
        ui_rx,
    }
}

impl Harness {
    /// Feed the next `n` API responses back into the controller.
    async fn pump(&mut self, n: usize) {
        for _ in 0..n {
            let event = self.api_rx.recv().await.expect("api event");
            app::handle_api_event(&mut self.state, event, &self.ui_tx).await;
        }
    }

    async fn command(&mut self, cmd: UserCommand) {
        app::handle_user_command(&mut self.state, cmd, &self.ui_tx).await;
    }

    /// True when no request is pending after letting spawned tasks run.
    async fn no_pending_requests(&mut self) -> bool {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        self.api_rx.try_recv().is_err()
    }

    fn error_alerts(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(update) = self.ui_rx.try_recv() {
            if let UiUpdate::Alert(alert) = update {
                if alert.level == AlertLevel::Error {
                    out.push(alert.message);
                }
            }
        }
        out
    }

    fn stored<T: serde::de::DeserializeOwned>(&self, key: StoreKey) -> Option<T> {
        self.state.store.load(key).unwrap()
    }
}

fn counts(entries: &[(&str, u32)]) -> CardCounts {
    entries.iter().map(|(id, n)| (id.to_string(), *n)).collect()
}

fn lobby(players: &[(&str, bool)], started: bool) -> SessionSnapshot {
    let mut snapshot = SessionSnapshot {
        started,
        ..Default::default()
    };
    for (id, ready) in players {
        snapshot.players.insert(
            id.to_string(),
            PlayerSummary {
                name: format!("name-{id}"),
                ready: *ready,
            },
        );
    }
    snapshot
}

fn registered_draft() -> DraftState {
    let mut draft = DraftState::new();
    draft.session_id = Some("s1".into());
    draft.player_id = Some("p1".into());
    draft.collection = Some(counts(&[("70001", 4)]));
    draft
}

// ===========================================================================
// Startup and verification
// ===========================================================================

#[tokio::test]
async fn verified_player_in_open_lobby_connects() {
    let api = FakeApi {
        snapshot: Some(lobby(&[("p1", false)], false)),
        ..Default::default()
    };
    let mut h = harness("verify_open", api, registered_draft());

    app::startup(&mut h.state, &h.ui_tx).await;
    assert_eq!(h.state.catalog.len(), 1);
    h.pump(2).await;

    assert!(h.state.has_channel());
    assert_eq!(h.state.connection, ConnectionStatus::Connecting);
    assert!(h.state.draft.session_details.is_some());
    assert_eq!(h.stored::<String>(StoreKey::PlayerId).as_deref(), Some("p1"));
    assert_eq!(h.stored::<String>(StoreKey::SessionId).as_deref(), Some("s1"));
    assert_eq!(h.api.pool_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn stored_card_pool_skips_verification() {
    let mut draft = registered_draft();
    draft.card_pool = Some(counts(&[("70001", 2)]));
    draft.picks = Some(counts(&[("70001", 1)]));
    let mut h = harness("stored_pool", FakeApi::default(), draft);

    app::startup(&mut h.state, &h.ui_tx).await;

    assert!(h.no_pending_requests().await);
    assert_eq!(h.state.draft.session_id.as_deref(), Some("s1"));
    assert_eq!(h.state.draft.picks, Some(counts(&[("70001", 1)])));
}

#[tokio::test]
async fn unknown_session_clears_everything() {
    let mut draft = registered_draft();
    draft.picks = Some(counts(&[("70001", 1)]));
    let mut h = harness("unknown_session", FakeApi::default(), draft);
    h.state.persist().unwrap();

    app::startup(&mut h.state, &h.ui_tx).await;
    // The second response is from the generation the first one cleared.
    h.pump(2).await;

    assert!(h.state.draft.session_id.is_none());
    assert!(h.state.draft.player_id.is_none());
    assert!(h.state.draft.picks.is_none());
    assert!(h.stored::<String>(StoreKey::SessionId).is_none());
    assert!(h.stored::<CardCounts>(StoreKey::Picks).is_none());
    assert!(!h.error_alerts().is_empty());
}

#[tokio::test]
async fn missing_player_clears_only_registration() {
    let api = FakeApi {
        snapshot: Some(lobby(&[("p2", false)], false)),
        ..Default::default()
    };
    let mut h = harness("missing_player", api, registered_draft());

    app::startup(&mut h.state, &h.ui_tx).await;
    h.pump(2).await;

    assert_eq!(h.state.draft.session_id.as_deref(), Some("s1"));
    assert!(h.state.draft.player_id.is_none());
    assert!(h.state.draft.session_details.is_none());
    assert!(!h.state.has_channel());
    assert_eq!(h.stored::<String>(StoreKey::SessionId).as_deref(), Some("s1"));
    assert!(h.stored::<String>(StoreKey::PlayerId).is_none());
}

// ===========================================================================
// Started transition and card pool
// ===========================================================================

#[tokio::test]
async fn started_session_loads_card_pool_once() {
    let api = FakeApi {
        snapshot: Some(lobby(&[("p1", true)], true)),
        pool: counts(&[("70001", 3)]),
        ..Default::default()
    };
    let mut h = harness("started_pool", api, registered_draft());

    app::startup(&mut h.state, &h.ui_tx).await;
    // Session check, player check, then the pool fetch it triggered.
    h.pump(3).await;

    assert_eq!(h.state.draft.card_pool, Some(counts(&[("70001", 3)])));
    assert_eq!(h.state.draft.picks, Some(CardCounts::new()));
    assert!(!h.state.has_channel());
    assert_eq!(
        h.stored::<CardCounts>(StoreKey::CardPool),
        Some(counts(&[("70001", 3)]))
    );

    // A second started snapshot is not a transition.
    let generation = h.state.generation;
    let again = ApiEvent::ReadyUpdated {
        generation,
        result: Ok(lobby(&[("p1", true)], true)),
    };
    app::handle_api_event(&mut h.state, again, &h.ui_tx).await;
    assert!(h.no_pending_requests().await);
    assert_eq!(h.api.pool_requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn lobby_frame_start_fetches_pool_then_closes_socket() {
    let api = FakeApi {
        snapshot: Some(lobby(&[("p1", false)], false)),
        pool: counts(&[("70001", 2)]),
        ..Default::default()
    };
    let mut h = harness("frame_start", api, registered_draft());

    app::startup(&mut h.state, &h.ui_tx).await;
    h.pump(2).await;
    assert!(h.state.has_channel());

    let frame = ChannelEvent::Frame {
        generation: h.state.generation,
        text: r#"{"players": {"p1": {"name": "a", "ready": true}}, "started": true}"#.into(),
    };
    app::handle_channel_event(&mut h.state, frame, &h.ui_tx).await;
    assert!(h.state.draft.is_started());
    // Socket stays open until the pool arrives.
    assert!(h.state.has_channel());

    h.pump(1).await;
    assert_eq!(h.state.draft.card_pool, Some(counts(&[("70001", 2)])));
    assert!(!h.state.has_channel());
    assert_eq!(h.state.connection, ConnectionStatus::Disconnected);
}

#[tokio::test]
async fn stale_responses_are_ignored() {
    let mut h = harness("stale", FakeApi::default(), registered_draft());
    h.state.generation = 5;

    let late_pool = ApiEvent::CardPool {
        generation: 4,
        result: Ok(counts(&[("70001", 1)])),
    };
    app::handle_api_event(&mut h.state, late_pool, &h.ui_tx).await;
    assert!(h.state.draft.card_pool.is_none());

    let late_error = ApiEvent::SessionVerified {
        generation: 4,
        result: Err(ApiError::Server("session not found".into())),
    };
    app::handle_api_event(&mut h.state, late_error, &h.ui_tx).await;
    assert_eq!(h.state.draft.session_id.as_deref(), Some("s1"));
}

#[tokio::test]
async fn frames_from_an_old_socket_are_ignored() {
    let api = FakeApi {
        snapshot: Some(lobby(&[("p1", false)], false)),
        ..Default::default()
    };
    let mut h = harness("old_socket", api, registered_draft());
    app::startup(&mut h.state, &h.ui_tx).await;
    h.pump(2).await;

    let stale = ChannelEvent::Frame {
        generation: h.state.generation + 1,
        text: r#"{"players": null, "started": true}"#.into(),
    };
    app::handle_channel_event(&mut h.state, stale, &h.ui_tx).await;
    assert!(!h.state.draft.is_started());
}

// ===========================================================================
// Registration and readiness
// ===========================================================================

#[tokio::test]
async fn http_registration_stores_player_and_connects() {
    let api = FakeApi {
        snapshot: Some(lobby(&[("p9", false)], false)),
        new_player_id: Some("p9".into()),
        ..Default::default()
    };
    let mut draft = registered_draft();
    draft.player_id = None;
    let mut h = harness("register", api, draft);

    h.command(UserCommand::Register("alice".into())).await;
    // Registration, then the player check it triggers.
    h.pump(2).await;

    assert_eq!(h.state.draft.player_id.as_deref(), Some("p9"));
    assert_eq!(h.stored::<String>(StoreKey::PlayerId).as_deref(), Some("p9"));
    assert!(h.state.has_channel());
}

#[tokio::test]
async fn registration_needs_a_collection() {
    let mut draft = registered_draft();
    draft.player_id = None;
    draft.collection = None;
    let mut h = harness("register_no_collection", FakeApi::default(), draft);

    h.command(UserCommand::Register("alice".into())).await;

    assert!(h.no_pending_requests().await);
    assert_eq!(h.error_alerts().len(), 1);
}

#[tokio::test]
async fn failed_registration_clears_registration() {
    let mut draft = registered_draft();
    draft.player_id = None;
    let mut h = harness("register_fail", FakeApi::default(), draft);

    h.command(UserCommand::Register("alice".into())).await;
    h.pump(1).await;

    assert!(h.state.draft.player_id.is_none());
    assert_eq!(h.state.draft.session_id.as_deref(), Some("s1"));
    assert_eq!(h.error_alerts().len(), 1);
}

#[tokio::test]
async fn socket_registration_ack_then_start_fetches_pool() {
    let api = FakeApi {
        pool: counts(&[("70001", 2)]),
        ..Default::default()
    };
    let mut draft = registered_draft();
    draft.player_id = None;
    let mut h = harness("register_socket", api, draft);
    h.state.config.registration = RegistrationMode::Socket;

    h.command(UserCommand::Register("zed".into())).await;
    assert!(h.state.has_channel());
    assert_eq!(h.state.connection, ConnectionStatus::Connecting);
    // No HTTP call: the name goes out as the socket's first frame.
    assert!(h.no_pending_requests().await);

    let generation = h.state.generation;
    app::handle_channel_event(&mut h.state, ChannelEvent::Connected { generation }, &h.ui_tx)
        .await;
    assert_eq!(h.state.connection, ConnectionStatus::Connected);

    let ack = ChannelEvent::Frame {
        generation,
        text: r#"{"id": "p7"}"#.into(),
    };
    app::handle_channel_event(&mut h.state, ack, &h.ui_tx).await;
    assert_eq!(h.state.draft.player_id.as_deref(), Some("p7"));
    assert_eq!(h.stored::<String>(StoreKey::PlayerId).as_deref(), Some("p7"));
    assert_eq!(h.state.generation, generation);

    let start = ChannelEvent::Frame {
        generation,
        text: r#"{"players": {"p7": {"name": "zed", "ready": true}}, "started": true}"#.into(),
    };
    app::handle_channel_event(&mut h.state, start, &h.ui_tx).await;
    assert!(h.state.draft.is_started());
    assert!(h.state.has_channel());

    h.pump(1).await;
    assert_eq!(h.api.pool_requests.load(Ordering::SeqCst), 1);
    assert_eq!(h.state.draft.card_pool, Some(counts(&[("70001", 2)])));
    assert!(!h.state.has_channel());
    assert_eq!(h.state.connection, ConnectionStatus::Disconnected);
}

#[tokio::test]
async fn socket_registration_error_frame_clears_registration() {
    let mut draft = registered_draft();
    draft.player_id = None;
    let mut h = harness("register_socket_error", FakeApi::default(), draft);
    h.state.config.registration = RegistrationMode::Socket;

    h.command(UserCommand::Register("zed".into())).await;
    let generation = h.state.generation;
    app::handle_channel_event(&mut h.state, ChannelEvent::Connected { generation }, &h.ui_tx)
        .await;

    let reply = ChannelEvent::Frame {
        generation,
        text: r#"{"error": "dup"}"#.into(),
    };
    app::handle_channel_event(&mut h.state, reply, &h.ui_tx).await;

    assert!(h.state.draft.player_id.is_none());
    assert!(h.stored::<String>(StoreKey::PlayerId).is_none());
    assert_eq!(h.state.draft.session_id.as_deref(), Some("s1"));
    assert!(!h.state.has_channel());
    assert!(h.state.generation > generation);
    assert_eq!(h.error_alerts(), vec!["dup".to_string()]);
}

#[tokio::test]
async fn ready_without_socket_uses_http() {
    let api = FakeApi {
        snapshot: Some(lobby(&[("p1", false)], false)),
        ..Default::default()
    };
    let mut h = harness("ready_http", api, registered_draft());
    h.state.draft.set_session_details(lobby(&[("p1", false)], false));

    h.command(UserCommand::ToggleReady).await;
    h.pump(1).await;

    assert!(h.state.draft.own_ready());
}

#[tokio::test]
async fn create_session_joins_the_new_session() {
    let api = FakeApi {
        snapshot: Some(lobby(&[], false)),
        new_session_id: Some("s2".into()),
        ..Default::default()
    };
    let mut draft = DraftState::new();
    draft.collection = Some(counts(&[("70001", 4)]));
    let mut h = harness("create", api, draft);

    h.command(UserCommand::CreateSession(SessionOptions::default()))
        .await;
    // Creation, then the session check it triggers.
    h.pump(2).await;

    assert_eq!(h.state.draft.session_id.as_deref(), Some("s2"));
    assert_eq!(h.stored::<String>(StoreKey::SessionId).as_deref(), Some("s2"));
}

// ===========================================================================
// Picks, import, export
// ===========================================================================

#[tokio::test]
async fn picks_are_persisted_immediately() {
    let mut draft = registered_draft();
    draft.set_card_pool(counts(&[("70001", 2)]));
    let mut h = harness("picks", FakeApi::default(), draft);

    for _ in 0..3 {
        h.command(UserCommand::Pick("70001".into())).await;
    }
    assert_eq!(
        h.stored::<CardCounts>(StoreKey::Picks),
        Some(counts(&[("70001", 2)]))
    );

    h.command(UserCommand::Unpick("70001".into())).await;
    assert_eq!(
        h.stored::<CardCounts>(StoreKey::Picks),
        Some(counts(&[("70001", 1)]))
    );
}

#[tokio::test]
async fn import_log_replaces_collection() {
    let dir = scratch("import_log_file");
    let log = dir.join("output_log.txt");
    std::fs::write(
        &log,
        "noise\n<== PlayerInventory.GetPlayerCardsV3(12)\n{\"100\": 4, \"200\": 1}\nmore noise {\"x\": 1}\n",
    )
    .unwrap();
    let mut h = harness("import_log", FakeApi::default(), DraftState::new());

    h.command(UserCommand::ImportLog(log)).await;

    assert_eq!(
        h.state.draft.collection,
        Some(counts(&[("100", 4), ("200", 1)]))
    );
    assert!(h.state.draft.collection_date.is_some());
    assert_eq!(
        h.stored::<CardCounts>(StoreKey::Collection),
        Some(counts(&[("100", 4), ("200", 1)]))
    );
    assert_eq!(h.state.build_snapshot().collection_total, 5);
}

#[tokio::test]
async fn import_log_without_marker_alerts() {
    let dir = scratch("import_bad_file");
    let log = dir.join("output_log.txt");
    std::fs::write(&log, "nothing to see").unwrap();
    let mut h = harness("import_bad", FakeApi::default(), DraftState::new());

    h.command(UserCommand::ImportLog(log)).await;

    assert!(h.state.draft.collection.is_none());
    assert_eq!(h.error_alerts().len(), 1);
}

#[tokio::test]
async fn export_writes_deck_file() {
    let mut draft = registered_draft();
    draft.set_card_pool(counts(&[("70001", 2)]));
    draft.pick("70001");
    draft.pick("70001");
    let mut h = harness("export", FakeApi::default(), draft);
    h.state.catalog = Arc::new(Catalog::from_cards(vec![Card {
        id: "70001".into(),
        name: "Opt".into(),
        printed_name: Default::default(),
        image_uris: Default::default(),
        set: "xln".into(),
        cmc: 1,
        collector_number: "65".into(),
        color_identity: vec![],
        rarity: None,
    }]));

    h.command(UserCommand::Export).await;

    let text = std::fs::read_to_string(&h.state.config.export_path).unwrap();
    assert_eq!(text, "1 Opt (XLN) 65\n1 Opt (XLN) 65\n");
}

#[tokio::test]
async fn clear_session_command_drops_pool_and_picks() {
    let mut draft = registered_draft();
    draft.set_card_pool(counts(&[("70001", 2)]));
    let mut h = harness("clear", FakeApi::default(), draft);
    h.state.persist().unwrap();
    let before = h.state.generation;

    h.command(UserCommand::ClearSession).await;

    assert!(h.state.generation > before);
    assert!(h.state.draft.card_pool.is_none());
    assert!(h.stored::<CardCounts>(StoreKey::CardPool).is_none());
    assert!(h.stored::<String>(StoreKey::SessionId).is_none());
}
