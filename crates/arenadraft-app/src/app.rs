// Application state and orchestration logic.
//
// The central event loop that coordinates user commands from the TUI, HTTP
// responses from the session service and frames from the lobby socket. Owns
// the draft state, persists it after every effective change and pushes
// snapshots to the TUI render loop.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use arenadraft_core::api::{ApiError, SessionApi};
use arenadraft_core::card::{CardCounts, Language};
use arenadraft_core::catalog::Catalog;
use arenadraft_core::channel::{ChannelEvent, RealtimeChannel};
use arenadraft_core::collection::{extract_collection, total_copies};
use arenadraft_core::config::{Config, RegistrationMode};
use arenadraft_core::draft::state::DraftState;
use arenadraft_core::draft::views;
use arenadraft_core::export::export_deck;
use arenadraft_core::protocol::{
    parse_frame, Frame, RegisterPlayerRequest, SessionOptions, SessionSnapshot,
};
use arenadraft_core::store::Store;

use crate::protocol::{Alert, AppSnapshot, ConnectionStatus, UiUpdate, UserCommand};
use crate::session_client::Endpoints;

// ---------------------------------------------------------------------------
// API responses
// ---------------------------------------------------------------------------

/// Completed session service calls, reported back to the event loop.
///
/// Every session-scoped response carries the generation that was current
/// when the request was sent; responses from an older generation are
/// dropped.
#[derive(Debug)]
pub enum ApiEvent {
    Catalog(Result<Catalog, ApiError>),
    SessionCreated {
        generation: u64,
        result: Result<String, ApiError>,
    },
    SessionVerified {
        generation: u64,
        result: Result<SessionSnapshot, ApiError>,
    },
    PlayerVerified {
        generation: u64,
        result: Result<SessionSnapshot, ApiError>,
    },
    PlayerRegistered {
        generation: u64,
        result: Result<String, ApiError>,
    },
    ReadyUpdated {
        generation: u64,
        result: Result<SessionSnapshot, ApiError>,
    },
    CardPool {
        generation: u64,
        result: Result<CardCounts, ApiError>,
    },
}

impl ApiEvent {
    fn generation(&self) -> Option<u64> {
        match self {
            ApiEvent::Catalog(_) => None,
            ApiEvent::SessionCreated { generation, .. }
            | ApiEvent::SessionVerified { generation, .. }
            | ApiEvent::PlayerVerified { generation, .. }
            | ApiEvent::PlayerRegistered { generation, .. }
            | ApiEvent::ReadyUpdated { generation, .. }
            | ApiEvent::CardPool { generation, .. } => Some(*generation),
        }
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<Catalog>,
    pub draft: DraftState,
    pub store: Store,
    /// Bumped whenever the session or player id changes or is cleared.
    pub generation: u64,
    pub connection: ConnectionStatus,
    pub language: Language,
    api: Arc<dyn SessionApi>,
    api_tx: mpsc::Sender<ApiEvent>,
    channel_tx: mpsc::Sender<ChannelEvent>,
    channel: Option<RealtimeChannel>,
    endpoints: Endpoints,
    /// The next lobby frame is the socket registration ack.
    awaiting_ack: bool,
    /// Tear the lobby socket down once the card pool request completes.
    close_channel_after_pool: bool,
}

impl AppState {
    pub fn new(
        config: Config,
        draft: DraftState,
        store: Store,
        api: Arc<dyn SessionApi>,
        api_tx: mpsc::Sender<ApiEvent>,
        channel_tx: mpsc::Sender<ChannelEvent>,
    ) -> Result<Self, ApiError> {
        let endpoints = Endpoints::new(&config.base_url)?;
        let language = config.language;
        Ok(Self {
            config,
            catalog: Arc::new(Catalog::default()),
            draft,
            store,
            generation: 0,
            connection: ConnectionStatus::Disconnected,
            language,
            api,
            api_tx,
            channel_tx,
            channel: None,
            endpoints,
            awaiting_ack: false,
            close_channel_after_pool: false,
        })
    }

    pub fn build_snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            session_id: self.draft.session_id.clone(),
            player_id: self.draft.player_id.clone(),
            collection_total: views::total(self.draft.collection.as_ref()),
            collection_date: self.draft.collection_date,
            session_details: self.draft.session_details.clone(),
            card_pool: self.draft.card_pool.clone(),
            picks: self.draft.picks.clone(),
            catalog: Arc::clone(&self.catalog),
            started: self.draft.is_started(),
            own_ready: self.draft.own_ready(),
            language: self.language,
            card_order: self.config.card_order,
            connection: self.connection,
        }
    }

    pub fn has_channel(&self) -> bool {
        self.channel.is_some()
    }

    fn bump_generation(&mut self) {
        self.generation += 1;
        debug!("Session generation is now {}", self.generation);
    }

    fn close_channel(&mut self) {
        if let Some(channel) = self.channel.take() {
            channel.close();
        }
        self.connection = ConnectionStatus::Disconnected;
        self.awaiting_ack = false;
        self.close_channel_after_pool = false;
    }

    /// Leave the session: registration, pool and picks are dropped too.
    pub fn clear_session(&mut self) {
        info!("Clearing session");
        self.close_channel();
        self.draft.clear_session();
        self.bump_generation();
    }

    /// Drop the player registration but keep the session.
    pub fn clear_registration(&mut self) {
        info!("Clearing player registration");
        self.close_channel();
        self.draft.clear_registration();
        self.bump_generation();
    }

    /// Switch to session `id` and verify it. Joining a different session
    /// drops everything tied to the previous one.
    fn set_session(&mut self, id: String) {
        if self.draft.session_id.as_deref() != Some(id.as_str()) {
            self.clear_session();
            self.draft.session_id = Some(id);
        }
        self.verify_session();
    }

    fn set_player(&mut self, id: String) {
        self.close_channel();
        self.draft.player_id = Some(id);
        self.draft.session_details = None;
        self.bump_generation();
        self.verify_player();
    }

    /// Spawn a session call tagged with the current generation.
    fn spawn_request<T, Fut>(&self, request: Fut, wrap: fn(u64, Result<T, ApiError>) -> ApiEvent)
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let tx = self.api_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = request.await;
            let _ = tx.send(wrap(generation, result)).await;
        });
    }

    /// Check that the stored session still exists.
    fn verify_session(&mut self) {
        let Some(session) = self.draft.session_id.clone() else {
            self.clear_session();
            return;
        };
        let api = Arc::clone(&self.api);
        self.spawn_request(
            async move { api.get_session(&session).await },
            |generation, result| ApiEvent::SessionVerified { generation, result },
        );
    }

    /// Check that the stored player is still registered in the session.
    fn verify_player(&mut self) {
        let Some(session) = self.draft.session_id.clone() else {
            self.clear_session();
            return;
        };
        if self.draft.player_id.is_none() {
            self.clear_registration();
            return;
        }
        let api = Arc::clone(&self.api);
        self.spawn_request(
            async move { api.get_session(&session).await },
            |generation, result| ApiEvent::PlayerVerified { generation, result },
        );
    }

    fn request_card_pool(&self) {
        let (Some(session), Some(player)) =
            (self.draft.session_id.clone(), self.draft.player_id.clone())
        else {
            return;
        };
        info!("Requesting card pool");
        let api = Arc::clone(&self.api);
        self.spawn_request(
            async move { api.fetch_card_pool(&session, &player).await },
            |generation, result| ApiEvent::CardPool { generation, result },
        );
    }

    /// Open the lobby socket for the registered player.
    fn connect_lobby(&mut self) {
        if self.channel.is_some() {
            return;
        }
        let (Some(session), Some(player)) = (&self.draft.session_id, &self.draft.player_id) else {
            return;
        };
        let url = self.endpoints.lobby_socket(session, player);
        info!("Opening lobby socket {url}");
        self.channel = Some(RealtimeChannel::connect(
            url,
            self.generation,
            None,
            self.channel_tx.clone(),
        ));
        self.connection = ConnectionStatus::Connecting;
    }

    /// Replace the lobby snapshot. On the started transition the card pool
    /// is fetched, and the socket is closed once that fetch completes.
    fn apply_session_details(&mut self, details: SessionSnapshot) {
        if self.draft.set_session_details(details) {
            self.close_channel_after_pool = self.channel.is_some();
            self.request_card_pool();
        }
    }

    /// Load the catalog from the configured file, or fetch it from the
    /// server when none is configured.
    fn load_catalog(&mut self) -> Option<Alert> {
        match self.config.catalog_path.clone() {
            Some(path) => match Catalog::load(&path) {
                Ok(catalog) => {
                    self.catalog = Arc::new(catalog);
                    None
                }
                Err(e) => {
                    warn!("{e}");
                    Some(Alert::error(format!("Failed to load card catalog: {e}")))
                }
            },
            None => {
                let api = Arc::clone(&self.api);
                let tx = self.api_tx.clone();
                tokio::spawn(async move {
                    let result = api.fetch_catalog().await;
                    let _ = tx.send(ApiEvent::Catalog(result)).await;
                });
                None
            }
        }
    }

    pub fn persist(&self) -> anyhow::Result<()> {
        self.store.persist(&self.draft)
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on three channels using `tokio::select!`:
/// 1. User commands from the TUI
/// 2. Session service responses
/// 3. Lobby socket events
///
/// Pushes a fresh snapshot through `ui_tx` after every event.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut api_rx: mpsc::Receiver<ApiEvent>,
    mut channel_rx: mpsc::Receiver<ChannelEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    startup(&mut state, &ui_tx).await;
    send_snapshot(&state, &ui_tx).await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => handle_user_command(&mut state, cmd, &ui_tx).await,
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            Some(event) = api_rx.recv() => {
                handle_api_event(&mut state, event, &ui_tx).await;
            }

            Some(event) = channel_rx.recv() => {
                handle_channel_event(&mut state, event, &ui_tx).await;
            }
        }
        send_snapshot(&state, &ui_tx).await;
    }

    state.close_channel();
    info!("Application event loop exiting");
    Ok(())
}

/// Restore-time work: load the catalog and re-verify the stored session.
///
/// A stored card pool means the draft already started; no verification is
/// done in that case.
pub async fn startup(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    if let Some(alert) = state.load_catalog() {
        send_alert(ui_tx, alert).await;
    }

    if state.draft.card_pool.is_some() {
        info!("Card pool restored; skipping session verification");
        return;
    }

    if state.draft.session_id.is_none() {
        state.clear_session();
        persist(state, ui_tx).await;
        return;
    }

    if state.draft.player_id.is_none() {
        state.clear_registration();
        state.verify_session();
    } else {
        state.verify_session();
        state.verify_player();
    }
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;
}

async fn send_alert(ui_tx: &mpsc::Sender<UiUpdate>, alert: Alert) {
    let _ = ui_tx.send(UiUpdate::Alert(alert)).await;
}

async fn persist(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    if let Err(e) = state.persist() {
        warn!("Failed to persist draft state: {e:#}");
        send_alert(ui_tx, Alert::error(format!("Failed to save state: {e}"))).await;
    }
}

// ---------------------------------------------------------------------------
// User commands
// ---------------------------------------------------------------------------

/// Handle a user command from the TUI.
pub async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::SetSession(id) => {
            let id = id.trim().to_string();
            if id.is_empty() {
                state.clear_session();
            } else {
                info!("Joining session {id}");
                state.set_session(id);
            }
            persist(state, ui_tx).await;
        }
        UserCommand::CreateSession(options) => create_session(state, options, ui_tx).await,
        UserCommand::Register(name) => register(state, name, ui_tx).await,
        UserCommand::ToggleReady => toggle_ready(state, ui_tx).await,
        UserCommand::Pick(card_id) => {
            if state.draft.pick(&card_id) {
                debug!("Picked {card_id}");
                persist(state, ui_tx).await;
            }
        }
        UserCommand::Unpick(card_id) => {
            if state.draft.unpick(&card_id) {
                debug!("Unpicked {card_id}");
                persist(state, ui_tx).await;
            }
        }
        UserCommand::ImportLog(path) => {
            let text = match tokio::fs::read_to_string(&path).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to read {}: {e}", path.display());
                    let msg = format!("Failed to read {}: {e}", path.display());
                    send_alert(ui_tx, Alert::error(msg)).await;
                    return;
                }
            };
            match extract_collection(&text) {
                Ok(collection) => {
                    let total = total_copies(&collection);
                    state.draft.set_collection(collection, Utc::now());
                    persist(state, ui_tx).await;
                    send_alert(ui_tx, Alert::info(format!("Imported collection: {total} cards")))
                        .await;
                }
                Err(e) => {
                    warn!("Collection import failed: {e}");
                    send_alert(ui_tx, Alert::error(format!("Collection import failed: {e}")))
                        .await;
                }
            }
        }
        UserCommand::ClearSession => {
            state.clear_session();
            persist(state, ui_tx).await;
        }
        UserCommand::ClearRegistration => {
            state.clear_registration();
            persist(state, ui_tx).await;
        }
        UserCommand::SetLanguage(language) => {
            state.language = language;
        }
        UserCommand::Export => export(state, ui_tx).await,
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

async fn create_session(
    state: &mut AppState,
    options: SessionOptions,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let Some(collection) = state.draft.collection.clone() else {
        send_alert(ui_tx, Alert::error("Import a collection before creating a session")).await;
        return;
    };
    info!("Creating session");
    let api = Arc::clone(&state.api);
    state.spawn_request(
        async move { api.create_session(&collection, &options).await },
        |generation, result| ApiEvent::SessionCreated { generation, result },
    );
}

async fn register(state: &mut AppState, name: String, ui_tx: &mpsc::Sender<UiUpdate>) {
    let name = match name.trim() {
        "" => state.config.player_name.clone(),
        n => n.to_string(),
    };
    let Some(session) = state.draft.session_id.clone() else {
        send_alert(ui_tx, Alert::error("Join a session before registering")).await;
        return;
    };
    let Some(collection) = state.draft.collection.clone() else {
        send_alert(ui_tx, Alert::error("Import a collection before registering")).await;
        return;
    };

    info!("Registering as {name}");
    match state.config.registration {
        RegistrationMode::Http => {
            let api = Arc::clone(&state.api);
            state.spawn_request(
                async move { api.register_player(&session, &name, &collection).await },
                |generation, result| ApiEvent::PlayerRegistered { generation, result },
            );
        }
        RegistrationMode::Socket => {
            let request = RegisterPlayerRequest {
                name: &name,
                collection: &collection,
            };
            let first = match serde_json::to_string(&request) {
                Ok(text) => text,
                Err(e) => {
                    send_alert(ui_tx, Alert::error(format!("Registration failed: {e}"))).await;
                    return;
                }
            };
            state.clear_registration();
            persist(state, ui_tx).await;
            let url = state.endpoints.registration_socket(&session);
            info!("Registering over lobby socket {url}");
            state.channel = Some(RealtimeChannel::connect(
                url,
                state.generation,
                Some(first),
                state.channel_tx.clone(),
            ));
            state.connection = ConnectionStatus::Connecting;
            state.awaiting_ack = true;
        }
    }
}

async fn toggle_ready(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let (Some(session), Some(player)) =
        (state.draft.session_id.clone(), state.draft.player_id.clone())
    else {
        send_alert(ui_tx, Alert::error("Register in a session first")).await;
        return;
    };
    let ready = !state.draft.own_ready();

    if let Some(channel) = &state.channel {
        if state.connection == ConnectionStatus::Connected {
            if let Err(e) = channel.send_ready(ready) {
                warn!("Failed to send readiness: {e}");
                send_alert(ui_tx, Alert::error(format!("Failed to send readiness: {e}"))).await;
            }
            return;
        }
    }

    let api = Arc::clone(&state.api);
    state.spawn_request(
        async move { api.set_ready(&session, &player, ready).await },
        |generation, result| ApiEvent::ReadyUpdated { generation, result },
    );
}

async fn export(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let deck = views::deck_unsorted(state.draft.picks.as_ref(), &state.catalog);
    if deck.is_empty() {
        send_alert(ui_tx, Alert::info("Nothing to export: no picks yet")).await;
        return;
    }
    let text = export_deck(&deck, state.language);
    let path = &state.config.export_path;
    match tokio::fs::write(path, text).await {
        Ok(()) => {
            info!("Exported {} cards to {}", deck.len(), path.display());
            let msg = format!("Exported {} cards to {}", deck.len(), path.display());
            send_alert(ui_tx, Alert::info(msg)).await;
        }
        Err(e) => {
            warn!("Export to {} failed: {e}", path.display());
            send_alert(ui_tx, Alert::error(format!("Export failed: {e}"))).await;
        }
    }
}

// ---------------------------------------------------------------------------
// API responses
// ---------------------------------------------------------------------------

/// Handle a completed session service call.
pub async fn handle_api_event(
    state: &mut AppState,
    event: ApiEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    if let Some(generation) = event.generation() {
        if generation != state.generation {
            debug!(
                "Discarding stale API response (event gen: {}, current gen: {})",
                generation, state.generation
            );
            return;
        }
    }

    match event {
        ApiEvent::Catalog(Ok(catalog)) => {
            state.catalog = Arc::new(catalog);
        }
        ApiEvent::Catalog(Err(e)) => {
            warn!("Card catalog fetch failed: {e}");
            send_alert(ui_tx, Alert::error(format!("Failed to load card catalog: {e}"))).await;
        }

        ApiEvent::SessionCreated { result, .. } => match result {
            Ok(id) => {
                info!("Session {id} created");
                state.set_session(id);
                persist(state, ui_tx).await;
            }
            Err(e) => {
                warn!("Session creation failed: {e}");
                send_alert(ui_tx, Alert::error(format!("Could not create session: {e}"))).await;
            }
        },

        ApiEvent::SessionVerified { result, .. } => match result {
            Ok(_) => {
                debug!("Session verified");
                persist(state, ui_tx).await;
            }
            Err(e) => {
                warn!("Session verification failed: {e}");
                state.clear_session();
                persist(state, ui_tx).await;
                send_alert(ui_tx, Alert::error(format!("Session unavailable: {e}"))).await;
            }
        },

        ApiEvent::PlayerVerified { result, .. } => match result {
            Ok(details) => {
                let registered = state
                    .draft
                    .player_id
                    .as_ref()
                    .is_some_and(|p| details.players.contains_key(p));
                if !registered {
                    warn!("Player not found in session");
                    state.clear_registration();
                    persist(state, ui_tx).await;
                    send_alert(ui_tx, Alert::error("Player not found in session")).await;
                    return;
                }
                let started = details.started;
                persist(state, ui_tx).await;
                state.apply_session_details(details);
                if !started {
                    state.connect_lobby();
                }
            }
            Err(e) => {
                warn!("Player verification failed: {e}");
                state.clear_session();
                persist(state, ui_tx).await;
                send_alert(ui_tx, Alert::error(format!("Session unavailable: {e}"))).await;
            }
        },

        ApiEvent::PlayerRegistered { result, .. } => match result {
            Ok(id) => {
                info!("Registered as player {id}");
                state.set_player(id);
                persist(state, ui_tx).await;
            }
            Err(e) => {
                warn!("Registration failed: {e}");
                state.clear_registration();
                persist(state, ui_tx).await;
                send_alert(ui_tx, Alert::error(format!("Registration failed: {e}"))).await;
            }
        },

        ApiEvent::ReadyUpdated { result, .. } => match result {
            Ok(details) => state.apply_session_details(details),
            Err(e) => {
                warn!("Readiness update failed: {e}");
                send_alert(ui_tx, Alert::error(format!("Readiness update failed: {e}"))).await;
            }
        },

        ApiEvent::CardPool { result, .. } => {
            match result {
                Ok(pool) => {
                    state.draft.set_card_pool(pool);
                    persist(state, ui_tx).await;
                    let total = views::total(state.draft.card_pool.as_ref());
                    send_alert(ui_tx, Alert::info(format!("Card pool received: {total} cards")))
                        .await;
                }
                Err(e) => {
                    warn!("Card pool fetch failed: {e}");
                    send_alert(ui_tx, Alert::error(format!("Could not load card pool: {e}")))
                        .await;
                }
            }
            if state.close_channel_after_pool {
                state.close_channel();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Lobby socket
// ---------------------------------------------------------------------------

/// Handle an event from the lobby socket.
///
/// Events are only honored while the channel that produced them is still
/// the current one.
pub async fn handle_channel_event(
    state: &mut AppState,
    event: ChannelEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let current = state
        .channel
        .as_ref()
        .is_some_and(|c| c.generation() == event.generation());
    if !current || event.generation() != state.generation {
        debug!("Discarding event from a closed lobby socket: {event:?}");
        return;
    }

    match event {
        ChannelEvent::Connected { .. } => {
            info!("Lobby socket connected");
            state.connection = ConnectionStatus::Connected;
            let _ = ui_tx
                .send(UiUpdate::ConnectionStatus(ConnectionStatus::Connected))
                .await;
        }
        ChannelEvent::Frame { text, .. } => handle_frame(state, &text, ui_tx).await,
        ChannelEvent::Closed { reason, .. } => {
            info!("Lobby socket closed ({})", reason.as_deref().unwrap_or("no reason"));
            let was_registering = state.awaiting_ack;
            state.channel = None;
            state.connection = ConnectionStatus::Disconnected;
            state.awaiting_ack = false;
            state.close_channel_after_pool = false;
            let _ = ui_tx
                .send(UiUpdate::ConnectionStatus(ConnectionStatus::Disconnected))
                .await;
            let msg = match (was_registering, reason) {
                (true, Some(r)) => format!("Registration failed: {r}"),
                (true, None) => "Registration failed: lobby socket closed".to_string(),
                (false, Some(r)) => format!("Lobby connection lost: {r}"),
                (false, None) => "Lobby connection closed".to_string(),
            };
            send_alert(ui_tx, Alert::error(msg)).await;
        }
    }
}

async fn handle_frame(state: &mut AppState, text: &str, ui_tx: &mpsc::Sender<UiUpdate>) {
    let frame = match parse_frame(text, state.awaiting_ack) {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Malformed lobby frame: {e}");
            return;
        }
    };

    match frame {
        Frame::Error(message) => {
            warn!("Lobby error: {message}");
            if state.awaiting_ack {
                state.clear_registration();
                persist(state, ui_tx).await;
            }
            send_alert(ui_tx, Alert::error(message)).await;
        }
        Frame::Registered(id) => {
            info!("Registered over lobby socket as player {id}");
            state.awaiting_ack = false;
            state.draft.player_id = Some(id);
            persist(state, ui_tx).await;
        }
        Frame::Snapshot(details) => {
            debug!("Lobby snapshot: {} players", details.players.len());
            state.apply_session_details(details);
        }
    }
}
