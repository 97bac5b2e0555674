// Messages between the controller and the terminal UI.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use arenadraft_core::card::{CardCounts, CardId, Language};
use arenadraft_core::catalog::Catalog;
use arenadraft_core::draft::order::CardOrder;
use arenadraft_core::protocol::{SessionOptions, SessionSnapshot};

/// Commands sent from the TUI to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Join an existing session by id.
    SetSession(String),
    CreateSession(SessionOptions),
    /// Register in the current session under this name.
    Register(String),
    ToggleReady,
    Pick(CardId),
    Unpick(CardId),
    /// Import the collection from an Arena client log file.
    ImportLog(PathBuf),
    ClearSession,
    ClearRegistration,
    SetLanguage(Language),
    /// Write the deck list to the configured export file.
    Export,
    Quit,
}

/// State of the lobby socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Error,
}

/// A user-visible notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Error,
            message: message.into(),
        }
    }
}

/// Everything the TUI needs to render, sent after each state change.
#[derive(Debug, Clone, Default)]
pub struct AppSnapshot {
    pub session_id: Option<String>,
    pub player_id: Option<String>,
    pub collection_total: u32,
    pub collection_date: Option<DateTime<Utc>>,
    pub session_details: Option<SessionSnapshot>,
    pub card_pool: Option<CardCounts>,
    pub picks: Option<CardCounts>,
    pub catalog: Arc<Catalog>,
    pub started: bool,
    pub own_ready: bool,
    pub language: Language,
    pub card_order: CardOrder,
    pub connection: ConnectionStatus,
}

/// Updates pushed from the controller to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    Snapshot(Box<AppSnapshot>),
    Alert(Alert),
    ConnectionStatus(ConnectionStatus),
}
