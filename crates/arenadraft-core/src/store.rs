// SQLite persistence layer for the draft state.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::card::CardCounts;
use crate::draft::state::DraftState;

/// Keys the draft state is persisted under. Each value is stored as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    SessionId,
    PlayerId,
    Collection,
    CollectionDate,
    CardPool,
    Picks,
}

impl StoreKey {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreKey::SessionId => "sessionid",
            StoreKey::PlayerId => "playerid",
            StoreKey::Collection => "collection",
            StoreKey::CollectionDate => "collection_date",
            StoreKey::CardPool => "cardpool",
            StoreKey::Picks => "picks",
        }
    }
}

/// SQLite-backed key-value store. A single table, one row per key.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) the store at `path`. Pass `":memory:"` for an
    /// ephemeral store.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open store at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set store pragmas")?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS draft_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
        .context("failed to create store schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open the store at `path`, creating parent directories first.
    pub fn open_file(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create store directory {}", parent.display())
            })?;
        }
        Self::open(&path.to_string_lossy())
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A poisoned lock only means another thread panicked mid-call; the
        // connection itself is still usable.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> Result<()> {
        let json = serde_json::to_string(value).context("failed to serialize state value")?;
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO draft_state (key, value) VALUES (?1, ?2)",
                params![key.as_str(), json],
            )
            .with_context(|| format!("failed to save {}", key.as_str()))?;
        Ok(())
    }

    /// Load the value stored under `key`. Returns `None` when absent.
    pub fn load<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>> {
        let json: Option<String> = self
            .conn()
            .query_row(
                "SELECT value FROM draft_state WHERE key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to load {}", key.as_str()))?;

        match json {
            Some(json) => {
                let value = serde_json::from_str(&json)
                    .with_context(|| format!("failed to deserialize {}", key.as_str()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub fn remove(&self, key: StoreKey) -> Result<()> {
        self.conn()
            .execute(
                "DELETE FROM draft_state WHERE key = ?1",
                params![key.as_str()],
            )
            .with_context(|| format!("failed to remove {}", key.as_str()))?;
        Ok(())
    }

    /// Save `value` under `key`, or remove the key when `value` is `None`.
    fn put<T: Serialize>(&self, key: StoreKey, value: Option<&T>) -> Result<()> {
        match value {
            Some(v) => self.save(key, v),
            None => self.remove(key),
        }
    }

    /// Write every persisted field of `state`. Absent fields remove their key.
    pub fn persist(&self, state: &DraftState) -> Result<()> {
        self.put(StoreKey::SessionId, state.session_id.as_ref())?;
        self.put(StoreKey::PlayerId, state.player_id.as_ref())?;
        self.put(StoreKey::Collection, state.collection.as_ref())?;
        self.put(StoreKey::CollectionDate, state.collection_date.as_ref())?;
        self.put(StoreKey::CardPool, state.card_pool.as_ref())?;
        self.put(StoreKey::Picks, state.picks.as_ref())?;
        Ok(())
    }

    /// Rebuild a draft state from the stored keys.
    ///
    /// A key that fails to decode is dropped with a warning instead of
    /// failing the whole restore.
    pub fn restore(&self) -> Result<DraftState> {
        Ok(DraftState {
            session_id: self.load_lenient::<String>(StoreKey::SessionId)?,
            player_id: self.load_lenient::<String>(StoreKey::PlayerId)?,
            collection: self.load_lenient::<CardCounts>(StoreKey::Collection)?,
            collection_date: self.load_lenient::<DateTime<Utc>>(StoreKey::CollectionDate)?,
            card_pool: self.load_lenient::<CardCounts>(StoreKey::CardPool)?,
            picks: self.load_lenient::<CardCounts>(StoreKey::Picks)?,
            session_details: None,
        })
    }

    fn load_lenient<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>> {
        match self.load(key) {
            Ok(v) => Ok(v),
            Err(e) if is_decode_error(&e) => {
                warn!("Discarding stored {}: {e:#}", key.as_str());
                self.remove(key)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

fn is_decode_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<serde_json::Error>())
}
