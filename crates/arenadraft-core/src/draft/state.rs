// Draft state: collection, session registration, card pool and picks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::card::CardCounts;
use crate::protocol::SessionSnapshot;

/// The single source of truth for the client's draft data.
///
/// Mutating methods return `true` when something changed so the owner can
/// persist after every effective mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftState {
    /// Owned cards, from the client log or the local store.
    pub collection: Option<CardCounts>,
    /// When the collection was imported.
    pub collection_date: Option<DateTime<Utc>>,
    pub session_id: Option<String>,
    pub player_id: Option<String>,
    /// Latest lobby snapshot; replaced wholesale on every update.
    pub session_details: Option<SessionSnapshot>,
    /// Cards assigned to this player once the session started.
    pub card_pool: Option<CardCounts>,
    /// Copies committed to the deck. `picks[id] <= card_pool[id]` after any
    /// sequence of `pick` calls.
    pub picks: Option<CardCounts>,
}

impl DraftState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection wholesale. Nothing else is invalidated.
    pub fn set_collection(&mut self, collection: CardCounts, imported_at: DateTime<Utc>) {
        info!("Collection replaced ({} distinct cards)", collection.len());
        self.collection = Some(collection);
        self.collection_date = Some(imported_at);
    }

    /// Commit one more copy of `card_id` to the deck.
    ///
    /// Silently does nothing when no copy is left (or no pool is loaded yet).
    pub fn pick(&mut self, card_id: &str) -> bool {
        if self.remaining(card_id) == 0 {
            debug!("Ignoring pick of {card_id}: no copies left");
            return false;
        }
        let Some(picks) = &mut self.picks else {
            return false;
        };
        *picks.entry(card_id.to_string()).or_insert(0) += 1;
        true
    }

    /// Return one copy of `card_id` to the pool. The key is removed when it
    /// reaches zero; unknown keys are a no-op.
    pub fn unpick(&mut self, card_id: &str) -> bool {
        let Some(picks) = &mut self.picks else {
            return false;
        };
        match picks.get(card_id).copied() {
            None | Some(0) => false,
            Some(1) => {
                picks.remove(card_id);
                true
            }
            Some(n) => {
                picks.insert(card_id.to_string(), n - 1);
                true
            }
        }
    }

    /// Copies of `card_id` still available to pick.
    pub fn remaining(&self, card_id: &str) -> u32 {
        let available = self
            .card_pool
            .as_ref()
            .and_then(|p| p.get(card_id).copied())
            .unwrap_or(0);
        let picked = self
            .picks
            .as_ref()
            .and_then(|p| p.get(card_id).copied())
            .unwrap_or(0);
        available.saturating_sub(picked)
    }

    /// Replace the lobby snapshot.
    ///
    /// Returns `true` exactly once per session: when the new snapshot reports
    /// the session as started and the previous one did not.
    pub fn set_session_details(&mut self, details: SessionSnapshot) -> bool {
        let was_started = self.is_started();
        let now_started = details.started;
        self.session_details = Some(details);
        let transitioned = now_started && !was_started;
        if transitioned {
            info!("Session started");
        }
        transitioned
    }

    /// Store the card pool assigned by the session service. Picks start empty
    /// unless some were already restored.
    pub fn set_card_pool(&mut self, pool: CardCounts) {
        info!("Card pool received ({} distinct cards)", pool.len());
        self.card_pool = Some(pool);
        if self.picks.is_none() {
            self.picks = Some(CardCounts::new());
        }
    }

    pub fn is_started(&self) -> bool {
        self.session_details.as_ref().is_some_and(|d| d.started)
    }

    /// Readiness of this player according to the latest snapshot.
    pub fn own_ready(&self) -> bool {
        match (&self.session_details, &self.player_id) {
            (Some(details), Some(player)) => {
                details.players.get(player).is_some_and(|p| p.ready)
            }
            _ => false,
        }
    }

    /// Drop the player registration and the lobby snapshot.
    pub fn clear_registration(&mut self) {
        self.player_id = None;
        self.session_details = None;
    }

    /// Leave the session entirely: registration, pool and picks go too.
    pub fn clear_session(&mut self) {
        self.clear_registration();
        self.session_id = None;
        self.card_pool = None;
        self.picks = None;
    }
}
