// Derived views over the draft state. Pure functions, recomputed on demand.

use std::collections::BTreeMap;

use tracing::warn;

use crate::card::{Card, CardCounts};
use crate::catalog::Catalog;
use crate::protocol::SessionSnapshot;

use super::filter::ViewFilter;
use super::order::CardOrder;

/// A pool card with the number of copies still available to pick.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolEntry {
    pub card: Card,
    pub count: u32,
}

/// One row of the lobby roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyEntry {
    pub player_id: String,
    pub name: String,
    pub ready: bool,
    /// Whether this row is the local player.
    pub is_self: bool,
}

/// Pool entries minus picks, keeping only cards with copies left.
///
/// Ids missing from the catalog are skipped.
pub fn card_pool_unsorted(
    pool: Option<&CardCounts>,
    picks: Option<&CardCounts>,
    catalog: &Catalog,
) -> Vec<PoolEntry> {
    let (Some(pool), Some(picks)) = (pool, picks) else {
        return Vec::new();
    };

    pool.iter()
        .filter_map(|(id, available)| {
            let picked = picks.get(id).copied().unwrap_or(0);
            let count = available.saturating_sub(picked);
            if count == 0 {
                return None;
            }
            match catalog.get(id) {
                Some(card) => Some(PoolEntry {
                    card: card.clone(),
                    count,
                }),
                None => {
                    warn!("Pool card {id} not found in catalog");
                    None
                }
            }
        })
        .collect()
}

pub fn sort_pool(mut entries: Vec<PoolEntry>, order: CardOrder) -> Vec<PoolEntry> {
    entries.sort_by(|l, r| order.compare(&l.card, &r.card));
    entries
}

pub fn filter_pool(entries: Vec<PoolEntry>, filter: &ViewFilter) -> Vec<PoolEntry> {
    entries
        .into_iter()
        .filter(|e| filter.passes(&e.card))
        .collect()
}

/// The pool as shown: unsorted pool, filtered, then sorted.
pub fn card_pool_view(
    pool: Option<&CardCounts>,
    picks: Option<&CardCounts>,
    catalog: &Catalog,
    filter: &ViewFilter,
    order: CardOrder,
) -> Vec<PoolEntry> {
    let entries = card_pool_unsorted(pool, picks, catalog);
    sort_pool(filter_pool(entries, filter), order)
}

/// One entry per picked copy, in id order.
///
/// The placeholder id `"0"` and ids missing from the catalog are skipped.
pub fn deck_unsorted(picks: Option<&CardCounts>, catalog: &Catalog) -> Vec<Card> {
    let Some(picks) = picks else {
        return Vec::new();
    };

    let mut deck = Vec::new();
    for (id, copies) in picks {
        if id == "0" {
            continue;
        }
        let Some(card) = catalog.get(id) else {
            warn!("Picked card {id} not found in catalog");
            continue;
        };
        for _ in 0..*copies {
            deck.push(card.clone());
        }
    }
    deck
}

/// Deck grouped by mana cost, each group sorted by color then name.
pub fn deck_by_cmc(deck: &[Card]) -> BTreeMap<u32, Vec<Card>> {
    let mut groups: BTreeMap<u32, Vec<Card>> = BTreeMap::new();
    for card in deck {
        groups.entry(card.cmc).or_default().push(card.clone());
    }
    for cards in groups.values_mut() {
        cards.sort_by(|l, r| CardOrder::Color.compare(l, r));
    }
    groups
}

/// Lobby roster from the latest snapshot.
pub fn lobby(details: Option<&SessionSnapshot>, own_player: Option<&str>) -> Vec<LobbyEntry> {
    let Some(details) = details else {
        return Vec::new();
    };
    details
        .players
        .iter()
        .map(|(id, player)| LobbyEntry {
            player_id: id.clone(),
            name: player.name.clone(),
            ready: player.ready,
            is_self: own_player == Some(id.as_str()),
        })
        .collect()
}

/// Sum of copies in a count map; zero when absent.
pub fn total(counts: Option<&CardCounts>) -> u32 {
    counts.map(|c| c.values().sum()).unwrap_or(0)
}
