// Collection import from the Arena client log.

use thiserror::Error;

use crate::card::CardCounts;

/// Log line that precedes the inventory dump in the Arena client log.
pub const INVENTORY_MARKER: &str = "PlayerInventory.GetPlayerCardsV3";

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("no collection found in log (marker `{INVENTORY_MARKER}` missing)")]
    MarkerNotFound,

    #[error("no collection object follows the last inventory marker")]
    ObjectNotFound,

    #[error("failed to parse collection: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Extract the owned collection from a client log.
///
/// Takes the last inventory marker, then the first `{` after it and the
/// first `}` after that. The inventory dump is a flat id -> count object,
/// so the first closing brace ends it.
pub fn extract_collection(log: &str) -> Result<CardCounts, CollectionError> {
    let marker_idx = log
        .rfind(INVENTORY_MARKER)
        .ok_or(CollectionError::MarkerNotFound)?;
    let after_marker = &log[marker_idx + INVENTORY_MARKER.len()..];

    let start = after_marker
        .find('{')
        .ok_or(CollectionError::ObjectNotFound)?;
    let end = after_marker[start..]
        .find('}')
        .ok_or(CollectionError::ObjectNotFound)?;

    let object = &after_marker[start..start + end + 1];
    Ok(serde_json::from_str(object)?)
}

/// Total number of owned copies.
pub fn total_copies(counts: &CardCounts) -> u32 {
    counts.values().sum()
}
