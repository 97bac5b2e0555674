// Card catalog: the static card metadata document, loaded once at startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::card::{Card, Language};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read card catalog {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse card catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// All known cards keyed by Arena id. Never mutated after `from_json`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cards: HashMap<String, Card>,
}

impl Catalog {
    /// Parse the catalog document (a JSON object keyed by Arena id) and
    /// backfill localized fields for every supported language.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let raw: HashMap<String, Card> = serde_json::from_str(text)?;
        let cards = raw
            .into_iter()
            .map(|(id, mut card)| {
                card.id = id.clone();
                backfill_languages(&mut card);
                (id, card)
            })
            .collect::<HashMap<_, _>>();

        info!("Card catalog loaded with {} cards", cards.len());
        Ok(Self { cards })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Build a catalog from already-normalized cards (keyed by `card.id`).
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let cards = cards
            .into_iter()
            .map(|mut card| {
                backfill_languages(&mut card);
                (card.id.clone(), card)
            })
            .collect();
        Self { cards }
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Fill any missing localized name with the canonical name and any missing
/// localized image with the English image.
fn backfill_languages(card: &mut Card) {
    let english_image = card.image_uris.get(Language::English.code()).cloned();
    for language in Language::ALL {
        let code = language.code();
        if !card.printed_name.contains_key(code) {
            card.printed_name.insert(code.to_string(), card.name.clone());
        }
        if !card.image_uris.contains_key(code) {
            if let Some(uri) = &english_image {
                card.image_uris.insert(code.to_string(), uri.clone());
            }
        }
    }
}
