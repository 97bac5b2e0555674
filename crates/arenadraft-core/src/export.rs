// Deck export in the Arena import text format.

use std::fmt::Write;

use crate::card::{Card, Language};

/// Split cards carry both halves in their name; Arena wants the front only.
const SPLIT_MARKER: &str = "//";

/// Format `cards` as Arena import lines, one line per copy:
/// `1 <name> (<SET>) <collector number>`.
pub fn export_deck(cards: &[Card], language: Language) -> String {
    let mut out = String::new();
    for card in cards {
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "1 {} ({}) {}",
            export_name(card, language),
            export_set(&card.set),
            card.collector_number
        );
    }
    out
}

fn export_name(card: &Card, language: Language) -> &str {
    let name = card.display_name(language);
    match name.find(SPLIT_MARKER) {
        Some(idx) => name[..idx].trim_end(),
        None => name,
    }
}

/// Arena knows Dominaria as `DAR`, not `DOM`.
fn export_set(set: &str) -> String {
    let set = set.to_uppercase();
    if set == "DOM" {
        "DAR".to_string()
    } else {
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str, set: &str, number: &str) -> Card {
        Card {
            id: number.into(),
            name: name.into(),
            printed_name: Default::default(),
            image_uris: Default::default(),
            set: set.into(),
            cmc: 2,
            collector_number: number.into(),
            color_identity: vec![],
            rarity: None,
        }
    }

    #[test]
    fn split_card_in_dominaria() {
        let out = export_deck(&[card("Fire // Ice", "dom", "147")], Language::English);
        assert_eq!(out, "1 Fire (DAR) 147\n");
    }

    #[test]
    fn one_line_per_copy() {
        let shock = card("Shock", "m19", "156");
        let out = export_deck(&[shock.clone(), shock], Language::English);
        assert_eq!(out, "1 Shock (M19) 156\n1 Shock (M19) 156\n");
    }

    #[test]
    fn uses_localized_name() {
        let mut opt = card("Opt", "xln", "65");
        opt.printed_name.insert("de".into(), "Abwägen".into());
        assert_eq!(export_deck(&[opt.clone()], Language::German), "1 Abwägen (XLN) 65\n");
        // No French name: falls back to the canonical one.
        assert_eq!(export_deck(&[opt], Language::French), "1 Opt (XLN) 65\n");
    }

    #[test]
    fn empty_deck_is_empty_text() {
        assert_eq!(export_deck(&[], Language::English), "");
    }
}
