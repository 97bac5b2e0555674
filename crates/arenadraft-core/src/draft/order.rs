// Pool ordering: color-wheel comparator and the two sort keys.

use std::cmp::Ordering;

use crate::card::{Card, Color};

/// How the pool view is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardOrder {
    /// Color group, then mana cost, then name.
    #[default]
    Color,
    /// Mana cost, then color group, then name.
    Cmc,
}

impl CardOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "color" => Some(CardOrder::Color),
            "cmc" => Some(CardOrder::Cmc),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            CardOrder::Color => CardOrder::Cmc,
            CardOrder::Cmc => CardOrder::Color,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CardOrder::Color => "Color",
            CardOrder::Cmc => "CMC",
        }
    }

    pub fn compare(self, lhs: &Card, rhs: &Card) -> Ordering {
        let by_color = || order_color(&lhs.color_identity, &rhs.color_identity);
        let by_cmc = || lhs.cmc.cmp(&rhs.cmc);
        match self {
            CardOrder::Color => by_color().then_with(by_cmc),
            CardOrder::Cmc => by_cmc().then_with(by_color),
        }
        .then_with(|| lhs.name.cmp(&rhs.name))
        .then_with(|| lhs.id.cmp(&rhs.id))
    }
}

/// Compare two color identities.
///
/// - single vs single: color wheel position (W < U < B < R < G)
/// - single vs anything else: the single-color side sorts first
/// - neither single: lexicographic over the color symbols, so colorless
///   (empty) sorts before every multi-color identity
pub fn order_color(lhs: &[Color], rhs: &[Color]) -> Ordering {
    match (lhs, rhs) {
        ([l], [r]) => l.wheel_position().cmp(&r.wheel_position()),
        ([_], _) => Ordering::Less,
        (_, [_]) => Ordering::Greater,
        _ => {
            let l = lhs.iter().map(|c| c.symbol());
            let r = rhs.iter().map(|c| c.symbol());
            l.cmp(r)
        }
    }
}
