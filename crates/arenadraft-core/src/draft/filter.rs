// View filter: color and mana-cost toggles for the pool view.

use crate::card::{Card, Color};

/// Number of individual mana-cost toggles (0..=5); everything above shares
/// the `6+` toggle.
pub const CMC_BUCKETS: usize = 7;

/// Index of the shared `6+` bucket.
pub const CMC_HIGH_BUCKET: usize = CMC_BUCKETS - 1;

/// Which cards the pool view shows. Everything is shown by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFilter {
    /// Per-color toggles, indexed by wheel position.
    pub colors: [bool; 5],
    pub colorless: bool,
    /// Mana-cost toggles: 0, 1, 2, 3, 4, 5, 6+.
    pub cmc: [bool; CMC_BUCKETS],
}

impl Default for ViewFilter {
    fn default() -> Self {
        Self {
            colors: [true; 5],
            colorless: true,
            cmc: [true; CMC_BUCKETS],
        }
    }
}

impl ViewFilter {
    pub fn color_enabled(&self, color: Color) -> bool {
        self.colors[color.wheel_position() as usize]
    }

    pub fn toggle_color(&mut self, color: Color) {
        let idx = color.wheel_position() as usize;
        self.colors[idx] = !self.colors[idx];
    }

    pub fn toggle_colorless(&mut self) {
        self.colorless = !self.colorless;
    }

    /// Toggle the bucket for `cmc`; 6 and above all toggle the `6+` bucket.
    pub fn toggle_cmc(&mut self, cmc: u32) {
        let idx = cmc_bucket(cmc);
        self.cmc[idx] = !self.cmc[idx];
    }

    pub fn cmc_enabled(&self, cmc: u32) -> bool {
        self.cmc[cmc_bucket(cmc)]
    }

    /// A colorless card passes when the colorless toggle is on; a colored card
    /// passes when any one of its colors is on (union).
    pub fn color_passes(&self, card: &Card) -> bool {
        if card.is_colorless() {
            return self.colorless;
        }
        card.color_identity
            .iter()
            .any(|color| self.color_enabled(*color))
    }

    pub fn passes(&self, card: &Card) -> bool {
        self.color_passes(card) && self.cmc_enabled(card.cmc)
    }
}

fn cmc_bucket(cmc: u32) -> usize {
    (cmc as usize).min(CMC_HIGH_BUCKET)
}
