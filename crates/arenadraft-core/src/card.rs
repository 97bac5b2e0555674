// Card metadata, colors and display languages.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Arena card identifier (numeric in the client, but always carried as a
/// string key on the wire and in the catalog).
pub type CardId = String;

/// Card identifier -> quantity. Used for the owned collection, the session
/// card pool and the picks.
pub type CardCounts = BTreeMap<CardId, u32>;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// One of the five color symbols of a card's color identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "U")]
    Blue,
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "G")]
    Green,
}

impl Color {
    /// All colors in wheel order.
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    /// Position on the color wheel: W < U < B < R < G.
    pub fn wheel_position(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Blue => 1,
            Color::Black => 2,
            Color::Red => 3,
            Color::Green => 4,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Display languages the catalog may carry localized names and images for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
    German,
    Italian,
    Portuguese,
    Japanese,
    Korean,
    Russian,
    SimplifiedChinese,
    TraditionalChinese,
}

impl Language {
    pub const ALL: [Language; 11] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Italian,
        Language::Portuguese,
        Language::Japanese,
        Language::Korean,
        Language::Russian,
        Language::SimplifiedChinese,
        Language::TraditionalChinese,
    ];

    /// Catalog key for this language.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::Italian => "it",
            Language::Portuguese => "pt",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::Russian => "ru",
            Language::SimplifiedChinese => "zhs",
            Language::TraditionalChinese => "zht",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::Portuguese => "Portuguese",
            Language::Japanese => "Japanese",
            Language::Korean => "Korean",
            Language::Russian => "Russian",
            Language::SimplifiedChinese => "Simplified Chinese",
            Language::TraditionalChinese => "Traditional Chinese",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Language::ALL.into_iter().find(|l| l.code() == code)
    }

    /// The next language in display order, wrapping around.
    pub fn next(self) -> Self {
        let idx = Language::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Language::ALL[(idx + 1) % Language::ALL.len()]
    }
}

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

/// Immutable metadata for one Arena card.
///
/// The `id` is not part of the catalog entry itself; the catalog is keyed by
/// it and fills it in after parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub id: CardId,
    pub name: String,
    #[serde(default)]
    pub printed_name: BTreeMap<String, String>,
    #[serde(default)]
    pub image_uris: BTreeMap<String, String>,
    pub set: String,
    #[serde(deserialize_with = "deserialize_cmc")]
    pub cmc: u32,
    pub collector_number: String,
    #[serde(default, deserialize_with = "deserialize_colors")]
    pub color_identity: Vec<Color>,
    #[serde(default)]
    pub rarity: Option<String>,
}

impl Card {
    /// Localized name, falling back to the canonical name.
    pub fn display_name(&self, language: Language) -> &str {
        self.printed_name
            .get(language.code())
            .map(String::as_str)
            .unwrap_or(&self.name)
    }

    pub fn is_colorless(&self) -> bool {
        self.color_identity.is_empty()
    }

    /// Compact color string, e.g. "WU", or "C" for colorless.
    pub fn color_string(&self) -> String {
        if self.is_colorless() {
            return "C".to_string();
        }
        self.color_identity.iter().map(|c| c.symbol()).collect()
    }
}

/// Mana cost arrives as a float in the card data (`3.0`); some dumps use
/// plain integers.
fn deserialize_cmc<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_sign_negative() || !value.is_finite() {
        return Err(serde::de::Error::custom(format!("invalid cmc {value}")));
    }
    Ok(value as u32)
}

/// `null` and a missing field both mean colorless.
fn deserialize_colors<'de, D>(deserializer: D) -> Result<Vec<Color>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Color>>::deserialize(deserializer)?.unwrap_or_default())
}
