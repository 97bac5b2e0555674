// Wire types for the session service (HTTP bodies and realtime frames).

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::card::{CardCounts, Color};

/// Base path of the session API, relative to the server root.
pub const API_PATH: &str = "api/v1/sessions";

/// Set codes the server can restrict a session to.
pub const KNOWN_SETS: [&str; 7] = ["m19", "xln", "rix", "dom", "grn", "rna", "war"];

// ---------------------------------------------------------------------------
// Session options
// ---------------------------------------------------------------------------

/// Rarities to restrict the shared pool to. All `false` keeps everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityOptions {
    pub common: bool,
    pub uncommon: bool,
    pub rare: bool,
    pub mythic: bool,
}

/// Colors to restrict the shared pool to. All `false` keeps everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorOptions {
    pub white: bool,
    pub blue: bool,
    pub black: bool,
    pub red: bool,
    pub green: bool,
    pub colorless: bool,
}

impl ColorOptions {
    pub fn lookup(&self, color: Color) -> bool {
        match color {
            Color::White => self.white,
            Color::Blue => self.blue,
            Color::Black => self.black,
            Color::Red => self.red,
            Color::Green => self.green,
        }
    }

    pub fn toggle(&mut self, color: Color) {
        let flag = match color {
            Color::White => &mut self.white,
            Color::Blue => &mut self.blue,
            Color::Black => &mut self.black,
            Color::Red => &mut self.red,
            Color::Green => &mut self.green,
        };
        *flag = !*flag;
    }
}

/// Format options chosen when creating a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    pub singleton: bool,
    pub pauper: bool,
    /// Set code restriction; empty means any set.
    pub set: String,
    pub rarity: RarityOptions,
    pub color: ColorOptions,
}

impl SessionOptions {
    /// Step the set restriction through "any set" followed by
    /// [`KNOWN_SETS`]. An unrecognized code restarts from "any set".
    pub fn cycle_set(&mut self, forward: bool) {
        let slots = KNOWN_SETS.len() + 1;
        let current = KNOWN_SETS
            .iter()
            .position(|code| *code == self.set)
            .map_or(0, |i| i + 1);
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
        self.set = match next {
            0 => String::new(),
            i => KNOWN_SETS[i - 1].to_string(),
        };
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest<'a> {
    pub collection: &'a CardCounts,
    #[serde(flatten)]
    pub options: &'a SessionOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterPlayerRequest<'a> {
    pub name: &'a str,
    pub collection: &'a CardCounts,
}

/// Readiness toggle, sent over the realtime channel or the HTTP update call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerUpdate {
    pub ready: bool,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Reply carrying a newly created session or player id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdReply {
    pub id: String,
}

/// One player's lobby entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ready: bool,
}

/// Full session snapshot as returned by `GET /{session}` and broadcast over
/// the realtime channel. Always replaces the previous snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: BTreeMap<String, PlayerSummary>,
    #[serde(default)]
    pub started: bool,
    #[serde(flatten)]
    pub options: SessionOptions,
}

/// The service serializes an empty player map as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("{0}")]
    Server(String),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Decode a response body that is either `{"error": "..."}` or a `T`.
///
/// The error object wins regardless of HTTP status; the service reports
/// logical failures with both 2xx and 4xx codes.
pub fn decode_reply<T: DeserializeOwned>(body: &str) -> Result<T, ReplyError> {
    let value: Value = serde_json::from_str(body)?;
    if let Some(message) = server_error(&value) {
        return Err(ReplyError::Server(message));
    }
    Ok(serde_json::from_value(value)?)
}

fn server_error(value: &Value) -> Option<String> {
    value
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Realtime frames
// ---------------------------------------------------------------------------

/// A decoded inbound realtime frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// `{"error": "..."}`
    Error(String),
    /// Registration acknowledgment `{"id": "..."}` (socket registration only).
    Registered(String),
    /// Lobby snapshot.
    Snapshot(SessionSnapshot),
}

/// Decode an inbound frame. `awaiting_ack` is true only for the first frame
/// after registering over the socket; every other frame is a snapshot.
pub fn parse_frame(text: &str, awaiting_ack: bool) -> Result<Frame, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    if let Some(message) = server_error(&value) {
        return Ok(Frame::Error(message));
    }
    if awaiting_ack {
        let reply: IdReply = serde_json::from_value(value)?;
        return Ok(Frame::Registered(reply.id));
    }
    Ok(Frame::Snapshot(serde_json::from_value(value)?))
}
