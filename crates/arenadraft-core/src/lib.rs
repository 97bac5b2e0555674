// Library root: card model, draft state, persistence and the realtime
// channel shared by the controller and the terminal UI.

pub mod api;
pub mod card;
pub mod catalog;
pub mod channel;
pub mod collection;
pub mod config;
pub mod draft;
pub mod export;
pub mod protocol;
pub mod store;
