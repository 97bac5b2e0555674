// Controller crate: the HTTP session client and the event loop that owns the
// draft state.

pub mod app;
pub mod protocol;
pub mod session_client;
