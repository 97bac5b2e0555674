// TUI widget modules for each dashboard panel.

pub mod deck;
pub mod filters;
pub mod help_bar;
pub mod lobby;
pub mod pool;
pub mod prompt;
pub mod quit_confirm;
pub mod session_setup;
pub mod status_bar;
