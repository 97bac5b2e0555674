// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the
// controller, or into local ViewState mutations (tabs, selection, filter
// toggles, sort order, prompt editing, new-session options).

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use arenadraft_app::protocol::UserCommand;
use arenadraft_core::card::Color;
use arenadraft_core::protocol::SessionOptions;

use super::{Prompt, PromptKind, TabId, ViewState};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press goes to the controller,
/// `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows reports Press and Release for each keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.prompt.is_some() {
        return handle_prompt(key_event, view_state);
    }

    if view_state.session_setup.is_some() {
        return handle_session_setup(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Char('1') => switch_tab(view_state, TabId::Lobby),
        KeyCode::Char('2') => switch_tab(view_state, TabId::Pool),
        KeyCode::Char('3') => switch_tab(view_state, TabId::Deck),

        KeyCode::Up | KeyCode::Char('k') => {
            move_selection(view_state, -1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_selection(view_state, 1);
            None
        }

        KeyCode::Enter => activate_selection(view_state),

        // Color toggles
        KeyCode::Char(c @ ('w' | 'u' | 'b' | 'r' | 'g')) => {
            if let Some(color) = Color::from_symbol(c) {
                view_state.filter.toggle_color(color);
                view_state.clamp_selection();
            }
            None
        }
        KeyCode::Char('c') => {
            view_state.filter.toggle_colorless();
            view_state.clamp_selection();
            None
        }
        // Mana cost toggles; 6 stands for 6+
        KeyCode::Char(c @ '0'..='6') => {
            let cmc = c.to_digit(10).unwrap_or(0);
            view_state.filter.toggle_cmc(cmc);
            view_state.clamp_selection();
            None
        }

        KeyCode::Char('o') => {
            view_state.toggle_order();
            None
        }
        KeyCode::Char('l') => Some(UserCommand::SetLanguage(view_state.snapshot.language.next())),

        KeyCode::Char('s') => open_prompt(view_state, PromptKind::Session),
        KeyCode::Char('n') => open_prompt(view_state, PromptKind::Register),
        KeyCode::Char('i') => open_prompt(view_state, PromptKind::LogPath),

        KeyCode::Char('N') => {
            view_state.session_setup = Some(SessionOptions::default());
            None
        }
        KeyCode::Char('y') => Some(UserCommand::ToggleReady),
        KeyCode::Char('x') => Some(UserCommand::ClearSession),
        KeyCode::Char('X') => Some(UserCommand::ClearRegistration),
        KeyCode::Char('e') => Some(UserCommand::Export),

        KeyCode::Esc => {
            view_state.alert = None;
            None
        }

        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// `y`/`q` confirm, `n`/Esc cancel, everything else is swallowed.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

fn handle_prompt(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.prompt = None;
            None
        }
        KeyCode::Enter => view_state.prompt.take().and_then(submit_prompt),
        KeyCode::Backspace => {
            if let Some(prompt) = view_state.prompt.as_mut() {
                prompt.text.pop();
            }
            None
        }
        KeyCode::Char(c) => {
            if let Some(prompt) = view_state.prompt.as_mut() {
                prompt.text.push(c);
            }
            None
        }
        _ => None,
    }
}

/// Keys of the create-session overlay. Enter sends the options, Esc drops
/// them; unbound keys are swallowed.
fn handle_session_setup(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Enter => return view_state.session_setup.take().map(UserCommand::CreateSession),
        KeyCode::Esc => {
            view_state.session_setup = None;
            return None;
        }
        _ => {}
    }
    let options = view_state.session_setup.as_mut()?;
    match key_event.code {
        KeyCode::Char('s') => options.singleton = !options.singleton,
        KeyCode::Char('p') => options.pauper = !options.pauper,
        KeyCode::Right | KeyCode::Tab => options.cycle_set(true),
        KeyCode::Left | KeyCode::BackTab => options.cycle_set(false),
        KeyCode::Char(c @ ('w' | 'u' | 'b' | 'r' | 'g')) => {
            if let Some(color) = Color::from_symbol(c) {
                options.color.toggle(color);
            }
        }
        KeyCode::Char('c') => options.color.colorless = !options.color.colorless,
        KeyCode::Char('1') => options.rarity.common = !options.rarity.common,
        KeyCode::Char('2') => options.rarity.uncommon = !options.rarity.uncommon,
        KeyCode::Char('3') => options.rarity.rare = !options.rarity.rare,
        KeyCode::Char('4') => options.rarity.mythic = !options.rarity.mythic,
        _ => {}
    }
    None
}

fn submit_prompt(prompt: Prompt) -> Option<UserCommand> {
    let text = prompt.text.trim().to_string();
    match prompt.kind {
        // An empty session id leaves the current session.
        PromptKind::Session => Some(UserCommand::SetSession(text)),
        PromptKind::Register => Some(UserCommand::Register(text)),
        PromptKind::LogPath if text.is_empty() => None,
        PromptKind::LogPath => Some(UserCommand::ImportLog(PathBuf::from(text))),
    }
}

fn open_prompt(view_state: &mut ViewState, kind: PromptKind) -> Option<UserCommand> {
    view_state.prompt = Some(Prompt {
        kind,
        text: String::new(),
    });
    None
}

fn switch_tab(view_state: &mut ViewState, tab: TabId) -> Option<UserCommand> {
    view_state.active_tab = tab;
    None
}

fn move_selection(view_state: &mut ViewState, delta: isize) {
    let len = match view_state.active_tab {
        TabId::Lobby => view_state.lobby_rows().len(),
        TabId::Pool => view_state.pool_rows().len(),
        TabId::Deck => view_state.deck_rows().len(),
    };
    let selected = match view_state.active_tab {
        TabId::Lobby => &mut view_state.lobby_scroll,
        TabId::Pool => &mut view_state.pool_selected,
        TabId::Deck => &mut view_state.deck_selected,
    };
    if len == 0 {
        *selected = 0;
        return;
    }
    *selected = selected.saturating_add_signed(delta).min(len - 1);
}

/// Enter picks the selected pool card or unpicks the selected deck card.
fn activate_selection(view_state: &ViewState) -> Option<UserCommand> {
    match view_state.active_tab {
        TabId::Lobby => None,
        TabId::Pool => view_state
            .pool_rows()
            .into_iter()
            .nth(view_state.pool_selected)
            .map(|entry| UserCommand::Pick(entry.card.id)),
        TabId::Deck => view_state
            .deck_rows()
            .into_iter()
            .nth(view_state.deck_selected)
            .map(|card| UserCommand::Unpick(card.id)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
