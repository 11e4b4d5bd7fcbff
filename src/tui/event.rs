//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::KeytimeError;
use crate::tui::app::InputMode;

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// A character that may be a shortcut.
    Shortcut(char),
    /// Pause or resume the active session.
    TogglePause,
    /// End the active session.
    Stop,
    /// Move the day cursor back.
    PreviousDay,
    /// Move the day cursor forward.
    NextDay,
    /// Put the day cursor on today.
    Today,
    /// Move the list selection up.
    SelectUp,
    /// Move the list selection down.
    SelectDown,
    /// Ask to delete the selected session.
    DeleteSelected,
    /// Ask to delete all sessions.
    ClearAll,
    /// Answer a pending question.
    Confirm(bool),
    /// Open or close the settings panel.
    ToggleSettings,
    /// Move to the next form field.
    NextField,
    /// Type into the form.
    Input(char),
    /// Erase in the form.
    Backspace,
    /// Save the form as a shortcut.
    Submit,
    /// Load the selected shortcut into the form.
    EditShortcut,
    /// Delete the selected shortcut.
    DeleteShortcut,
    /// Toggle tenths of a second.
    ToggleMilliseconds,
    /// Toggle the expiry bell.
    ToggleSound,
    /// Switch between dark and light.
    ToggleTheme,
    /// Show key bindings.
    Help,
    /// Close the current overlay.
    Dismiss,
}

/// Wait up to `timeout` for a key press.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn next_key(timeout: Duration) -> Result<Option<KeyEvent>, KeytimeError> {
    if !event::poll(timeout).map_err(|e| KeytimeError::Terminal(format!("Event poll failed: {e}")))? {
        return Ok(None);
    }

    match event::read().map_err(|e| KeytimeError::Terminal(format!("Event read failed: {e}")))? {
        Event::Key(key) if key.kind != KeyEventKind::Release => Ok(Some(key)),
        _ => Ok(None),
    }
}

/// Map a key press to an action for the current input mode.
pub fn map_key(mode: InputMode, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Handle Ctrl+C
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match mode {
        InputMode::Confirm => match key.code {
            KeyCode::Char('y' | 'Y') => Some(Action::Confirm(true)),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::Confirm(false)),
            _ => None,
        },
        InputMode::Overlay => Some(Action::Dismiss),
        InputMode::Settings => function_key(key.code).or_else(|| settings_key(key.code, ctrl)),
        InputMode::Main => function_key(key.code).or_else(|| main_key(key.code, ctrl)),
    }
}

fn function_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::F(1) => Some(Action::Help),
        KeyCode::F(2) => Some(Action::ToggleMilliseconds),
        KeyCode::F(3) => Some(Action::ToggleSound),
        KeyCode::F(4) => Some(Action::ToggleTheme),
        _ => None,
    }
}

fn settings_key(code: KeyCode, ctrl: bool) -> Option<Action> {
    match code {
        KeyCode::Char('e') if ctrl => Some(Action::EditShortcut),
        KeyCode::Char('d') if ctrl => Some(Action::DeleteShortcut),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(Action::Input(c)),
        KeyCode::Tab => Some(Action::NextField),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Up => Some(Action::SelectUp),
        KeyCode::Down => Some(Action::SelectDown),
        KeyCode::Esc | KeyCode::BackTab => Some(Action::ToggleSettings),
        _ => None,
    }
}

fn main_key(code: KeyCode, ctrl: bool) -> Option<Action> {
    match code {
        KeyCode::Char('x') if ctrl => Some(Action::ClearAll),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char(c) => Some(Action::Shortcut(c)),
        KeyCode::Enter => Some(Action::Stop),
        KeyCode::Left => Some(Action::PreviousDay),
        KeyCode::Right => Some(Action::NextDay),
        KeyCode::Home => Some(Action::Today),
        KeyCode::Up => Some(Action::SelectUp),
        KeyCode::Down => Some(Action::SelectDown),
        KeyCode::Delete => Some(Action::DeleteSelected),
        KeyCode::Tab => Some(Action::ToggleSettings),
        KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}
