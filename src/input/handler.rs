use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

/// What a key means while the board or the game over panel has focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    Restart,
    Submit,
    Quit,
    None,
}

/// What a key means while the player name is being typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    Insert(char),
    Backspace,
    Confirm,
    Cancel,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if is_ctrl_c(&key) {
            return KeyAction::Quit;
        }

        let steer = match key.code {
            KeyCode::Up | KeyCode::Char('w' | 'W') => Some(Direction::Up),
            KeyCode::Down | KeyCode::Char('s' | 'S') => Some(Direction::Down),
            KeyCode::Left | KeyCode::Char('a' | 'A') => Some(Direction::Left),
            KeyCode::Right | KeyCode::Char('d' | 'D') => Some(Direction::Right),
            _ => None,
        };
        if let Some(direction) = steer {
            return KeyAction::Steer(direction);
        }

        match key.code {
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r' | 'R') => KeyAction::Restart,
            KeyCode::Enter => KeyAction::Submit,
            _ => KeyAction::None,
        }
    }

    /// Map a key for the name prompt; letters are text here, not commands
    pub fn handle_edit_key(&self, key: KeyEvent) -> EditAction {
        if is_ctrl_c(&key) {
            return EditAction::Quit;
        }

        match key.code {
            KeyCode::Enter => EditAction::Confirm,
            KeyCode::Esc => EditAction::Cancel,
            KeyCode::Backspace => EditAction::Backspace,
            KeyCode::Char(c) if !c.is_control() => EditAction::Insert(c),
            _ => EditAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}
