//! Key mapping from terminal events to board commands.

use crate::types::{Command, Direction};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to a command.
///
/// Release events are ignored so terminals that report them do not double
/// every move.
pub fn handle_key_event(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => {
            Some(Command::Move(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => {
            Some(Command::Move(Direction::Right))
        }
        KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => {
            Some(Command::Move(Direction::Down))
        }

        // Rotation
        KeyCode::Up | KeyCode::Char('k' | 'K' | 'w' | 'W' | 'x' | 'X') => {
            Some(Command::Rotate { clockwise: true })
        }
        KeyCode::Char('z' | 'Z' | 'y' | 'Y') => Some(Command::Rotate { clockwise: false }),

        // Actions
        KeyCode::Char(' ') => Some(Command::HardDrop),

        // Restart
        KeyCode::Enter | KeyCode::Char('r' | 'R') => Some(Command::NewGame),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
