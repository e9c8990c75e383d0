use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Command;
use crate::snake::Direction::*;

pub const HELP_LINES: &[&str] = &[
    "Arrow keys or WASD to move",
    "Space or P to start, pause and resume",
    "X to stop, N for a new game",
    "M to toggle sound, Q to quit",
];

pub fn command_for(key: KeyEvent) -> Option<Command> {
    if is_ctrl_c(&key) {
        return Some(Command::Shutdown);
    }

    let command = match key.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Command::Turn(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Command::Turn(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Command::Turn(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Command::Turn(Right),
        KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('p') | KeyCode::Char('P') => Command::StartPause,
        KeyCode::Char('x') | KeyCode::Char('X') => Command::Stop,
        KeyCode::Char('n') | KeyCode::Char('N') => Command::NewGame,
        KeyCode::Char('m') | KeyCode::Char('M') => Command::ToggleMute,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Command::Shutdown,
        _ => return None,
    };

    Some(command)
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
