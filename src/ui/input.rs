/// Terminal event → command translation.
///
/// The game is turn-based, so there is no held-key tracking: every key
/// press is one command, read with a blocking `event::read()`.
///
/// ## Key map
///   Arrows / WASD        step (Ctrl ×fast_repeat, Shift ×run_repeat)
///   Ctrl+Z               undo
///   Ctrl+Shift+Z, Ctrl+Y redo
///   N / B                next / previous level
///   Backspace            reset level
///   Esc, Ctrl+C          quit
///   Left click           select / push / teleport

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

use starpusher::config::PlayConfig;
use starpusher::domain::entity::MoveDir;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Step { dir: MoveDir, count: u32 },
    /// Terminal column/row of a left click.
    Click { col: u16, row: u16 },
    Undo,
    Redo,
    NextLevel,
    PrevLevel,
    Reset,
    Quit,
    /// Terminal resized; repaint only.
    Redraw,
}

/// Map one terminal event to a command. Releases and unbound keys map to None.
pub fn translate(event: &Event, play: &PlayConfig) -> Option<Command> {
    match event {
        Event::Key(key) => translate_key(key, play),
        Event::Mouse(m) => match m.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                Some(Command::Click { col: m.column, row: m.row })
            }
            _ => None,
        },
        Event::Resize(..) => Some(Command::Redraw),
        _ => None,
    }
}

/// Is this a key press (not a release or repeat-release)?
pub fn is_key_press(event: &Event) -> bool {
    matches!(event, Event::Key(k) if k.kind != KeyEventKind::Release)
}

fn translate_key(key: &KeyEvent, play: &PlayConfig) -> Option<Command> {
    if key.kind == KeyEventKind::Release { return None; }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    if ctrl {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Quit),
            KeyCode::Char('z') if !shift => Some(Command::Undo),
            KeyCode::Char('Z') | KeyCode::Char('z') => Some(Command::Redo),
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Command::Redo),
            code => step_dir(code).map(|dir| Command::Step { dir, count: play.fast_repeat }),
        };
    }

    match key.code {
        KeyCode::Esc => Some(Command::Quit),
        KeyCode::Backspace => Some(Command::Reset),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Command::NextLevel),
        KeyCode::Char('b') | KeyCode::Char('B') => Some(Command::PrevLevel),
        code => {
            let dir = step_dir(code)?;
            // Shift+letter arrives as an uppercase char; only Shift+arrow runs.
            let count = if shift && is_arrow(code) { play.run_repeat } else { 1 };
            Some(Command::Step { dir, count })
        }
    }
}

fn step_dir(code: KeyCode) -> Option<MoveDir> {
    match code {
        KeyCode::Left  | KeyCode::Char('a') | KeyCode::Char('A') => Some(MoveDir::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(MoveDir::Right),
        KeyCode::Up    | KeyCode::Char('w') | KeyCode::Char('W') => Some(MoveDir::Up),
        KeyCode::Down  | KeyCode::Char('s') | KeyCode::Char('S') => Some(MoveDir::Down),
        _ => None,
    }
}

fn is_arrow(code: KeyCode) -> bool {
    matches!(code, KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down)
}
