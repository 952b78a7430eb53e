use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use frogger::session::{Action, Phase};
use std::time::Duration;

#[derive(Clone, Debug)]
pub(crate) enum InputEvent {
    Key { key: KeyCode, mods: KeyModifiers },
    Resize(u16, u16),
}

pub(crate) fn collect_input_nonblocking(max_wait: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // tiny timeout keeps the tick loop responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_wait);
    while event::poll(timeout)? {
        match event::read()? {
            Event::Key(k) if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat => {
                out.push(InputEvent::Key {
                    key: k.code,
                    mods: k.modifiers,
                });
                if out.len() >= 32 {
                    break;
                }
            }
            Event::Resize(w, h) => out.push(InputEvent::Resize(w, h)),
            _ => {}
        }
    }
    Ok(out)
}

/// Keys the host handles itself rather than passing to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HostKey {
    CycleTheme,
}

pub(crate) enum Mapped {
    Action(Action),
    Host(HostKey),
}

pub(crate) fn map_key(phase: &Phase, key: KeyCode, mods: KeyModifiers) -> Option<Mapped> {
    if key == KeyCode::Char('c') && mods.contains(KeyModifiers::CONTROL) {
        return Some(Mapped::Action(Action::Quit));
    }

    if matches!(phase, Phase::NameEntry { .. }) {
        let action = match key {
            KeyCode::Enter => Action::Confirm,
            KeyCode::Esc => Action::Cancel,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Char(ch) => Action::TextChar(ch),
            _ => return None,
        };
        return Some(Mapped::Action(action));
    }

    let action = match key {
        KeyCode::Char('q') | KeyCode::Char('Q') => Action::Quit,
        KeyCode::Char('t') | KeyCode::Char('T') => return Some(Mapped::Host(HostKey::CycleTheme)),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Action::MoveDown,
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Action::MoveLeft,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Action::MoveRight,
        KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => Action::TogglePause,
        KeyCode::Enter => Action::Confirm,
        KeyCode::Esc => Action::Cancel,
        _ => return None,
    };
    Some(Mapped::Action(action))
}
