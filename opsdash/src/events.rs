//! Events delivered to the dashboard loop, plus key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::actions::{ActionOutcome, Control};
use crate::error::FetchError;
use crate::history::TimeRange;
use crate::types::Snapshot;

/// Results coming back from spawned tasks.
#[derive(Debug)]
pub enum AppEvent {
    Snapshot {
        seq: u64,
        result: Result<Snapshot, FetchError>,
    },
    ActionDone {
        control: Control,
        outcome: ActionOutcome,
    },
    RefreshRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Trigger(Control),
    SetRange(TimeRange),
    DismissNotifications,
}

pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        KeyCode::Char('1') => Some(Command::SetRange(TimeRange::OneMinute)),
        KeyCode::Char('2') => Some(Command::SetRange(TimeRange::FiveMinutes)),
        KeyCode::Char('3') => Some(Command::SetRange(TimeRange::FifteenMinutes)),
        KeyCode::Char('x') => Some(Command::DismissNotifications),
        KeyCode::Char(ch) => Control::ALL
            .into_iter()
            .find(|c| c.key() == ch)
            .map(Command::Trigger),
        _ => None,
    }
}
