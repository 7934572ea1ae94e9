use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Quit,
    TogglePause,
    Calm,
    GammaUp,
    GammaDown,
    SubstepsUp,
    SubstepsDown,
    ToggleParallel,
    /// Terminal column/row of a pointer press, drag or release.
    Press(u16, u16),
    Drag(u16, u16),
    Release,
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<Action>> {
    let mut out = Vec::new();

    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Some(action) = map_event(event::read()?) {
            out.push(action);
            if out.len() >= 64 {
                break;
            }
        }
    }
    Ok(out)
}

pub(crate) fn map_event(ev: Event) -> Option<Action> {
    match ev {
        Event::Key(k) if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat => {
            match k.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
                KeyCode::Char(' ') => Some(Action::TogglePause),
                KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Calm),
                KeyCode::Char(']') => Some(Action::GammaUp),
                KeyCode::Char('[') => Some(Action::GammaDown),
                KeyCode::Char('=') | KeyCode::Char('+') => Some(Action::SubstepsUp),
                KeyCode::Char('-') => Some(Action::SubstepsDown),
                KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::ToggleParallel),
                _ => None,
            }
        }
        Event::Mouse(MouseEvent {
            kind, column, row, ..
        }) => match kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Action::Press(column, row)),
            MouseEventKind::Drag(MouseButton::Left) => Some(Action::Drag(column, row)),
            MouseEventKind::Up(MouseButton::Left) => Some(Action::Release),
            _ => None,
        },
        // Focus loss ends a drag just like the pointer leaving the canvas.
        Event::FocusLost => Some(Action::Release),
        _ => None,
    }
}
