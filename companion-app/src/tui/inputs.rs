use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Back,
    Up,
    Down,
    Enter,
    Answer(usize),
    Restart,
    None,
}

pub fn map_event(ev: Event) -> Action {
    if let Event::Key(KeyEvent { code, kind, .. }) = ev {
        if kind == KeyEventKind::Release {
            return Action::None;
        }
        match code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Esc => Action::Back,
            KeyCode::Up | KeyCode::Char('k') => Action::Up,
            KeyCode::Down | KeyCode::Char('j') => Action::Down,
            KeyCode::Enter | KeyCode::Char('n') => Action::Enter,
            KeyCode::Char(c @ '1'..='9') => Action::Answer(c as usize - '1' as usize),
            KeyCode::Char('r') => Action::Restart,
            _ => Action::None,
        }
    } else {
        Action::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn digits_pick_zero_based_options() {
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('3'), KeyModifiers::NONE));
        assert_eq!(map_event(ev), Action::Answer(2));
        let ev = Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(map_event(ev), Action::Back);
    }
}
