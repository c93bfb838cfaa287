use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    ToggleHelp,
    Dismiss,
    TogglePause,
    SlowInterval,
    FastInterval,
    Claim,
    NextTicket,
    PrevTicket,
    MoreCards,
    FewerCards,
    Restart,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Esc => InputAction::Dismiss,
        KeyCode::Tab | KeyCode::Right => InputAction::NextTicket,
        KeyCode::BackTab | KeyCode::Left => InputAction::PrevTicket,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char('p') | KeyCode::Char(' ') => InputAction::TogglePause,
        KeyCode::Char('s') => InputAction::SlowInterval,
        KeyCode::Char('f') => InputAction::FastInterval,
        KeyCode::Char('b') | KeyCode::Enter => InputAction::Claim,
        KeyCode::Char('+') | KeyCode::Char('=') => InputAction::MoreCards,
        KeyCode::Char('-') => InputAction::FewerCards,
        KeyCode::Char('n') => InputAction::Restart,
        _ => InputAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> InputAction {
        map_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn maps_round_controls() {
        assert_eq!(key(KeyCode::Char('p')), InputAction::TogglePause);
        assert_eq!(key(KeyCode::Char(' ')), InputAction::TogglePause);
        assert_eq!(key(KeyCode::Char('s')), InputAction::SlowInterval);
        assert_eq!(key(KeyCode::Char('f')), InputAction::FastInterval);
        assert_eq!(key(KeyCode::Char('b')), InputAction::Claim);
        assert_eq!(key(KeyCode::Char('n')), InputAction::Restart);
    }

    #[test]
    fn maps_ticket_and_card_keys() {
        assert_eq!(key(KeyCode::Tab), InputAction::NextTicket);
        assert_eq!(key(KeyCode::BackTab), InputAction::PrevTicket);
        assert_eq!(key(KeyCode::Char('+')), InputAction::MoreCards);
        assert_eq!(key(KeyCode::Char('=')), InputAction::MoreCards);
        assert_eq!(key(KeyCode::Char('-')), InputAction::FewerCards);
    }

    #[test]
    fn maps_quit_help_and_unknown() {
        assert_eq!(key(KeyCode::Char('q')), InputAction::Quit);
        assert_eq!(key(KeyCode::Char('?')), InputAction::ToggleHelp);
        assert_eq!(key(KeyCode::Esc), InputAction::Dismiss);
        assert_eq!(key(KeyCode::Char('z')), InputAction::None);
    }
}
