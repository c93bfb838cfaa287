use crate::app::App;
use crate::input::InputAction;
use bingo_core::ExtractInterval;

pub fn dispatch(app: &mut App, action: InputAction) {
    match action {
        InputAction::None => {}
        InputAction::Quit => app.should_quit = true,
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::Dismiss => app.show_help = false,
        InputAction::TogglePause => app.toggle_pause(),
        InputAction::SlowInterval => app.set_interval(ExtractInterval::Slow),
        InputAction::FastInterval => app.set_interval(ExtractInterval::Fast),
        InputAction::Claim => app.claim_focused(),
        InputAction::NextTicket => app.cycle_ticket(true),
        InputAction::PrevTicket => app.cycle_ticket(false),
        InputAction::MoreCards => app.change_card_count(1),
        InputAction::FewerCards => app.change_card_count(-1),
        InputAction::Restart => app.restart(),
    }
}
