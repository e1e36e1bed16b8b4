//! Input handling for the TUI.
//!
//! Keys stand in for the gestures a touch host would deliver: arrows swipe
//! the pager, digits press tabs, Alt+digit and `[`/`]` pick from the sidebar.

use crate::app::App;
use crossterm::event::{KeyCode, KeyModifiers};

use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Action::Quit,

        KeyCode::Tab => app.toggle_home_focus(),

        // Pager and sidebar only respond while the home screen is showing.
        _ if !app.home_focused => {}

        KeyCode::Left | KeyCode::Char('h') => app.swipe(-1),
        KeyCode::Right | KeyCode::Char('l') => app.swipe(1),
        KeyCode::Char(c @ '1'..='9') => {
            let index = tab_index(c);
            if modifiers.contains(KeyModifiers::ALT) {
                app.sidebar_select(index);
            } else {
                app.click_tab(index);
            }
        }
        KeyCode::Char('[') => app.sidebar_step(-1),
        KeyCode::Char(']') => app.sidebar_step(1),
        KeyCode::Char('m') => app.toggle_minimal_shell(),
        KeyCode::Char('r') => match app.reload_config() {
            Ok(()) => app.set_status("Config reloaded"),
            Err(e) => {
                tracing::warn!(error = %e, "Config reload failed");
                app.set_status(format!("Reload failed: {}", e));
            }
        },
        _ => {}
    }
    Action::Continue
}

fn tab_index(c: char) -> usize {
    c.to_digit(10).map_or(0, |d| d as usize - 1)
}
