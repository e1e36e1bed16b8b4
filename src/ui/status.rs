use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_str())
    } else if !app.home_focused {
        Cow::Borrowed("[Tab]home [q]uit")
    } else {
        let drawer = if app.shell.drawer_swipe_disabled() {
            "drawer:locked"
        } else {
            "drawer:open"
        };
        let chrome = if app.shell.minimal_shell_mode() {
            "chrome:min"
        } else {
            "chrome:full"
        };
        Cow::Owned(format!(
            "[←/→]swipe [1-9]tab [Alt+1-9/[ ]]sidebar [m]inimal [r]eload [Tab]leave [q]uit  {} {}",
            drawer, chrome
        ))
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    f.render_widget(Paragraph::new(text).style(style), area);
}
