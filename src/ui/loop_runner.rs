//! Main event loop for the TUI.
//!
//! Multiplexes terminal input, selected-feed store changes, shell events and
//! a periodic tick. Each event runs to completion before the next is taken.

use crate::app::App;
use crate::home::AppState;
use crate::selection::SelectedFeedStore;
use crate::shell::ShellEvent;
use anyhow::{Context, Result};
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange, Event, KeyEventKind},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::input::handle_input;
use super::render::render;

/// Result of handling a key press event.
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Runs the TUI application event loop.
///
/// Uses `tokio::select!` to multiplex:
/// - **Terminal input**: keys, plus focus gained/lost as app foreground/background
/// - **Selection store**: any write to the selected feed re-checks the pager
/// - **Shell events**: soft resets from re-pressing the selected tab
/// - **Periodic tick**: 250ms timer for status expiry
///
/// Installs a panic hook that restores terminal state before unwinding.
pub async fn run(app: &mut App) -> Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableFocusChange, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal().context("Failed to set up terminal")?;
    let mut event_stream = crossterm::event::EventStream::new();
    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));
    let mut selection_rx = app.store.subscribe();
    let mut shell_rx = app.shell.subscribe();
    let mut title = String::new();

    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    // The host starts on the home screen.
    app.toggle_home_focus();

    loop {
        if app.needs_redraw {
            sync_title(&mut terminal, app, &mut title)?;
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        app.needs_redraw = true;
                        match handle_input(app, key.code, key.modifiers) {
                            Action::Quit => break,
                            Action::Continue => {}
                        }
                    }
                    Some(Ok(Event::FocusGained)) => app.set_app_state(AppState::Active),
                    Some(Ok(Event::FocusLost)) => app.set_app_state(AppState::Background),
                    Some(Ok(Event::Resize(_, _))) => app.needs_redraw = true,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Terminal event stream error");
                    }
                    None => break,
                }
            }

            changed = selection_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                app.on_selection_changed();
            }

            event = shell_rx.recv() => {
                match event {
                    Ok(ShellEvent::SoftReset) => app.on_soft_reset(),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Shell events lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            _ = tick_interval.tick() => {}
        }
    }

    app.shutdown();
    restore_terminal(terminal)?;
    Ok(())
}

/// Mirror the selected feed's display name into the terminal title.
fn sync_title(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &App,
    current: &mut String,
) -> Result<()> {
    let wanted = match app.controller().and_then(|c| c.title()) {
        Some(name) if !name.is_empty() => format!("{} | feedpager", name),
        _ => "feedpager".to_string(),
    };
    if *current != wanted {
        execute!(terminal.backend_mut(), SetTitle(&wanted))?;
        *current = wanted;
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}
