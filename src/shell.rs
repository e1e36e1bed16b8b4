//! Shell state written by the home screen: chrome visibility, drawer swipe
//! and the soft-reset signal.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Broadcast to whoever shows the current feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEvent {
    /// Scroll the visible feed back to the top and refresh it.
    SoftReset,
}

/// Shared handle to the shell flags. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct ShellHandle {
    minimal_shell_mode: Arc<AtomicBool>,
    drawer_swipe_disabled: Arc<AtomicBool>,
    events: broadcast::Sender<ShellEvent>,
}

impl ShellHandle {
    pub fn new() -> Self {
        let (events, _rx) = broadcast::channel(16);
        Self {
            minimal_shell_mode: Arc::new(AtomicBool::new(false)),
            drawer_swipe_disabled: Arc::new(AtomicBool::new(false)),
            events,
        }
    }

    pub fn set_minimal_shell_mode(&self, minimal: bool) {
        let prev = self.minimal_shell_mode.swap(minimal, Ordering::Relaxed);
        if prev != minimal {
            tracing::trace!(minimal, "Minimal shell mode");
        }
    }

    pub fn minimal_shell_mode(&self) -> bool {
        self.minimal_shell_mode.load(Ordering::Relaxed)
    }

    pub fn set_drawer_swipe_disabled(&self, disabled: bool) {
        let prev = self.drawer_swipe_disabled.swap(disabled, Ordering::Relaxed);
        if prev != disabled {
            tracing::trace!(disabled, "Drawer swipe");
        }
    }

    pub fn drawer_swipe_disabled(&self) -> bool {
        self.drawer_swipe_disabled.load(Ordering::Relaxed)
    }

    pub fn emit_soft_reset(&self) {
        // No receivers is fine: nothing is on screen to reset.
        let _ = self.events.send(ShellEvent::SoftReset);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShellEvent> {
        self.events.subscribe()
    }
}

impl Default for ShellHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_shared_between_clones() {
        let shell = ShellHandle::new();
        let view = shell.clone();
        shell.set_minimal_shell_mode(true);
        shell.set_drawer_swipe_disabled(true);
        assert!(view.minimal_shell_mode());
        assert!(view.drawer_swipe_disabled());
    }

    #[test]
    fn test_soft_reset_reaches_subscriber() {
        let shell = ShellHandle::new();
        let mut rx = shell.subscribe();
        shell.emit_soft_reset();
        assert_eq!(rx.try_recv().unwrap(), ShellEvent::SoftReset);
    }

    #[test]
    fn test_soft_reset_without_subscribers() {
        ShellHandle::new().emit_soft_reset();
    }
}
