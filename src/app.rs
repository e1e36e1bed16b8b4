use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::analytics::{AnalyticsSink, FanoutSink, MemorySink, TracingSink};
use crate::config::Config;
use crate::home::{AppState, HomeDeps, HomeFeedController, HomeScreen};
use crate::pager::{PagerCommand, PagerEvent, TabClick, TabPager};
use crate::selection::WatchSelectedFeedStore;
use crate::shell::ShellHandle;

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Terminal host state: the home screen plus the widgets it drives.
pub struct App {
    pub screen: HomeScreen,
    pub pager: TabPager,
    pub store: WatchSelectedFeedStore,
    pub shell: ShellHandle,
    pub recent_events: Arc<MemorySink>,
    pub config: Config,
    pub config_path: PathBuf,
    /// Whether the home screen is the active screen (vs. the placeholder one).
    pub home_focused: bool,
    pub soft_resets: u64,
    pub status_message: Option<(String, Instant)>,
    pub needs_redraw: bool,
    pager_rx: mpsc::UnboundedReceiver<PagerCommand>,
}

impl App {
    pub fn new(
        config: Config,
        config_path: PathBuf,
        extra_sink: Option<Arc<dyn AnalyticsSink>>,
    ) -> Self {
        let store = WatchSelectedFeedStore::new(config.initial_selection());
        let shell = ShellHandle::new();
        let recent_events = Arc::new(MemorySink::default());
        let (pager_tx, pager_rx) = mpsc::unbounded_channel();

        let mut analytics = FanoutSink::new()
            .with(Arc::new(TracingSink))
            .with(recent_events.clone());
        if let Some(sink) = extra_sink {
            analytics = analytics.with(sink);
        }

        let deps = HomeDeps {
            store: Arc::new(store.clone()),
            analytics: Arc::new(analytics),
            gates: Arc::new(config.gates()),
            shell: shell.clone(),
            pager: pager_tx,
        };

        let mut app = Self {
            screen: HomeScreen::new(deps),
            pager: TabPager::new(0, 0),
            store,
            shell,
            recent_events,
            config,
            config_path,
            home_focused: false,
            soft_resets: 0,
            status_message: None,
            needs_redraw: true,
            pager_rx,
        };
        app.apply_sources();
        app
    }

    pub fn controller(&self) -> Option<&HomeFeedController> {
        self.screen.controller()
    }

    /// Push the current config into the home screen as source values.
    pub fn apply_sources(&mut self) {
        let preferences = self.config.preferences();
        let pinned = self.config.pinned_feeds();
        self.screen
            .update(Some(&preferences), Some(&pinned), self.config.session());
        self.pump_pager();
    }

    pub fn reload_config(&mut self) -> Result<(), crate::config::ConfigError> {
        self.config = Config::load(&self.config_path)?;
        self.apply_sources();
        Ok(())
    }

    /// Deliver queued pager commands and route the events they cause back
    /// into the controller until both sides are quiet.
    pub fn pump_pager(&mut self) {
        while let Ok(command) = self.pager_rx.try_recv() {
            tracing::debug!(?command, "Pager command");
            let events = self.pager.apply(command);
            self.dispatch(events);
        }
    }

    fn dispatch(&mut self, events: Vec<PagerEvent>) {
        for event in events {
            if let Some(controller) = self.screen.controller_mut() {
                controller.handle_pager_event(event);
            }
        }
        self.needs_redraw = true;
    }

    // ========================================================================
    // User actions
    // ========================================================================

    pub fn swipe(&mut self, delta: isize) {
        let events = self.pager.swipe(delta);
        self.dispatch(events);
        self.pump_pager();
    }

    pub fn click_tab(&mut self, index: usize) {
        match self.pager.click_tab(index) {
            TabClick::Reselected => {
                if let Some(controller) = self.screen.controller() {
                    controller.on_press_selected();
                }
            }
            TabClick::Changed(events) => self.dispatch(events),
            TabClick::Ignored => {}
        }
        self.pump_pager();
    }

    /// Pick a feed from the sidebar: the pager learns about it only through
    /// the controller's correction.
    pub fn sidebar_select(&mut self, index: usize) {
        let Some(controller) = self.screen.controller_mut() else {
            return;
        };
        let Some(feed) = controller.feeds().get(index).cloned() else {
            return;
        };
        controller.select_external(feed);
        self.pump_pager();
    }

    pub fn sidebar_step(&mut self, delta: isize) {
        let Some(controller) = self.screen.controller() else {
            return;
        };
        let count = controller.feeds().len();
        if count == 0 {
            return;
        }
        let target = controller
            .selected_index()
            .saturating_add_signed(delta)
            .min(count - 1);
        self.sidebar_select(target);
    }

    /// The selected-feed store changed (from any writer).
    pub fn on_selection_changed(&mut self) {
        if let Some(controller) = self.screen.controller_mut() {
            controller.sync_pager();
        }
        self.pump_pager();
    }

    pub fn toggle_home_focus(&mut self) {
        self.home_focused = !self.home_focused;
        self.screen.set_focused(self.home_focused);
        self.needs_redraw = true;
    }

    pub fn set_app_state(&mut self, state: AppState) {
        if let Some(controller) = self.screen.controller_mut() {
            controller.on_app_state_changed(state);
        }
        self.needs_redraw = true;
    }

    /// Stand-in for scrolling a feed, which hides the chrome.
    pub fn toggle_minimal_shell(&mut self) {
        self.shell
            .set_minimal_shell_mode(!self.shell.minimal_shell_mode());
        self.needs_redraw = true;
    }

    pub fn on_soft_reset(&mut self) {
        self.soft_resets += 1;
        self.set_status("Scrolled to top");
    }

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into().into_owned(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Drop an expired status message. Returns whether one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        match &self.status_message {
            Some((_, at)) if at.elapsed() >= STATUS_TTL => {
                self.status_message = None;
                true
            }
            _ => false,
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(controller) = self.screen.controller_mut() {
            controller.unmount();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedDescriptor, PinnedFeedInfo, SelectedFeed};
    use crate::selection::SelectedFeedStore;
    use pretty_assertions::assert_eq;

    const GEN_A: &str = "at://did:plc:a/app.bsky.feed.generator/a";
    const LIST_B: &str = "at://did:plc:b/app.bsky.graph.list/b";

    fn test_app() -> App {
        let config = Config {
            has_session: true,
            pinned_feeds: vec![
                PinnedFeedInfo::new("home", "Home"),
                PinnedFeedInfo::new(GEN_A, "Feed A"),
                PinnedFeedInfo::new(LIST_B, "List B"),
            ],
            ..Config::default()
        };
        App::new(config, PathBuf::from("/nonexistent/config.toml"), None)
    }

    #[test]
    fn test_mount_builds_pager() {
        let app = test_app();
        assert_eq!(app.pager.page_count(), 3);
        assert_eq!(app.pager.page(), 0);
    }

    #[test]
    fn test_swipe_moves_selection() {
        let mut app = test_app();
        app.swipe(1);
        assert_eq!(app.pager.page(), 1);
        assert_eq!(app.store.get(), SelectedFeed::Feed(FeedDescriptor::FeedGen(GEN_A.into())));
        let last = app.recent_events.last().unwrap();
        assert_eq!(last.payload["reason"], "swipe");
    }

    #[test]
    fn test_sidebar_select_corrects_pager() {
        let mut app = test_app();
        app.sidebar_select(2);
        assert_eq!(app.pager.page(), 2);
        assert_eq!(app.controller().unwrap().last_reported_index(), 2);
        let last = app.recent_events.last().unwrap();
        assert_eq!(last.payload["reason"], "desktop-sidebar-click");

        app.on_selection_changed();
        assert_eq!(app.recent_events.len(), 1);
    }

    #[test]
    fn test_reselect_tab_soft_resets() {
        let mut app = test_app();
        let mut rx = app.shell.subscribe();
        app.click_tab(0);
        assert!(rx.try_recv().is_ok());
        assert!(app.recent_events.is_empty());
    }

    #[test]
    fn test_home_focus_toggle() {
        let mut app = test_app();
        app.swipe(1);
        app.toggle_home_focus();
        assert!(app.shell.drawer_swipe_disabled());
        app.toggle_home_focus();
        assert!(!app.shell.drawer_swipe_disabled());
    }

    #[test]
    fn test_focus_survives_session_remount() {
        let mut app = test_app();
        app.swipe(1);
        app.toggle_home_focus();
        let before = app.recent_events.len();

        app.reload_config().unwrap();

        let controller = app.controller().unwrap();
        assert!(!controller.has_session());
        assert_eq!(app.home_focused, controller.is_focused());
        let last = app.recent_events.last().unwrap();
        assert_eq!(app.recent_events.len(), before + 1);
        assert_eq!(last.payload["reason"], "focus");
        assert_eq!(last.payload["index"], 0);

        app.toggle_home_focus();
        assert!(!app.controller().unwrap().is_focused());
    }

    #[test]
    fn test_missing_config_reload_signs_out() {
        let mut app = test_app();
        app.reload_config().unwrap();
        assert!(!app.controller().unwrap().has_session());
        assert_eq!(app.pager.page_count(), 1);
    }
}
