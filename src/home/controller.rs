use std::sync::Arc;
use tokio::sync::mpsc;

use crate::analytics::{self, AnalyticsSink, FeedDisplayed, FEED_DISPLAYED};
use crate::feed::{FeedDescriptor, FeedList, FeedListCache, PinnedFeedInfo, SelectedFeed};
use crate::flags::{FeatureGate, DISABLE_MIN_SHELL_ON_FOREGROUNDING};
use crate::pager::{DisplayReason, PageScrollState, PagerCommand, PagerEvent};
use crate::selection::SelectedFeedStore;
use crate::shell::ShellHandle;
use crate::sources::{Preferences, Session};

use super::layout::{FeedPage, HomeLayout, PageKind};

/// Feed shown to signed-out users.
pub const DISCOVER_FEED_URI: &str =
    "at://did:plc:z72i7hdynmk6r22z27h6tvur/app.bsky.feed.generator/whats-hot";

/// Foreground state of the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Active,
    Inactive,
    Background,
}

/// Collaborators the home screen writes to or reads from.
#[derive(Clone)]
pub struct HomeDeps {
    pub store: Arc<dyn SelectedFeedStore>,
    pub analytics: Arc<dyn AnalyticsSink>,
    pub gates: Arc<dyn FeatureGate>,
    pub shell: ShellHandle,
    pub pager: mpsc::UnboundedSender<PagerCommand>,
}

// ============================================================================
// HomeFeedController
// ============================================================================

/// Keeps the selected feed, the pager and the shell flags consistent for a
/// mounted home screen.
///
/// The pager is not controlled: it reports pages through [`PagerEvent`]s and
/// is only corrected with [`PagerCommand`]s when the selection moved without it
/// (for example a sidebar pick). `last_reported_index` is the page the pager
/// is known to show; it is updated before a jump is sent so the jump is never
/// re-detected as a divergence.
pub struct HomeFeedController {
    deps: HomeDeps,
    preferences: Preferences,
    pinned: Arc<[PinnedFeedInfo]>,
    feeds: FeedListCache,
    signed_out: Option<FeedList>,
    last_reported_index: usize,
    focused: bool,
    listening: bool,
}

impl HomeFeedController {
    /// Mount the home screen. Sends the initial `Remount` so the pager starts
    /// on the selected page.
    pub fn mount(
        deps: HomeDeps,
        preferences: Preferences,
        pinned: Arc<[PinnedFeedInfo]>,
        session: Session,
    ) -> Self {
        let mut feeds = FeedListCache::new();
        feeds.get(&pinned);

        let signed_out = (!session.has_session).then(|| {
            std::iter::once(FeedDescriptor::FeedGen(DISCOVER_FEED_URI.to_string())).collect()
        });

        let mut controller = Self {
            deps,
            preferences,
            pinned,
            feeds,
            signed_out,
            last_reported_index: 0,
            focused: false,
            listening: true,
        };
        controller.remount_pager();
        tracing::info!(
            feeds = controller.feeds().len(),
            selected = controller.selected_index(),
            signed_in = session.has_session,
            "Home screen mounted"
        );
        controller
    }

    // ========================================================================
    // Derived state
    // ========================================================================

    /// Pages the pager shows, in order.
    pub fn feeds(&self) -> &FeedList {
        self.signed_out
            .as_ref()
            .unwrap_or_else(|| self.feeds.current())
    }

    pub fn has_session(&self) -> bool {
        self.signed_out.is_none()
    }

    pub fn selected_index(&self) -> usize {
        self.feeds().selected_index(&self.deps.store.get())
    }

    pub fn selected_feed(&self) -> Option<&FeedDescriptor> {
        self.feeds().get(self.selected_index())
    }

    pub fn last_reported_index(&self) -> usize {
        self.last_reported_index
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Display name of the selected feed, used as the screen title.
    pub fn title(&self) -> Option<&str> {
        if !self.has_session() {
            return Some("Discover");
        }
        let feed = self.selected_feed()?;
        self.pinned
            .iter()
            .find(|info| self.feed_matches(info, feed))
            .map(|info| info.display_name.as_str())
    }

    fn feed_matches(&self, info: &PinnedFeedInfo, feed: &FeedDescriptor) -> bool {
        match feed.uri() {
            Some(uri) => info.uri == uri,
            None => info.uri == feed.to_string(),
        }
    }

    pub fn layout(&self) -> HomeLayout {
        let selected = self.selected_feed();
        let page = |feed: &FeedDescriptor| {
            let kind = if feed.is_timeline() {
                PageKind::Following {
                    params: self.preferences.home_feed_params(),
                }
            } else {
                PageKind::Custom {
                    saved_feed: self
                        .preferences
                        .saved_feed_for(&feed.to_string())
                        .cloned(),
                }
            };
            FeedPage {
                feed: feed.clone(),
                is_focused: selected == Some(feed),
                kind,
            }
        };

        if !self.has_session() {
            let feed = FeedDescriptor::FeedGen(DISCOVER_FEED_URI.to_string());
            return HomeLayout::SignedOut(FeedPage {
                is_focused: true,
                ..page(&feed)
            });
        }
        if self.feeds().is_empty() {
            return HomeLayout::NoFeedsPinned;
        }
        HomeLayout::Feeds(self.feeds().iter().map(page).collect())
    }

    // ========================================================================
    // Source updates
    // ========================================================================

    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.preferences = preferences;
    }

    /// Hand in the pinned feeds. A different sequence rebuilds the list; when
    /// the resulting pages differ the pager is remounted on the selected page.
    pub fn set_pinned_feeds(&mut self, pinned: Arc<[PinnedFeedInfo]>) {
        let old_key = self.feeds().key();
        self.pinned = pinned;
        self.feeds.get(&self.pinned);

        if self.feeds().key() != old_key {
            self.remount_pager();
        } else {
            self.sync_pager();
        }
    }

    fn remount_pager(&mut self) {
        let initial_page = self.selected_index();
        self.last_reported_index = initial_page;
        self.send(PagerCommand::Remount {
            initial_page,
            page_count: self.feeds().len(),
        });
        if self.focused {
            self.deps.shell.set_drawer_swipe_disabled(initial_page > 0);
        }
    }

    // ========================================================================
    // Selection / pager reconciliation
    // ========================================================================

    /// Correct the pager when the selected index moved without it.
    ///
    /// Returns whether a jump was issued. Calling this again without an
    /// intervening change is a no-op.
    pub fn sync_pager(&mut self) -> bool {
        let selected_index = self.selected_index();
        if selected_index == self.last_reported_index {
            return false;
        }

        tracing::debug!(
            from = self.last_reported_index,
            to = selected_index,
            "Pager out of sync with selection, jumping"
        );
        self.last_reported_index = selected_index;
        self.send(PagerCommand::SetPage {
            index: selected_index,
            reason: DisplayReason::DesktopSidebarClick,
        });
        if self.focused {
            self.deps.shell.set_drawer_swipe_disabled(selected_index > 0);
        }
        true
    }

    /// Select a feed from outside the pager (sidebar, deep link).
    pub fn select_external(&mut self, feed: FeedDescriptor) -> bool {
        self.deps.store.set(SelectedFeed::Feed(feed));
        self.sync_pager()
    }

    pub fn handle_pager_event(&mut self, event: PagerEvent) {
        match event {
            PagerEvent::PageSelecting { index, reason } => self.on_page_selecting(index, reason),
            PagerEvent::PageSelected { index } => self.on_page_selected(index),
            PagerEvent::ScrollStateChanged(state) => self.on_page_scroll_state_changed(state),
        }
    }

    /// The pager settled on `index`.
    pub fn on_page_selected(&mut self, index: usize) {
        self.deps.shell.set_minimal_shell_mode(false);
        self.deps.shell.set_drawer_swipe_disabled(index > 0);

        // The discover page is not a user choice; leave the stored one alone.
        if self.has_session() {
            match self.feeds().get(index).cloned() {
                Some(feed) => self.deps.store.set(SelectedFeed::Feed(feed)),
                None => tracing::warn!(index, "Pager selected a page with no feed"),
            }
        }
        self.last_reported_index = index;
    }

    pub fn on_page_selecting(&mut self, index: usize, reason: DisplayReason) {
        if let Some(feed) = self.feeds().get(index) {
            self.emit_displayed(index, feed, reason);
        }
    }

    pub fn on_page_scroll_state_changed(&mut self, state: PageScrollState) {
        if state == PageScrollState::Dragging {
            self.deps.shell.set_minimal_shell_mode(false);
        }
    }

    /// The selected tab was pressed again.
    pub fn on_press_selected(&self) {
        self.deps.shell.emit_soft_reset();
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Screen gained focus. Reports the visible feed once per transition.
    pub fn on_focus(&mut self) {
        if self.focused {
            return;
        }
        self.focused = true;

        let index = self.selected_index();
        self.deps.shell.set_minimal_shell_mode(false);
        self.deps.shell.set_drawer_swipe_disabled(index > 0);

        if let Some(feed) = self.feeds().get(index) {
            self.emit_displayed(index, feed, DisplayReason::Focus);
        }
    }

    pub fn on_blur(&mut self) {
        if !self.focused {
            return;
        }
        self.focused = false;
        self.deps.shell.set_drawer_swipe_disabled(false);
    }

    pub fn on_app_state_changed(&mut self, state: AppState) {
        if !self.listening || state != AppState::Active {
            return;
        }
        if self.deps.gates.gate(DISABLE_MIN_SHELL_ON_FOREGROUNDING) {
            self.deps.shell.set_minimal_shell_mode(false);
        }
    }

    /// Tear down: stop reacting to foreground changes and undo focus effects.
    pub fn unmount(&mut self) {
        self.listening = false;
        self.on_blur();
        tracing::debug!("Home screen unmounted");
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    fn emit_displayed(&self, index: usize, feed: &FeedDescriptor, reason: DisplayReason) {
        let payload = FeedDisplayed::new(index, feed, reason);
        analytics::log_event(self.deps.analytics.as_ref(), FEED_DISPLAYED, &payload);
    }

    fn send(&self, command: PagerCommand) {
        if let Err(e) = self.deps.pager.send(command) {
            tracing::debug!(command = ?e.0, "Pager gone, dropping command");
        }
    }
}
