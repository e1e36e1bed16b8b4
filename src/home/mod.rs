//! The home screen: a pager of pinned feeds.
//!
//! [`HomeScreen`] waits for its sources and mounts a [`HomeFeedController`]
//! once preferences and pinned feeds are both loaded. The controller owns the
//! feed list, keeps the selected feed and the pager aligned, reports what is
//! displayed and flips the shell flags.
//!
//! - `controller` - selection/pager synchronization and lifecycle
//! - `layout` - the page description handed to the renderer

mod controller;
mod layout;

pub use controller::{AppState, HomeDeps, HomeFeedController, DISCOVER_FEED_URI};
pub use layout::{FeedPage, HomeLayout, PageKind};

use crate::sources::{PinnedFeeds, Preferences, Session};

/// Loading gate in front of the controller.
pub struct HomeScreen {
    deps: HomeDeps,
    ready: Option<HomeFeedController>,
    focused: bool,
}

impl HomeScreen {
    pub fn new(deps: HomeDeps) -> Self {
        Self {
            deps,
            ready: None,
            focused: false,
        }
    }

    /// Track screen focus. A controller mounted while focused starts focused.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        let Some(controller) = self.ready.as_mut() else {
            return;
        };
        if focused {
            controller.on_focus();
        } else {
            controller.on_blur();
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Feed the latest source values in. Mounts on first readiness, forwards
    /// updates while ready, and unmounts if a source goes back to loading.
    pub fn update(
        &mut self,
        preferences: Option<&Preferences>,
        pinned: Option<&PinnedFeeds>,
        session: Session,
    ) {
        let ready = match (preferences, pinned) {
            (Some(prefs), Some(pinned)) if !pinned.is_loading => Some((prefs, pinned)),
            _ => None,
        };

        let Some((prefs, pinned)) = ready else {
            if let Some(mut controller) = self.ready.take() {
                controller.unmount();
            }
            return;
        };

        if let Some(controller) = self.ready.as_mut() {
            if controller.has_session() == session.has_session {
                controller.set_preferences(prefs.clone());
                controller.set_pinned_feeds(pinned.infos.clone());
                return;
            }
            // Session flips swap the whole page set.
            controller.unmount();
        }

        let mut controller =
            HomeFeedController::mount(self.deps.clone(), prefs.clone(), pinned.infos.clone(), session);
        if self.focused {
            controller.on_focus();
        }
        self.ready = Some(controller);
    }

    pub fn controller(&self) -> Option<&HomeFeedController> {
        self.ready.as_ref()
    }

    pub fn controller_mut(&mut self) -> Option<&mut HomeFeedController> {
        self.ready.as_mut()
    }

    pub fn layout(&self) -> HomeLayout {
        self.ready
            .as_ref()
            .map_or(HomeLayout::Loading, HomeFeedController::layout)
    }
}
