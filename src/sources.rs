//! Read-only data the home screen consumes: preferences, pinned feeds and session.
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::feed::PinnedFeedInfo;

/// A feed saved in the user's preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedFeed {
    /// URI (or `home`/`following`) the saved entry refers to.
    pub value: String,
    #[serde(default)]
    pub pinned: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub saved_feeds: Vec<SavedFeed>,
    pub merge_feed_enabled: bool,
}

impl Preferences {
    /// Parameters shared by the timeline pages.
    pub fn home_feed_params(&self) -> FeedParams {
        FeedParams {
            merge_feed_enabled: self.merge_feed_enabled,
            merge_feed_sources: if self.merge_feed_enabled {
                self.saved_feeds.iter().map(|f| f.value.clone()).collect()
            } else {
                Vec::new()
            },
        }
    }

    /// First saved feed whose value occurs in `feed_id`.
    pub fn saved_feed_for(&self, feed_id: &str) -> Option<&SavedFeed> {
        self.saved_feeds
            .iter()
            .find(|f| feed_id.contains(f.value.as_str()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedParams {
    pub merge_feed_enabled: bool,
    pub merge_feed_sources: Vec<String>,
}

/// Pinned feeds as delivered by their source.
///
/// The sequence is shared: handing the controller a new `Arc` is what marks
/// the list as changed.
#[derive(Debug, Clone)]
pub struct PinnedFeeds {
    pub infos: Arc<[PinnedFeedInfo]>,
    pub is_loading: bool,
}

impl PinnedFeeds {
    pub fn loaded(infos: Vec<PinnedFeedInfo>) -> Self {
        Self {
            infos: infos.into(),
            is_loading: false,
        }
    }

    pub fn loading() -> Self {
        Self {
            infos: Vec::new().into(),
            is_loading: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    pub has_session: bool,
}
