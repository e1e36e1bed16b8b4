use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::descriptor::{FeedDescriptor, SelectedFeed};

/// URI fragment identifying a feed generator record.
pub const FEED_GENERATOR_MARKER: &str = "app.bsky.feed.generator";
/// URI fragment identifying a curated list record.
pub const LIST_MARKER: &str = "app.bsky.graph.list";

// ============================================================================
// PinnedFeedInfo
// ============================================================================

/// A saved feed the user keeps in their navigable set, as returned by the
/// pinned-feeds source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedFeedInfo {
    pub uri: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub value: String,
}

impl PinnedFeedInfo {
    pub fn new(uri: impl Into<String>, display_name: impl Into<String>) -> Self {
        let uri = uri.into();
        Self {
            value: uri.clone(),
            uri,
            display_name: display_name.into(),
        }
    }
}

/// Map one pinned URI onto a feed identifier. First matching rule wins.
fn descriptor_for(uri: &str) -> Option<FeedDescriptor> {
    if uri.contains(FEED_GENERATOR_MARKER) {
        Some(FeedDescriptor::FeedGen(uri.to_string()))
    } else if uri.contains(LIST_MARKER) {
        Some(FeedDescriptor::List(uri.to_string()))
    } else if uri == "home" {
        Some(FeedDescriptor::Home)
    } else if uri == "following" {
        Some(FeedDescriptor::Following)
    } else {
        None
    }
}

// ============================================================================
// FeedList
// ============================================================================

/// Ordered feed identifiers derived from the pinned feeds.
///
/// Cheap to clone; never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedList(Arc<[FeedDescriptor]>);

impl FeedList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FeedDescriptor> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeedDescriptor> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[FeedDescriptor] {
        &self.0
    }

    pub fn position(&self, feed: &FeedDescriptor) -> Option<usize> {
        self.0.iter().position(|f| f == feed)
    }

    /// Position of the selected feed, falling back to the left-most page when
    /// the selection is the default sentinel or is no longer pinned.
    pub fn selected_index(&self, selected: &SelectedFeed) -> usize {
        selected
            .as_feed()
            .and_then(|feed| self.position(feed))
            .unwrap_or(0)
    }

    /// Identity of the page set; the pager is rebuilt whenever this changes.
    pub fn key(&self) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromIterator<FeedDescriptor> for FeedList {
    fn from_iter<I: IntoIterator<Item = FeedDescriptor>>(iter: I) -> Self {
        FeedList(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FeedList {
    type Item = &'a FeedDescriptor;
    type IntoIter = std::slice::Iter<'a, FeedDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Derive the feed list from pinned feeds, preserving source order and
/// dropping entries that match none of the known URI shapes.
pub fn build_feed_list(pinned: &[PinnedFeedInfo]) -> FeedList {
    pinned
        .iter()
        .filter_map(|info| descriptor_for(&info.uri))
        .collect()
}

// ============================================================================
// FeedListCache
// ============================================================================

/// Single-entry memo for [`build_feed_list`].
///
/// Keyed on the identity of the source sequence: handing in a different
/// `Arc` recomputes the list even if its contents are equal.
#[derive(Debug, Default)]
pub struct FeedListCache {
    source: Option<Arc<[PinnedFeedInfo]>>,
    list: FeedList,
}

impl FeedListCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, source: &Arc<[PinnedFeedInfo]>) -> &FeedList {
        let hit = self
            .source
            .as_ref()
            .is_some_and(|cached| Arc::ptr_eq(cached, source));

        if !hit {
            self.list = build_feed_list(source);
            self.source = Some(Arc::clone(source));
            tracing::debug!(feeds = self.list.len(), "Rebuilt feed list");
        }

        &self.list
    }

    /// The last list computed, without consulting a source.
    pub fn current(&self) -> &FeedList {
        &self.list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const GEN_A: &str = "at://did:plc:a/app.bsky.feed.generator/a";
    const LIST_B: &str = "at://did:plc:b/app.bsky.graph.list/b";

    fn pinned(uris: &[&str]) -> Vec<PinnedFeedInfo> {
        uris.iter().map(|u| PinnedFeedInfo::new(*u, *u)).collect()
    }

    #[test]
    fn test_build_maps_each_shape() {
        let list = build_feed_list(&pinned(&["home", GEN_A, LIST_B, "following"]));
        assert_eq!(
            list.as_slice(),
            &[
                FeedDescriptor::Home,
                FeedDescriptor::FeedGen(GEN_A.into()),
                FeedDescriptor::List(LIST_B.into()),
                FeedDescriptor::Following,
            ]
        );
    }

    #[test]
    fn test_build_drops_unknown_uris() {
        let list = build_feed_list(&pinned(&[
            "Home",
            "at://did:plc:c/app.bsky.actor.profile/self",
            "following",
        ]));
        assert_eq!(list.as_slice(), &[FeedDescriptor::Following]);
    }

    #[test]
    fn test_generator_marker_wins_over_list_marker() {
        let uri = "at://x/app.bsky.feed.generator/app.bsky.graph.list";
        let list = build_feed_list(&pinned(&[uri]));
        assert_eq!(list.as_slice(), &[FeedDescriptor::FeedGen(uri.into())]);
    }

    #[test]
    fn test_selected_index_found_and_fallback() {
        let list = build_feed_list(&pinned(&["home", GEN_A, LIST_B]));
        let b = SelectedFeed::Feed(FeedDescriptor::List(LIST_B.into()));
        assert_eq!(list.selected_index(&b), 2);
        assert_eq!(
            list.selected_index(&SelectedFeed::Feed(FeedDescriptor::Following)),
            0
        );
        assert_eq!(list.selected_index(&SelectedFeed::Default), 0);
    }

    #[test]
    fn test_selected_index_on_empty_list() {
        let list = FeedList::default();
        assert_eq!(list.selected_index(&SelectedFeed::Feed(FeedDescriptor::Home)), 0);
        assert!(list.get(0).is_none());
    }

    #[test]
    fn test_key_joins_identifiers() {
        let list = build_feed_list(&pinned(&["home", GEN_A]));
        assert_eq!(list.key(), format!("home,feedgen|{}", GEN_A));
        assert_eq!(FeedList::default().key(), "");
    }

    #[test]
    fn test_cache_reuses_same_source() {
        let source: Arc<[PinnedFeedInfo]> = pinned(&["home", GEN_A]).into();
        let mut cache = FeedListCache::new();
        let first = cache.get(&source).clone();
        let second = cache.get(&source).clone();
        assert!(Arc::ptr_eq(&first.0, &second.0));
    }

    #[test]
    fn test_cache_invalidated_on_new_source() {
        let mut cache = FeedListCache::new();
        let a: Arc<[PinnedFeedInfo]> = pinned(&["home"]).into();
        let b: Arc<[PinnedFeedInfo]> = pinned(&["home", LIST_B]).into();

        assert_eq!(cache.get(&a).len(), 1);
        assert_eq!(cache.get(&b).len(), 2);
        assert_eq!(cache.current().len(), 2);
    }
}
