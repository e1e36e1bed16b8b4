//! Process-wide selected-feed store.
//!
//! The controller never owns the selection; it is handed a store so the value
//! outlives any one home screen (remounts read back what the user last chose).
use tokio::sync::watch;

use crate::feed::SelectedFeed;

/// Get/set/subscribe access to the selected feed.
pub trait SelectedFeedStore: Send + Sync {
    fn get(&self) -> SelectedFeed;

    fn set(&self, feed: SelectedFeed);

    /// Receiver that observes every subsequent `set`.
    fn subscribe(&self) -> watch::Receiver<SelectedFeed>;
}

/// Store backed by a `tokio::sync::watch` channel.
///
/// Clones share the same value. Setting a value equal to the current one does
/// not wake subscribers.
#[derive(Debug, Clone)]
pub struct WatchSelectedFeedStore {
    tx: watch::Sender<SelectedFeed>,
}

impl WatchSelectedFeedStore {
    pub fn new(initial: SelectedFeed) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }
}

impl Default for WatchSelectedFeedStore {
    fn default() -> Self {
        Self::new(SelectedFeed::Default)
    }
}

impl SelectedFeedStore for WatchSelectedFeedStore {
    fn get(&self) -> SelectedFeed {
        self.tx.borrow().clone()
    }

    fn set(&self, feed: SelectedFeed) {
        self.tx.send_if_modified(|current| {
            if *current == feed {
                return false;
            }
            tracing::debug!(from = %current, to = %feed, "Selected feed changed");
            *current = feed;
            true
        });
    }

    fn subscribe(&self) -> watch::Receiver<SelectedFeed> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedDescriptor;

    #[test]
    fn test_default_is_sentinel() {
        let store = WatchSelectedFeedStore::default();
        assert_eq!(store.get(), SelectedFeed::Default);
    }

    #[test]
    fn test_clones_share_value() {
        let store = WatchSelectedFeedStore::default();
        let other = store.clone();
        store.set(FeedDescriptor::Following.into());
        assert_eq!(other.get(), SelectedFeed::Feed(FeedDescriptor::Following));
    }

    #[tokio::test]
    async fn test_subscriber_sees_change() {
        let store = WatchSelectedFeedStore::default();
        let mut rx = store.subscribe();

        store.set(FeedDescriptor::Home.into());
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), SelectedFeed::Feed(FeedDescriptor::Home));
    }

    #[test]
    fn test_same_value_does_not_notify() {
        let store = WatchSelectedFeedStore::new(FeedDescriptor::Home.into());
        let rx = store.subscribe();

        store.set(FeedDescriptor::Home.into());
        assert!(!rx.has_changed().unwrap());
    }
}
