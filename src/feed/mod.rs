//! Feed identifiers and the pinned-feed list builder.
//!
//! - [`descriptor`] - `FeedDescriptor` and the store's `SelectedFeed` value
//! - [`builder`] - `PinnedFeedInfo` → `FeedList` derivation and its memo
//!
//! # Example
//!
//! ```
//! use feedpager::feed::{build_feed_list, FeedDescriptor, PinnedFeedInfo, SelectedFeed};
//!
//! let pinned = vec![
//!     PinnedFeedInfo::new("following", "Following"),
//!     PinnedFeedInfo::new("at://did:plc:x/app.bsky.graph.list/cats", "Cats"),
//! ];
//! let list = build_feed_list(&pinned);
//! assert_eq!(list.len(), 2);
//! assert_eq!(list.selected_index(&SelectedFeed::Feed(FeedDescriptor::Home)), 0);
//! ```

mod builder;
mod descriptor;

pub use builder::{
    build_feed_list, FeedList, FeedListCache, PinnedFeedInfo, FEED_GENERATOR_MARKER, LIST_MARKER,
};
pub use descriptor::{DescriptorParseError, FeedDescriptor, SelectedFeed};
