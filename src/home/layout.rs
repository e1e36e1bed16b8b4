use crate::feed::FeedDescriptor;
use crate::sources::{FeedParams, SavedFeed};

/// What the home screen renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeLayout {
    /// Preferences or pinned feeds are not available yet.
    Loading,
    /// No session: a single discovery page.
    SignedOut(FeedPage),
    /// Signed in with nothing pinned.
    NoFeedsPinned,
    Feeds(Vec<FeedPage>),
}

impl HomeLayout {
    pub fn pages(&self) -> &[FeedPage] {
        match self {
            HomeLayout::Feeds(pages) => pages,
            HomeLayout::SignedOut(page) => std::slice::from_ref(page),
            HomeLayout::Loading | HomeLayout::NoFeedsPinned => &[],
        }
    }
}

/// One pager page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPage {
    pub feed: FeedDescriptor,
    /// The page is the selected one and should load/refresh its content.
    pub is_focused: bool,
    pub kind: PageKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    /// `home`/`following` timeline, optionally merged with saved feeds.
    Following { params: FeedParams },
    /// Generator or list feed and the saved-feed entry it came from, if any.
    Custom { saved_feed: Option<SavedFeed> },
}
