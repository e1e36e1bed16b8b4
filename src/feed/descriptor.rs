use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Failure to parse a feed identifier string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorParseError {
    #[error("Empty feed identifier")]
    Empty,

    #[error("Feed identifier '{0}' has an empty URI")]
    MissingUri(String),

    #[error("Unknown feed identifier '{0}'")]
    Unknown(String),
}

// ============================================================================
// FeedDescriptor
// ============================================================================

/// Identifier of a navigable feed.
///
/// The string form is `home`, `following`, `feedgen|<uri>` or `list|<uri>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeedDescriptor {
    Home,
    Following,
    FeedGen(String),
    List(String),
}

impl FeedDescriptor {
    /// Tag reported to analytics: the part before the first `|`, or the whole identifier.
    pub fn feed_type(&self) -> &'static str {
        match self {
            FeedDescriptor::Home => "home",
            FeedDescriptor::Following => "following",
            FeedDescriptor::FeedGen(_) => "feedgen",
            FeedDescriptor::List(_) => "list",
        }
    }

    /// The URI carried by generator and list feeds.
    pub fn uri(&self) -> Option<&str> {
        match self {
            FeedDescriptor::FeedGen(uri) | FeedDescriptor::List(uri) => Some(uri),
            FeedDescriptor::Home | FeedDescriptor::Following => None,
        }
    }

    /// Timeline feeds share the home feed parameters (merge settings).
    pub fn is_timeline(&self) -> bool {
        matches!(self, FeedDescriptor::Home | FeedDescriptor::Following)
    }
}

impl fmt::Display for FeedDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedDescriptor::Home => f.write_str("home"),
            FeedDescriptor::Following => f.write_str("following"),
            FeedDescriptor::FeedGen(uri) => write!(f, "feedgen|{}", uri),
            FeedDescriptor::List(uri) => write!(f, "list|{}", uri),
        }
    }
}

impl FromStr for FeedDescriptor {
    type Err = DescriptorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DescriptorParseError::Empty);
        }

        match s.split_once('|') {
            None => match s {
                "home" => Ok(FeedDescriptor::Home),
                "following" => Ok(FeedDescriptor::Following),
                _ => Err(DescriptorParseError::Unknown(s.to_string())),
            },
            Some((tag, uri)) => {
                if uri.is_empty() {
                    return Err(DescriptorParseError::MissingUri(s.to_string()));
                }
                match tag {
                    "feedgen" => Ok(FeedDescriptor::FeedGen(uri.to_string())),
                    "list" => Ok(FeedDescriptor::List(uri.to_string())),
                    _ => Err(DescriptorParseError::Unknown(s.to_string())),
                }
            }
        }
    }
}

// ============================================================================
// SelectedFeed
// ============================================================================

/// The feed the user last chose, as held by the selected-feed store.
///
/// `Default` is the sentinel the store starts with; it never matches a
/// position in a feed list, so it resolves to the left-most page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectedFeed {
    #[default]
    Default,
    Feed(FeedDescriptor),
}

impl SelectedFeed {
    pub fn as_feed(&self) -> Option<&FeedDescriptor> {
        match self {
            SelectedFeed::Default => None,
            SelectedFeed::Feed(feed) => Some(feed),
        }
    }
}

impl From<FeedDescriptor> for SelectedFeed {
    fn from(feed: FeedDescriptor) -> Self {
        SelectedFeed::Feed(feed)
    }
}

impl fmt::Display for SelectedFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectedFeed::Default => f.write_str("(default)"),
            SelectedFeed::Feed(feed) => fmt::Display::fmt(feed, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEN: &str = "at://did:plc:abc/app.bsky.feed.generator/whats-hot";

    #[test]
    fn test_display_forms() {
        assert_eq!(FeedDescriptor::Home.to_string(), "home");
        assert_eq!(FeedDescriptor::Following.to_string(), "following");
        assert_eq!(
            FeedDescriptor::FeedGen(GEN.to_string()).to_string(),
            format!("feedgen|{}", GEN)
        );
        assert_eq!(
            FeedDescriptor::List("at://x/app.bsky.graph.list/1".into()).to_string(),
            "list|at://x/app.bsky.graph.list/1"
        );
    }

    #[test]
    fn test_parse_display_agree() {
        let feed: FeedDescriptor = format!("feedgen|{}", GEN).parse().unwrap();
        assert_eq!(feed, FeedDescriptor::FeedGen(GEN.to_string()));
        assert_eq!(feed.to_string().parse::<FeedDescriptor>().unwrap(), feed);
    }

    #[test]
    fn test_parse_keeps_pipes_inside_uri() {
        let feed: FeedDescriptor = "list|a|b".parse().unwrap();
        assert_eq!(feed, FeedDescriptor::List("a|b".to_string()));
        assert_eq!(feed.feed_type(), "list");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<FeedDescriptor>(), Err(DescriptorParseError::Empty));
        assert!(matches!(
            "feedgen|".parse::<FeedDescriptor>(),
            Err(DescriptorParseError::MissingUri(_))
        ));
        assert!(matches!(
            "timeline".parse::<FeedDescriptor>(),
            Err(DescriptorParseError::Unknown(_))
        ));
        assert!(matches!(
            "author|did:plc:x".parse::<FeedDescriptor>(),
            Err(DescriptorParseError::Unknown(_))
        ));
    }

    #[test]
    fn test_feed_type_tags() {
        assert_eq!(FeedDescriptor::Home.feed_type(), "home");
        assert_eq!(FeedDescriptor::Following.feed_type(), "following");
        assert_eq!(FeedDescriptor::FeedGen(GEN.into()).feed_type(), "feedgen");
    }

    #[test]
    fn test_selected_feed_default_is_sentinel() {
        let selected = SelectedFeed::default();
        assert_eq!(selected, SelectedFeed::Default);
        assert!(selected.as_feed().is_none());
    }
}
