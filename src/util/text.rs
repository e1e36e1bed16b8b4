use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::feed::FeedDescriptor;

/// Display width of a string in terminal columns.
///
/// ```
/// use feedpager::util::display_width;
///
/// assert_eq!(display_width("Home"), 4);
/// assert_eq!(display_width("猫"), 2);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: char = '…';

/// Truncate `s` to at most `max_width` columns, ending in `…` when cut.
///
/// Borrows when the string already fits.
///
/// ```
/// use feedpager::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Following", 20), "Following");
/// assert_eq!(truncate_to_width("Following", 5), "Foll…");
/// assert_eq!(truncate_to_width("Following", 0), "");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::with_capacity(max_width + ELLIPSIS.len_utf8());
    for c in s.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push(ELLIPSIS);
    Cow::Owned(out)
}

/// Fallback tab label for a feed with no display name: the last URI
/// segment (the record key) or the timeline name.
pub fn short_feed_label(feed: &FeedDescriptor) -> &str {
    match feed.uri() {
        Some(uri) => uri.rsplit('/').next().unwrap_or(uri),
        None => feed.feed_type(),
    }
}
