//! Paging widget protocol and the tab pager used by the terminal host.
//!
//! The pager is not controlled by the home screen: it keeps its own current
//! page and only reports what happened. The home screen corrects it with
//! [`PagerCommand`]s and learns about user interaction from [`PagerEvent`]s.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the visible feed changed. Reported to analytics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayReason {
    Focus,
    Swipe,
    TabClick,
    DesktopSidebarClick,
}

impl DisplayReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayReason::Focus => "focus",
            DisplayReason::Swipe => "swipe",
            DisplayReason::TabClick => "tab-click",
            DisplayReason::DesktopSidebarClick => "desktop-sidebar-click",
        }
    }
}

impl fmt::Display for DisplayReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageScrollState {
    #[default]
    Idle,
    Dragging,
    Settling,
}

/// Imperative instruction sent to the pager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerCommand {
    /// Jump to `index` without user interaction.
    SetPage { index: usize, reason: DisplayReason },
    /// The page set changed: rebuild with `page_count` pages showing `initial_page`.
    Remount {
        initial_page: usize,
        page_count: usize,
    },
}

/// Notification from the pager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerEvent {
    /// A page is about to become visible.
    PageSelecting { index: usize, reason: DisplayReason },
    /// A page became the current page.
    PageSelected { index: usize },
    ScrollStateChanged(PageScrollState),
}

/// Outcome of pressing a tab in the tab bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabClick {
    /// The tab was already current.
    Reselected,
    Changed(Vec<PagerEvent>),
    Ignored,
}

// ============================================================================
// TabPager
// ============================================================================

/// A horizontally paged container with a tab bar.
///
/// Every mutating call returns the events it produced, in emission order, so
/// the host can forward them to whoever listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabPager {
    page: usize,
    page_count: usize,
    scroll_state: PageScrollState,
}

impl TabPager {
    pub fn new(initial_page: usize, page_count: usize) -> Self {
        Self {
            page: clamp_page(initial_page, page_count),
            page_count,
            scroll_state: PageScrollState::Idle,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn scroll_state(&self) -> PageScrollState {
        self.scroll_state
    }

    /// User drag by `delta` pages. A drag that hits an edge still reports
    /// the drag so listeners can react to the gesture itself.
    pub fn swipe(&mut self, delta: isize) -> Vec<PagerEvent> {
        if self.page_count == 0 {
            return Vec::new();
        }

        let target = self
            .page
            .saturating_add_signed(delta)
            .min(self.page_count - 1);

        let mut events = vec![self.set_scroll_state(PageScrollState::Dragging)];
        if target != self.page {
            events.push(PagerEvent::PageSelecting {
                index: target,
                reason: DisplayReason::Swipe,
            });
            events.push(self.set_scroll_state(PageScrollState::Settling));
            self.page = target;
            events.push(PagerEvent::PageSelected { index: target });
        }
        events.push(self.set_scroll_state(PageScrollState::Idle));
        events
    }

    pub fn click_tab(&mut self, index: usize) -> TabClick {
        if index >= self.page_count {
            return TabClick::Ignored;
        }
        if index == self.page {
            return TabClick::Reselected;
        }
        TabClick::Changed(self.jump(index, DisplayReason::TabClick))
    }

    pub fn apply(&mut self, command: PagerCommand) -> Vec<PagerEvent> {
        match command {
            PagerCommand::SetPage { index, reason } => {
                if index >= self.page_count || index == self.page {
                    return Vec::new();
                }
                self.jump(index, reason)
            }
            PagerCommand::Remount {
                initial_page,
                page_count,
            } => {
                *self = TabPager::new(initial_page, page_count);
                Vec::new()
            }
        }
    }

    fn jump(&mut self, index: usize, reason: DisplayReason) -> Vec<PagerEvent> {
        self.page = index;
        vec![
            PagerEvent::PageSelecting { index, reason },
            PagerEvent::PageSelected { index },
        ]
    }

    fn set_scroll_state(&mut self, state: PageScrollState) -> PagerEvent {
        self.scroll_state = state;
        PagerEvent::ScrollStateChanged(state)
    }
}

fn clamp_page(page: usize, page_count: usize) -> usize {
    page.min(page_count.saturating_sub(1))
}
