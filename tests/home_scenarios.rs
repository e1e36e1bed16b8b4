//! End-to-end scenarios for the home screen: controller, pager and store
//! wired together the way a host wires them.
//!
//! Each test builds its own collaborators; commands sent to the pager are
//! applied to a `TabPager` and its events fed back into the controller.

use pretty_assertions::assert_eq;
use std::sync::Arc;
use tokio::sync::mpsc;

use feedpager::analytics::{MemorySink, FEED_DISPLAYED};
use feedpager::feed::{FeedDescriptor, PinnedFeedInfo, SelectedFeed};
use feedpager::flags::StaticGates;
use feedpager::home::{HomeDeps, HomeFeedController};
use feedpager::pager::{DisplayReason, PagerCommand, TabPager};
use feedpager::selection::{SelectedFeedStore, WatchSelectedFeedStore};
use feedpager::shell::ShellHandle;
use feedpager::sources::{Preferences, Session};

const GEN_A: &str = "at://did:plc:a/app.bsky.feed.generator/a";
const LIST_B: &str = "at://did:plc:b/app.bsky.graph.list/b";

struct World {
    controller: HomeFeedController,
    pager: TabPager,
    store: WatchSelectedFeedStore,
    sink: Arc<MemorySink>,
    shell: ShellHandle,
    rx: mpsc::UnboundedReceiver<PagerCommand>,
    /// Every command the controller sent, in order.
    sent: Vec<PagerCommand>,
}

impl World {
    fn mount(pinned: &[(&str, &str)], selected: SelectedFeed) -> Self {
        let store = WatchSelectedFeedStore::new(selected);
        let sink = Arc::new(MemorySink::default());
        let shell = ShellHandle::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let deps = HomeDeps {
            store: Arc::new(store.clone()),
            analytics: sink.clone(),
            gates: Arc::new(StaticGates::default()),
            shell: shell.clone(),
            pager: tx,
        };
        let pinned: Vec<PinnedFeedInfo> = pinned
            .iter()
            .map(|(uri, name)| PinnedFeedInfo::new(*uri, *name))
            .collect();
        let controller = HomeFeedController::mount(
            deps,
            Preferences::default(),
            pinned.into(),
            Session { has_session: true },
        );

        let mut world = Self {
            controller,
            pager: TabPager::new(0, 0),
            store,
            sink,
            shell,
            rx,
            sent: Vec::new(),
        };
        world.pump();
        world.sent.clear();
        world
    }

    /// Deliver pending commands to the pager and its events to the controller.
    fn pump(&mut self) {
        while let Ok(command) = self.rx.try_recv() {
            self.sent.push(command.clone());
            for event in self.pager.apply(command) {
                self.controller.handle_pager_event(event);
            }
        }
    }

    fn swipe(&mut self, delta: isize) {
        for event in self.pager.swipe(delta) {
            self.controller.handle_pager_event(event);
        }
        self.pump();
    }

    fn reasons(&self) -> Vec<String> {
        self.sink
            .events()
            .iter()
            .filter(|e| e.name == FEED_DISPLAYED)
            .map(|e| e.payload["reason"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

fn three() -> [(&'static str, &'static str); 3] {
    [("home", "Home"), (GEN_A, "Feed A"), (LIST_B, "List B")]
}

#[test]
fn test_selected_list_resolves_to_its_position() {
    let world = World::mount(&three(), FeedDescriptor::List(LIST_B.into()).into());
    assert_eq!(
        world.controller.feeds().as_slice(),
        &[
            FeedDescriptor::Home,
            FeedDescriptor::FeedGen(GEN_A.into()),
            FeedDescriptor::List(LIST_B.into()),
        ]
    );
    assert_eq!(world.controller.selected_index(), 2);
    assert_eq!(world.pager.page(), 2);
}

#[test]
fn test_missing_selection_falls_back_to_zero() {
    let world = World::mount(&[(GEN_A, "Feed A")], FeedDescriptor::Following.into());
    assert_eq!(world.controller.selected_index(), 0);
    assert_eq!(world.pager.page(), 0);
}

#[test]
fn test_swipe_updates_store_and_reports_once() {
    let mut world = World::mount(&three(), SelectedFeed::Default);

    world.swipe(1);

    assert_eq!(
        world.store.get(),
        SelectedFeed::Feed(FeedDescriptor::FeedGen(GEN_A.into()))
    );
    assert_eq!(world.reasons(), vec!["swipe".to_string()]);
    assert!(!world.controller.sync_pager());
    world.pump();
    assert!(world.sent.is_empty());
    assert_eq!(world.controller.last_reported_index(), 1);
}

#[test]
fn test_external_selection_jumps_pager_once() {
    let mut world = World::mount(&three(), SelectedFeed::Default);
    assert_eq!(world.pager.page(), 0);

    world.store.set(FeedDescriptor::List(LIST_B.into()).into());
    world.controller.sync_pager();
    world.pump();

    assert_eq!(
        world.sent,
        vec![PagerCommand::SetPage {
            index: 2,
            reason: DisplayReason::DesktopSidebarClick
        }]
    );
    assert_eq!(world.pager.page(), 2);
    assert_eq!(world.controller.last_reported_index(), 2);

    // The follow-up check finds nothing to correct.
    assert!(!world.controller.sync_pager());
    world.pump();
    assert_eq!(world.sent.len(), 1);
    assert_eq!(world.reasons(), vec!["desktop-sidebar-click".to_string()]);
}

#[test]
fn test_double_check_issues_at_most_one_jump() {
    let mut world = World::mount(&three(), SelectedFeed::Default);
    world.store.set(FeedDescriptor::FeedGen(GEN_A.into()).into());

    let first = world.controller.sync_pager();
    let second = world.controller.sync_pager();
    world.pump();

    assert!(first);
    assert!(!second);
    assert_eq!(world.sent.len(), 1);
}

#[test]
fn test_focus_reports_current_selection_not_mount_value() {
    let mut world = World::mount(&three(), SelectedFeed::Default);
    world.swipe(1);
    world.swipe(1);

    world.controller.on_focus();
    let events = world.sink.events();
    let last = events.last().unwrap();
    assert_eq!(last.payload["reason"], "focus");
    assert_eq!(last.payload["index"], 2);
    assert_eq!(last.payload["feedType"], "list");
    assert!(world.shell.drawer_swipe_disabled());
}

#[test]
fn test_unpin_selected_feed_remounts_on_first_page() {
    let mut world = World::mount(&three(), FeedDescriptor::List(LIST_B.into()).into());
    assert_eq!(world.pager.page(), 2);

    let pinned: Vec<PinnedFeedInfo> = vec![
        PinnedFeedInfo::new("home", "Home"),
        PinnedFeedInfo::new(GEN_A, "Feed A"),
    ];
    world.controller.set_pinned_feeds(pinned.into());
    world.pump();

    assert_eq!(
        world.sent,
        vec![PagerCommand::Remount {
            initial_page: 0,
            page_count: 2
        }]
    );
    assert_eq!(world.pager.page(), 0);
    assert_eq!(world.controller.selected_feed(), Some(&FeedDescriptor::Home));
}
