//! Render functions for the TUI.
//!
//! Layout: header and tab bar (hidden in minimal shell mode), the current
//! page, the recent analytics panel and the status bar.

use crate::app::App;
use crate::feed::FeedDescriptor;
use crate::home::{FeedPage, HomeLayout, PageKind};
use crate::util::{short_feed_label, truncate_to_width};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use super::status;

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Widest a tab label may get before it is truncated.
const MAX_TAB_WIDTH: usize = 18;

/// Rows reserved for the analytics panel.
const EVENTS_HEIGHT: u16 = 7;

pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    if !app.home_focused {
        render_elsewhere(f, app, area);
        return;
    }

    let chrome = if app.shell.minimal_shell_mode() { 0 } else { 3 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(chrome),
            Constraint::Min(0),
            Constraint::Length(EVENTS_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);

    let layout = app.screen.layout();
    if chrome > 0 {
        render_tab_bar(f, app, &layout, chunks[0]);
    }
    render_page(f, app, &layout, chunks[1]);
    render_events(f, app, chunks[2]);
    status::render(f, app, chunks[3]);
}

fn render_tab_bar(f: &mut Frame, app: &App, layout: &HomeLayout, area: Rect) {
    let title = app
        .controller()
        .and_then(|c| c.title())
        .filter(|t| !t.is_empty())
        .unwrap_or("Home");

    let labels: Vec<Line> = layout
        .pages()
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let name = tab_label(app, i, &page.feed);
            Line::from(format!("{} {}", i + 1, truncate_to_width(name, MAX_TAB_WIDTH)))
        })
        .collect();

    let tabs = Tabs::new(labels)
        .select(app.pager.page())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    format!(" {} ", title),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider("|");
    f.render_widget(tabs, area);
}

/// Pinned display name for the tab, falling back to the URI's record key.
fn tab_label<'a>(app: &'a App, index: usize, feed: &'a FeedDescriptor) -> &'a str {
    let pinned = app.config.pinned_feeds.iter().find(|info| match feed.uri() {
        Some(uri) => info.uri == uri,
        None => info.uri == feed.feed_type(),
    });
    match pinned {
        Some(info) if !info.display_name.is_empty() => info.display_name.as_str(),
        _ if index == 0 && !app.config.has_session => "Discover",
        _ => short_feed_label(feed),
    }
}

fn render_page(f: &mut Frame, app: &App, layout: &HomeLayout, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    let lines: Vec<Line> = match layout {
        HomeLayout::Loading => vec![Line::from("Loading…")],
        HomeLayout::NoFeedsPinned => vec![
            Line::from(Span::styled(
                "No feeds pinned",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Add [[pinned_feeds]] entries to the config and press r."),
        ],
        HomeLayout::SignedOut(page) => {
            let mut lines = vec![
                Line::from("Signed out: showing the discovery feed."),
                Line::from(""),
            ];
            lines.extend(page_lines(app, page));
            lines
        }
        HomeLayout::Feeds(pages) => match pages.get(app.pager.page()) {
            Some(page) => page_lines(app, page),
            None => vec![Line::from("Page out of range")],
        },
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn page_lines<'a>(app: &App, page: &'a FeedPage) -> Vec<Line<'a>> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("feed      ", dim),
            Span::raw(page.feed.to_string()),
        ]),
        Line::from(vec![
            Span::styled("type      ", dim),
            Span::raw(page.feed.feed_type()),
        ]),
        Line::from(vec![
            Span::styled("focused   ", dim),
            Span::raw(if page.is_focused { "yes" } else { "no" }),
        ]),
    ];

    match &page.kind {
        PageKind::Following { params } => {
            lines.push(Line::from(vec![
                Span::styled("merge     ", dim),
                Span::raw(if params.merge_feed_enabled { "on" } else { "off" }),
            ]));
            for source in &params.merge_feed_sources {
                lines.push(Line::from(vec![
                    Span::styled("  source  ", dim),
                    Span::raw(source.as_str()),
                ]));
            }
        }
        PageKind::Custom { saved_feed } => {
            let saved = match saved_feed {
                Some(f) if f.pinned => "saved, pinned",
                Some(_) => "saved",
                None => "not saved",
            };
            lines.push(Line::from(vec![
                Span::styled("saved     ", dim),
                Span::raw(saved),
            ]));
        }
    }

    if app.soft_resets > 0 {
        lines.push(Line::from(vec![
            Span::styled("resets    ", dim),
            Span::raw(app.soft_resets.to_string()),
        ]));
    }
    lines
}

fn render_events(f: &mut Frame, app: &App, area: Rect) {
    let capacity = area.height.saturating_sub(2) as usize;
    let events = app.recent_events.events();
    let lines: Vec<Line> = events
        .iter()
        .rev()
        .take(capacity)
        .map(|event| {
            let p = &event.payload;
            Line::from(format!(
                "{}  #{} {} ({})",
                event.name,
                p["index"],
                p["feedUrl"].as_str().unwrap_or("?"),
                p["reason"].as_str().unwrap_or("?"),
            ))
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Analytics "),
    );
    f.render_widget(paragraph, area);
}

fn render_elsewhere(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let msg = Paragraph::new("Another screen.\n\nPress Tab to return to Home.")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Notifications "));
    f.render_widget(msg, chunks[0]);
    status::render(f, app, chunks[1]);
}
