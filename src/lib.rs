//! Home-feed selection and paging controller.
//!
//! A home screen shows the user's pinned feeds as pages of a pager. This
//! crate derives the ordered feed list from the pinned feeds, keeps an
//! externally stored selection aligned with a pager it does not control,
//! reports every displayed feed to analytics, and drives two shell flags
//! (minimal chrome, drawer swipe) from focus and paging.
//!
//! - [`feed`] - feed identifiers and the pinned-feed list builder
//! - [`home`] - the controller and its loading gate
//! - [`pager`] - pager commands/events and a tab pager
//! - [`selection`], [`analytics`], [`shell`], [`flags`], [`sources`] - collaborators
//! - [`config`], [`app`], [`ui`] - the terminal host

pub mod analytics;
pub mod app;
pub mod config;
pub mod feed;
pub mod flags;
pub mod home;
pub mod pager;
pub mod selection;
pub mod shell;
pub mod sources;
pub mod ui;
pub mod util;
