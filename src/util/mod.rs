//! Text helpers for the terminal host: Unicode-aware width and truncation.

mod text;

pub use text::{display_width, short_feed_label, truncate_to_width};
