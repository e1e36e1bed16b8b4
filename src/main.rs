use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use feedpager::analytics::{AnalyticsSink, JsonLinesSink};
use feedpager::app::App;
use feedpager::config::Config;
use feedpager::feed::{build_feed_list, FeedDescriptor, SelectedFeed};

/// Get the config directory path (~/.config/feedpager/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("feedpager"))
}

#[derive(Parser, Debug)]
#[command(name = "feedpager", about = "Pinned-feed pager for the terminal")]
struct Args {
    /// Config file (default: ~/.config/feedpager/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the feed list and the selected index, then exit
    #[arg(long)]
    list: bool,

    /// Start on this feed (e.g. `following`, `list|at://...`)
    #[arg(long, value_name = "FEED")]
    select: Option<FeedDescriptor>,
}

/// Log to a file: the terminal belongs to the TUI.
fn init_tracing(config_dir: &std::path::Path) -> Result<()> {
    let log_path = config_dir.join("feedpager.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file '{}'", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }
    init_tracing(&config_dir)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;

    if let Some(feed) = &args.select {
        config.initial_feed = Some(feed.to_string());
    }

    if args.list {
        print_feed_list(&config);
        return Ok(());
    }

    let (extra_sink, analytics_writer) = match &config.analytics_log {
        Some(path) => {
            let (sink, writer) = JsonLinesSink::open(path).with_context(|| {
                format!("Failed to open analytics log '{}'", path.display())
            })?;
            (Some(Arc::new(sink) as Arc<dyn AnalyticsSink>), Some(writer))
        }
        None => (None, None),
    };

    let mut app = App::new(config, config_path, extra_sink);
    let result = feedpager::ui::run(&mut app).await;

    // Dropping the app closes the analytics channel; wait for the tail to land.
    drop(app);
    if let Some(writer) = analytics_writer {
        if let Err(e) = writer.await {
            tracing::warn!(error = %e, "Analytics writer failed");
        }
    }

    result
}

fn print_feed_list(config: &Config) {
    let pinned = config.pinned_feeds();
    let feeds = build_feed_list(&pinned.infos);
    let selected = config.initial_selection();
    let index = feeds.selected_index(&selected);

    if feeds.is_empty() {
        println!("No feeds pinned.");
    }
    for (i, feed) in feeds.iter().enumerate() {
        let marker = if i == index { '*' } else { ' ' };
        println!("{} {:>2}  {}", marker, i, feed);
    }
    if let SelectedFeed::Feed(feed) = &selected {
        if feeds.position(feed).is_none() {
            println!("(selected feed {} is not pinned; showing index 0)", feed);
        }
    }
}
