// newsdigest CLI
//
// Crawls the selected news sites, builds the daily briefing and prints it to
// stdout. Logs go to stderr; set RUST_LOG to change verbosity.

use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use newsdigest::config::DigestConfig;
use newsdigest::digest::run_digest;
use newsdigest::sources::NewsSource;
use newsdigest::utils::{DEFAULT_ARCHIVE_PATH, DEFAULT_MAX_FEED_ITEMS};

#[derive(Parser, Debug)]
#[command(name = "newsdigest", about = "Build a daily news briefing from several sites")]
struct Cli {
    /// Crawl every supported site
    #[arg(long)]
    all: bool,

    /// Crawl PBS NewsHour
    #[arg(long)]
    pbs: bool,

    /// Crawl NPR News
    #[arg(long)]
    npr: bool,

    /// Crawl UPI Top News
    #[arg(long)]
    upi: bool,

    /// Filter out articles already seen in earlier runs (and mark the rest as seen)
    #[arg(long)]
    archive: bool,

    /// Archive database file
    #[arg(long, env = "NEWSDIGEST_ARCHIVE_PATH", default_value = DEFAULT_ARCHIVE_PATH)]
    archive_path: PathBuf,

    /// Maximum number of items in the briefing
    #[arg(long, default_value_t = DEFAULT_MAX_FEED_ITEMS)]
    max_items: usize,

    /// Seed for crawl delays and shuffling, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Chrome profile directory (a temporary one by default)
    #[arg(long, env = "NEWSDIGEST_CHROME_DATA_DIR")]
    chrome_data_dir: Option<PathBuf>,

    /// Summarizer command: JSON array of articles in, JSON array of summaries out
    #[arg(long, env = "NEWSDIGEST_SUMMARIZER")]
    summarizer: Option<String>,

    /// Deduper command: JSON object of source -> texts in, same shape out
    #[arg(long, env = "NEWSDIGEST_DEDUPER")]
    deduper: Option<String>,
}

impl Cli {
    fn selected_sources(&self) -> Vec<NewsSource> {
        if self.all {
            return NewsSource::ALL.to_vec();
        }
        [
            (self.pbs, NewsSource::Pbs),
            (self.npr, NewsSource::Npr),
            (self.upi, NewsSource::Upi),
        ]
        .into_iter()
        .filter_map(|(enabled, source)| enabled.then_some(source))
        .collect()
    }

    fn into_config(self) -> Result<DigestConfig> {
        let sources = self.selected_sources();
        if sources.is_empty() {
            bail!("At least one site must be selected (--all, --pbs, --npr or --upi), otherwise there is no news to get");
        }

        let mut builder = DigestConfig::builder()
            .sources(sources)
            .headless(!self.headed)
            .archive(self.archive)
            .archive_path(self.archive_path)
            .max_feed_items(self.max_items);
        if let Some(dir) = self.chrome_data_dir {
            builder = builder.chrome_data_dir(dir);
        }
        if let Some(seed) = self.seed {
            builder = builder.rng_seed(seed);
        }
        if let Some(command) = self.summarizer {
            builder = builder.summarizer_command(command);
        }
        if let Some(command) = self.deduper {
            builder = builder.deduper_command(command);
        }
        builder.build()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::parse().into_config()?;
    info!(
        sources = ?config.sources(),
        archive = config.archive_enabled(),
        max_items = config.max_feed_items(),
        "Building news digest"
    );

    let digest = run_digest(&config).await?;
    println!("{digest}");
    Ok(())
}
