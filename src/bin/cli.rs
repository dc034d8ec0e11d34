use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use card_gallery::debounce::Debouncer;
use card_gallery::download::DownloadOutcome;
use card_gallery::{CardRecord, GalleryConfig, GallerySession, SearchError};

#[derive(Parser)]
#[command(name = "card-gallery")]
#[command(about = "Search trading cards and download HD images", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Card API base URL (overrides CARD_GALLERY_API_BASE_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Cards per page (overrides CARD_GALLERY_PAGE_SIZE)
    #[arg(short, long, global = true)]
    page_size: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for cards and print the first page
    Search {
        /// Card name or fragment
        query: String,

        /// Print every page instead of only the first
        #[arg(long)]
        all: bool,
    },

    /// Download the HD image of one search result
    Download {
        /// Card name or fragment
        query: String,

        /// 1-based position in the results
        index: usize,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Type queries line by line; `more`, `dl N`, `stats`, `quit`
    Interactive {
        /// Output directory for `dl`
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
}

/// Non-query lines in interactive mode
enum Command {
    More,
    Download(usize),
    Stats,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        match parts.next()? {
            "more" | "m" => Some(Command::More),
            "stats" => Some(Command::Stats),
            "quit" | "exit" | "q" => Some(Command::Quit),
            "dl" => parts.next()?.parse().ok().map(Command::Download),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "card_gallery=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = GalleryConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }

    let session = GallerySession::new(config).await?;

    match cli.command {
        Commands::Search { query, all } => {
            println!("🔍 Searching for: {}", query);
            let Some(response) = report(session.search(&query).await) else {
                return Ok(());
            };

            print_cards(&response.first_page, 0);
            if all {
                while session.has_more() {
                    let offset = session.displayed_count();
                    print_cards(&session.next_page(), offset);
                }
            }
            println!("\n{}", session.progress());
        }

        Commands::Download { query, index, out } => {
            if report(session.search(&query).await).is_none() {
                return Ok(());
            }
            download(&session, index, &out).await?;
        }

        Commands::Interactive { out } => interactive(&session, &out).await?,
    }

    Ok(())
}

/// Print the outcome message for failed searches, pass successes through
fn report<T>(result: Result<T, SearchError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(SearchError::Superseded(_)) => None,
        Err(e) if e.is_failure() => {
            tracing::error!("❌ {}", e);
            println!("❌ {}", e.user_message());
            None
        }
        Err(e) => {
            println!("{}", e.user_message());
            None
        }
    }
}

fn print_cards(cards: &[CardRecord], offset: usize) {
    for (i, card) in cards.iter().enumerate() {
        println!("  {:>3}. {}", offset + i + 1, card.display_name());
        if card.has_image() {
            println!("       {}", card.small_image_url());
        }
    }
}

async fn download(session: &GallerySession, index: usize, out: &Path) -> anyhow::Result<()> {
    if index == 0 {
        anyhow::bail!("positions start at 1");
    }

    match session.download(index - 1).await? {
        DownloadOutcome::Fetched(image) => {
            let path = image.save_to(out).await?;
            println!("✅ Downloaded {}", path.display());
        }
        DownloadOutcome::DirectLink { url, file_name } => {
            println!("⚠️ Could not fetch the image, download it directly:");
            println!("   {} -> {}", url, file_name);
        }
    }
    Ok(())
}

async fn run_query(session: &GallerySession, query: &str) {
    if let Some(response) = report(session.search(query).await) {
        print_cards(&response.first_page, 0);
        println!("{}", response.progress);
    }
}

async fn interactive(session: &GallerySession, out: &Path) -> anyhow::Result<()> {
    let (query_tx, mut debouncer) = Debouncer::channel(session.config().debounce, 64);
    let (command_tx, mut command_rx) = mpsc::channel::<Command>(16);

    // Reader task: commands go straight through, everything else is debounced
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let sent = match Command::parse(line.trim()) {
                Some(command) => command_tx.send(command).await.is_ok(),
                None => query_tx.send(line).await.is_ok(),
            };
            if !sent {
                break;
            }
        }
    });

    println!("Type a card name (more | dl N | stats | quit)");

    loop {
        tokio::select! {
            // Settled queries win over a closed command channel at EOF
            biased;

            query = debouncer.next() => {
                let Some(query) = query else { break };
                run_query(session, &query).await;
            }
            command = command_rx.recv() => match command {
                Some(Command::More) => {
                    let offset = session.displayed_count();
                    let page = session.next_page();
                    if page.is_empty() {
                        println!("No more cards.");
                    } else {
                        print_cards(&page, offset);
                        println!("{}", session.progress());
                    }
                }
                Some(Command::Download(index)) => {
                    if let Err(e) = download(session, index, out).await {
                        println!("❌ Download failed: {}", e);
                    }
                }
                Some(Command::Stats) => {
                    let stats = session.cache_stats();
                    println!("📊 Cache Statistics:");
                    println!("   Entries: {}/{}", stats.total_entries, stats.max_entries);
                    println!("   Hits: {} / Misses: {} ({:.0}%)", stats.hits, stats.misses, stats.hit_rate() * 100.0);
                    println!("   Sweeps: {} / Clears: {}", stats.sweeps, stats.clears);
                    if let Some(cleared) = stats.last_cleared {
                        println!("   Last cleared: {}", cleared.format("%Y-%m-%d %H:%M:%S"));
                    }
                }
                Some(Command::Quit) => break,
                None => {
                    // Input closed: flush whatever is still waiting to settle
                    while let Some(query) = debouncer.next().await {
                        run_query(session, &query).await;
                    }
                    break;
                }
            }
        }
    }

    reader.abort();
    Ok(())
}
