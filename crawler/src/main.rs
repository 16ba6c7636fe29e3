use anyhow::Result;
use bookworm_core::catalog::DEFAULT_BASE_URL;
use bookworm_core::render::{self, DocumentView, TitleView};
use bookworm_core::{Catalog, Error, QueryService, SledStore};
use clap::{Parser, Subcommand};
use serde::Serialize;
use crawler::{FetchConfig, HttpFetcher, DEFAULT_USER_AGENT};
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "Find public-domain books and count their most frequent words")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Directory of the local result store
    #[arg(long, default_value = "./saved_data", global = true)]
    db: String,
    /// Catalog base URL
    #[arg(long, default_value = DEFAULT_BASE_URL, global = true)]
    catalog: String,
    /// Request timeout seconds
    #[arg(long, default_value_t = 30, global = true)]
    timeout_secs: u64,
    /// User-Agent string sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT, global = true)]
    user_agent: String,
    /// Print JSON instead of text
    #[arg(long, default_value_t = false, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Look a title up in the local store, else find its catalog page
    Title {
        /// Book title; several words may be given unquoted
        title: Vec<String>,
    },
    /// Download a plain-text book, rank its words and store the result
    Url {
        url: Option<String>,
    },
    /// List stored titles
    Saved,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    let fetcher = HttpFetcher::new(&FetchConfig {
        user_agent: cli.user_agent.clone(),
        timeout_secs: cli.timeout_secs,
        ..FetchConfig::default()
    })?;
    let store = SledStore::open(&cli.db)?;
    let catalog = Catalog::with_base_url(&cli.catalog)?;
    let service = QueryService::new(fetcher, store, catalog);

    let outcome = match cli.command {
        Commands::Title { title } => service.resolve_by_title(&title.join(" ")).await.map(|outcome| {
            if cli.json {
                to_json(&TitleView::from(&outcome))
            } else {
                render::title_outcome_text(&outcome)
            }
        }),
        Commands::Url { url } => service.resolve_by_url(url.as_deref().unwrap_or("")).await.map(|record| {
            if cli.json {
                to_json(&DocumentView::from(&record))
            } else {
                render::document_text(&record)
            }
        }),
        Commands::Saved => service.cache().store().saved_entries().map_err(Error::from).map(|rows| {
            if cli.json {
                return to_json(&rows);
            }
            rows.iter()
                .map(|r| format!("{}) {}  {}\n", r.id, r.title, r.saved_at.as_deref().unwrap_or("-")))
                .collect()
        }),
    };

    match outcome {
        Ok(text) => {
            print!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_user_error() => {
            eprintln!("{e}");
            Ok(ExitCode::from(2))
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    let mut out = serde_json::to_string_pretty(value).unwrap_or_default();
    out.push('\n');
    out
}
