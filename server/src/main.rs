use anyhow::Result;
use axum::Router;
use bookworm_core::{Catalog, QueryService, SledStore};
use clap::Parser;
use crawler::{FetchConfig, HttpFetcher};
use server::build_app;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Directory of the local result store
    #[arg(long, default_value = "./saved_data")]
    db: String,
    /// Catalog base URL (falls back to CATALOG_BASE_URL, then Project Gutenberg)
    #[arg(long)]
    catalog: Option<String>,
    /// Request timeout seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let catalog = match args.catalog.or_else(|| std::env::var("CATALOG_BASE_URL").ok()) {
        Some(base) => Catalog::with_base_url(&base)?,
        None => Catalog::default(),
    };
    let fetcher = HttpFetcher::new(&FetchConfig { timeout_secs: args.timeout_secs, ..FetchConfig::default() })?;
    let store = SledStore::open(&args.db)?;
    tracing::info!(db = %args.db, catalog = %catalog.base_url, "store opened");
    let app: Router = build_app(QueryService::new(fetcher, store, catalog));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
