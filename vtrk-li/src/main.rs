//! vtrk-li - List Ingest service
//!
//! Accepts checklist uploads (plain text or RTF), parses them into
//! want/have entries, enriches each album against external music catalogs,
//! and persists the results for browsing.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use vtrk_common::config::{
    load_toml_config, resolve_discogs_token, resolve_root_folder, RootFolderInitializer,
};
use vtrk_li::services::{CatalogClient, CatalogConfig, DiscogsClient, ImportSettings};
use vtrk_li::AppState;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "vtrk-li", about = "VinylTrack list ingest service")]
struct Args {
    /// Root folder holding the database (overrides env and config file)
    #[arg(long)]
    root_folder: Option<String>,

    /// Port to listen on
    #[arg(long, default_value_t = 5741)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting vtrk-li (List Ingest) v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let toml_config = load_toml_config();

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    info!("Database: {}", db_path.display());

    let db_pool = vtrk_li::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    let catalog = CatalogClient::new(CatalogConfig::default())?;

    let discogs = match resolve_discogs_token(&toml_config) {
        Some(token) => Some(DiscogsClient::new(Some(token))?),
        None => {
            info!("Discogs token not configured; provenance lookups disabled");
            None
        }
    };

    let state = AppState::new(db_pool, catalog, discogs, ImportSettings::default());
    let app = vtrk_li::build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("Listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
