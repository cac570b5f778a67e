//! Database access for vtrk-li

pub mod albums;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Connects to vinyltrack.db in the root folder, creating it if missing.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create vtrk-li tables if they don't exist.
///
/// The UNIQUE constraint on (artist, title) backs the upsert-style
/// find-or-create, so concurrent imports cannot race a duplicate row in.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS albums (
            id TEXT PRIMARY KEY,
            artist TEXT NOT NULL,
            title TEXT NOT NULL,
            year INTEGER,
            format TEXT,
            genre TEXT,
            label TEXT,
            cover_image TEXT,
            discogs_id TEXT,
            discogs_url TEXT,
            apple_music_url TEXT,
            all_music_url TEXT,
            status TEXT NOT NULL DEFAULT 'WANT',
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (artist, title)
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (albums)");

    Ok(())
}
