//! External catalog clients and the enrichment orchestrator

pub mod catalog_client;
pub mod discogs_client;
pub mod importer;

pub use catalog_client::{CatalogClient, CatalogConfig, CatalogMatch};
pub use discogs_client::DiscogsClient;
pub use importer::{ImportSettings, ImportOutcome};
