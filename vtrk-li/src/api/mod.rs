//! HTTP API handlers for vtrk-li

pub mod albums;
pub mod enrich;
pub mod health;
pub mod import;

pub use albums::album_routes;
pub use enrich::enrich_routes;
pub use health::health_routes;
pub use import::import_routes;
