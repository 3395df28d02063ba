pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;

pub use cache::{CacheStats, CachedEntry, EphemeralCache};
pub use catalog::{CachedCatalog, CatalogError, InMemoryCatalog, JobCatalog};
pub use config::{AppConfig, CacheConfig, LoggingConfig, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use observability::init_tracing;
pub use server::{AppState, JobboardServer, ServerBuilder, build_app};
