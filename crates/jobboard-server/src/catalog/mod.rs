//! Job catalog: the seam to the hosted database service.
//!
//! The database itself is an external collaborator. [`JobCatalog`] is the
//! query surface the HTTP layer needs from it; [`CachedCatalog`] puts the
//! ephemeral cache in front of any implementation.

pub mod cached;
pub mod memory;
pub mod models;

use async_trait::async_trait;

pub use cached::{CachedCatalog, CatalogCacheStats};
pub use memory::InMemoryCatalog;
pub use models::{Category, Company, Job};

/// Failures reported by a catalog backend.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The remote store could not be reached.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// The remote store answered with something unusable.
    #[error("catalog query failed: {0}")]
    Query(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Read queries the public pages issue against the job database.
#[async_trait]
pub trait JobCatalog: Send + Sync {
    /// Featured jobs, newest first, at most `limit`.
    async fn featured_jobs(&self, limit: usize) -> CatalogResult<Vec<Job>>;

    async fn job(&self, id: u64) -> CatalogResult<Option<Job>>;

    /// Jobs in a category, newest first.
    async fn jobs_in_category(&self, slug: &str) -> CatalogResult<Vec<Job>>;

    async fn companies(&self) -> CatalogResult<Vec<Company>>;

    async fn categories(&self) -> CatalogResult<Vec<Category>>;
}
