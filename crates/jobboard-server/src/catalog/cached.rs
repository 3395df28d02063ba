//! Catalog reads through the ephemeral cache.
//!
//! ## Cache Key Format
//!
//! | Query | Key |
//! |-------|-----|
//! | featured jobs | `jobs-featured-{limit}` |
//! | job by id | `job-{id}` |
//! | jobs in category | `jobs-category-{slug}` |
//! | companies | `companies-all` |
//! | categories | `categories-all` |
//!
//! Each payload type has its own [`EphemeralCache`], so a key only ever maps
//! to one type. Unknown jobs (`None`) and backend errors are not cached.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use super::{CatalogResult, Category, Company, Job, JobCatalog};
use crate::cache::{CacheStats, EphemeralCache};

/// [`JobCatalog`] decorator that memoizes reads for `ttl`.
#[derive(Clone)]
pub struct CachedCatalog {
    inner: Arc<dyn JobCatalog>,
    ttl: Duration,
    job_lists: EphemeralCache<Vec<Job>>,
    jobs: EphemeralCache<Job>,
    companies: EphemeralCache<Vec<Company>>,
    categories: EphemeralCache<Vec<Category>>,
}

impl CachedCatalog {
    /// Wrap `inner`, caching every read for `ttl`.
    pub fn new(inner: Arc<dyn JobCatalog>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            job_lists: EphemeralCache::with_default_ttl(ttl),
            jobs: EphemeralCache::with_default_ttl(ttl),
            companies: EphemeralCache::with_default_ttl(ttl),
            categories: EphemeralCache::with_default_ttl(ttl),
        }
    }

    #[inline]
    fn featured_key(limit: usize) -> String {
        format!("jobs-featured-{limit}")
    }

    #[inline]
    fn job_key(id: u64) -> String {
        format!("job-{id}")
    }

    #[inline]
    fn category_key(slug: &str) -> String {
        format!("jobs-category-{slug}")
    }

    const COMPANIES_KEY: &'static str = "companies-all";
    const CATEGORIES_KEY: &'static str = "categories-all";

    pub async fn featured_jobs(&self, limit: usize) -> CatalogResult<Arc<Vec<Job>>> {
        let key = Self::featured_key(limit);
        self.job_lists
            .get_or_try_fetch(&key, self.ttl, || self.inner.featured_jobs(limit))
            .await
    }

    pub async fn job(&self, id: u64) -> CatalogResult<Option<Arc<Job>>> {
        let key = Self::job_key(id);
        if let Some(hit) = self.jobs.get(&key) {
            return Ok(Some(hit));
        }

        let Some(job) = self.inner.job(id).await? else {
            return Ok(None);
        };
        let job = Arc::new(job);
        self.jobs.set(key, Arc::clone(&job), self.ttl);
        Ok(Some(job))
    }

    pub async fn jobs_in_category(&self, slug: &str) -> CatalogResult<Arc<Vec<Job>>> {
        let key = Self::category_key(slug);
        self.job_lists
            .get_or_try_fetch(&key, self.ttl, || self.inner.jobs_in_category(slug))
            .await
    }

    pub async fn companies(&self) -> CatalogResult<Arc<Vec<Company>>> {
        self.companies
            .get_or_try_fetch(Self::COMPANIES_KEY, self.ttl, || self.inner.companies())
            .await
    }

    pub async fn categories(&self) -> CatalogResult<Arc<Vec<Category>>> {
        self.categories
            .get_or_try_fetch(Self::CATEGORIES_KEY, self.ttl, || {
                self.inner.categories()
            })
            .await
    }

    /// Drop `key` from whichever key-space holds it.
    /// Returns `true` if an entry was removed.
    pub fn invalidate(&self, key: &str) -> bool {
        // Non-short-circuiting: a key is only stored in one space, but try all.
        let removed = [
            self.job_lists.invalidate(key),
            self.jobs.invalidate(key),
            self.companies.invalidate(key),
            self.categories.invalidate(key),
        ];
        removed.contains(&true)
    }

    pub fn stats(&self) -> CatalogCacheStats {
        CatalogCacheStats {
            job_lists: self.job_lists.stats(),
            jobs: self.jobs.stats(),
            companies: self.companies.stats(),
            categories: self.categories.stats(),
        }
    }
}

/// Per key-space cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogCacheStats {
    pub job_lists: CacheStats,
    pub jobs: CacheStats,
    pub companies: CacheStats,
    pub categories: CacheStats,
}

impl CatalogCacheStats {
    pub fn total_entries(&self) -> usize {
        self.job_lists.entries + self.jobs.entries + self.companies.entries + self.categories.entries
    }
}
