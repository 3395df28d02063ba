//! In-memory catalog used for local development and tests.

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};

use super::{CatalogResult, Category, Company, Job, JobCatalog};

/// Catalog backed by fixed vectors.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    jobs: Vec<Job>,
    companies: Vec<Company>,
    categories: Vec<Category>,
}

impl InMemoryCatalog {
    pub fn new(jobs: Vec<Job>, companies: Vec<Company>, categories: Vec<Category>) -> Self {
        Self {
            jobs,
            companies,
            categories,
        }
    }

    /// A small fixed data set.
    pub fn seeded() -> Self {
        let now = OffsetDateTime::now_utc();

        let categories = vec![
            Category {
                id: 1,
                name: "Engineering".to_string(),
                slug: "engineering".to_string(),
            },
            Category {
                id: 2,
                name: "Design".to_string(),
                slug: "design".to_string(),
            },
        ];

        let companies = vec![
            Company {
                id: 1,
                name: "Acme Robotics".to_string(),
                slug: "acme-robotics".to_string(),
                website: Some("https://acme.example".to_string()),
            },
            Company {
                id: 2,
                name: "Northwind".to_string(),
                slug: "northwind".to_string(),
                website: None,
            },
        ];

        let job = |id: u64,
                   title: &str,
                   company_id: u64,
                   category: &str,
                   featured: bool,
                   age_days: i64| Job {
            id,
            title: title.to_string(),
            slug: title.to_ascii_lowercase().replace(' ', "-"),
            company_id,
            category_slug: category.to_string(),
            location: "Remote".to_string(),
            salary_range: None,
            featured,
            posted_at: now - Duration::days(age_days),
        };

        let jobs = vec![
            job(1, "Senior Rust Engineer", 1, "engineering", true, 1),
            job(2, "Product Designer", 2, "design", true, 3),
            job(3, "Platform Engineer", 2, "engineering", false, 2),
            job(4, "Staff Backend Engineer", 1, "engineering", true, 7),
        ];

        Self::new(jobs, companies, categories)
    }

    fn newest_first<'a>(jobs: impl Iterator<Item = &'a Job>) -> Vec<Job> {
        let mut out: Vec<Job> = jobs.cloned().collect();
        out.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        out
    }
}

#[async_trait]
impl JobCatalog for InMemoryCatalog {
    async fn featured_jobs(&self, limit: usize) -> CatalogResult<Vec<Job>> {
        let mut jobs = Self::newest_first(self.jobs.iter().filter(|j| j.featured));
        jobs.truncate(limit);
        Ok(jobs)
    }

    async fn job(&self, id: u64) -> CatalogResult<Option<Job>> {
        Ok(self.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn jobs_in_category(&self, slug: &str) -> CatalogResult<Vec<Job>> {
        Ok(Self::newest_first(
            self.jobs.iter().filter(|j| j.category_slug == slug),
        ))
    }

    async fn companies(&self) -> CatalogResult<Vec<Company>> {
        Ok(self.companies.clone())
    }

    async fn categories(&self) -> CatalogResult<Vec<Category>> {
        Ok(self.categories.clone())
    }
}
