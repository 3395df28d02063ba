//! In-process query cache.
//!
//! ## Architecture
//!
//! - **EphemeralCache (DashMap)**: in-memory, per-instance, lazily expiring
//! - One cache per payload type (key-space); see [`crate::catalog::CachedCatalog`]
//!
//! ## Lookup
//!
//! ```text
//! GET request → EphemeralCache → JobCatalog (remote database)
//!                    ↓                 ↓
//!                   hit          miss: fetch + set
//! ```
//!
//! Nothing is shared across instances: each process keeps its own view and
//! nothing survives a restart.

pub mod store;

pub use store::{CacheStats, CachedEntry, DEFAULT_TTL, EphemeralCache};
