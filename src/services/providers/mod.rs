/// Movie catalog client abstraction
///
/// The pipeline only ever talks to the remote movie database through this trait, so the
/// OMDb implementation can be swapped for fakes in tests.
use crate::{
    error::AppResult,
    models::{ImdbId, MovieDetail, MovieSummary},
};

pub mod omdb;

pub use omdb::OmdbClient;

/// Trait for remote movie catalogs
///
/// Both queries are read-only. A search with no hits returns an empty page rather than an
/// error; errors are reserved for transport, status and payload failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Keyword search returning one page of summaries (1-based page numbers)
    async fn search(&self, query: &str, page: u32) -> AppResult<Vec<MovieSummary>>;

    /// Full record for one identifier
    ///
    /// `Ok(None)` when the catalog answers but reports no usable record.
    async fn detail(&self, id: &ImdbId) -> AppResult<Option<MovieDetail>>;

    /// Client name for logging and debugging
    fn name(&self) -> &'static str;
}
