/// Media catalog search
///
/// The catalog is a third-party service. A provider turns a free-text query into
/// listings ready to be added to a list; people and other non-media results are dropped
/// by the provider.
use serde::Deserialize;

use crate::{error::AppResult, models::Listing};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Parameters of one catalog search
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub include_adult: bool,
}

fn default_page() -> u32 {
    1
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: default_page(),
            include_adult: false,
        }
    }
}

/// Trait for catalog search providers
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search movies and shows. Empty queries are rejected without a request.
    async fn search(&self, query: &SearchQuery) -> AppResult<Vec<Listing>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
