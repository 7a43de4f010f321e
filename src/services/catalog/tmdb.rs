/// TMDB catalog provider
///
/// Uses the multi search endpoint, which mixes movies, shows and people in one result
/// array:
/// `GET {api_url}/search/multi?api_key=&language=&query=&page=&include_adult=`
use crate::{
    error::{AppError, AppResult},
    models::{Listing, TmdbSearchResponse},
    services::catalog::{CatalogProvider, SearchQuery},
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, image_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            image_url,
            language,
        }
    }

    /// Converts a raw response into listings, dropping people
    fn to_listings(&self, response: TmdbSearchResponse) -> Vec<Listing> {
        response
            .results
            .into_iter()
            .filter_map(|result| result.into_listing(&self.image_url))
            .collect()
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn search(&self, query: &SearchQuery) -> AppResult<Vec<Listing>> {
        if query.query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/search/multi", self.api_url.trim_end_matches('/'));
        let page = query.page.to_string();
        let include_adult = if query.include_adult { "true" } else { "false" };

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
                ("query", query.query.as_str()),
                ("page", page.as_str()),
                ("include_adult", include_adult),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        let parsed: TmdbSearchResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize TMDB response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })?;

        let listings = self.to_listings(parsed);

        tracing::info!(
            query = %query.query,
            page = query.page,
            results = listings.len(),
            provider = self.name(),
            "Catalog search completed"
        );

        Ok(listings)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
