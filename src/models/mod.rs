use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod list;
pub mod listing;

pub use list::{List, ListDetails, NewList, LOCAL_OWNER};
pub use listing::{Listing, MediaType};

/// Where a list is persisted. Fixed when the list is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListLocation {
    #[serde(rename = "server")]
    Server,
    #[serde(rename = "localStorage")]
    LocalStorage,
}

impl Display for ListLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListLocation::Server => write!(f, "server"),
            ListLocation::LocalStorage => write!(f, "localStorage"),
        }
    }
}

/// Account credential handed over by the sign-in flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub username: String,
    pub access_token: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            access_token: access_token.into(),
        }
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw `search/multi` response
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbResult>,
}

/// One entry of a `search/multi` response. People, movies and shows share the shape.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbResult {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    pub media_type: String,
}

impl TmdbResult {
    /// Converts the result into a listing, or `None` for people
    pub fn into_listing(self, image_base_url: &str) -> Option<Listing> {
        if self.media_type == "person" {
            return None;
        }

        let (media_type, title) = if self.media_type == "movie" {
            (MediaType::Movie, self.title)
        } else {
            (MediaType::Tv, self.name)
        };

        let img_url = self.poster_path.map(|path| {
            format!(
                "{}/{}",
                image_base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        });

        Some(Listing {
            id: self.id,
            title: title.unwrap_or_default(),
            img_url,
            media_type,
            id_within_list: None,
        })
    }
}
