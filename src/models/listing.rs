use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of catalog item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

/// One movie or show as displayed in a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Catalog (TMDB) id
    pub id: u64,
    pub title: String,
    pub img_url: Option<String>,
    pub media_type: MediaType,
    /// Identity of this entry inside one list, independent of position and catalog id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_within_list: Option<String>,
}

impl Listing {
    /// Returns a copy carrying a fresh in-list identity
    pub fn with_new_list_id(mut self) -> Self {
        self.id_within_list = Some(Uuid::new_v4().to_string());
        self
    }

    /// Whether both listings are the same entry of one list
    pub fn same_entry(&self, other: &Listing) -> bool {
        self.id_within_list == other.id_within_list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Listing {
        Listing {
            id: 603,
            title: "The Matrix".to_string(),
            img_url: None,
            media_type: MediaType::Movie,
            id_within_list: None,
        }
    }

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(listing()).unwrap();
        assert_eq!(json["imgUrl"], serde_json::Value::Null);
        assert_eq!(json["mediaType"], "movie");
        assert!(json.get("idWithinList").is_none());
    }

    #[test]
    fn test_with_new_list_id_is_unique() {
        let a = listing().with_new_list_id();
        let b = listing().with_new_list_id();
        assert!(a.id_within_list.is_some());
        assert_ne!(a.id_within_list, b.id_within_list);
        assert!(!a.same_entry(&b));
        assert!(a.same_entry(&a.clone()));
    }
}
