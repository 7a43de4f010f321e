use serde::{Deserialize, Serialize};

use super::Listing;

/// Owner recorded on lists that live in device-local storage
pub const LOCAL_OWNER: &str = "localstorage";

/// A named, owned, ordered collection of listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub list_id: String,
    pub list_name: String,
    #[serde(default)]
    pub list_description: String,
    pub owner_username: String,
    pub listings: Vec<Listing>,
}

/// Body of `POST /createlist`; the server assigns the id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewList {
    pub list_name: String,
    pub list_description: String,
    pub owner_username: String,
    pub listings: Vec<Listing>,
}

/// Editable part of a list. Body of `PATCH /updatelist/{listId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListDetails {
    pub list_name: String,
    pub list_description: String,
    pub listings: Vec<Listing>,
}

impl ListDetails {
    pub fn into_list(self, list_id: String, owner_username: String) -> List {
        List {
            list_id,
            list_name: self.list_name,
            list_description: self.list_description,
            owner_username,
            listings: self.listings,
        }
    }

    pub fn into_new_list(self, owner_username: String) -> NewList {
        NewList {
            list_name: self.list_name,
            list_description: self.list_description,
            owner_username,
            listings: self.listings,
        }
    }
}

impl From<&List> for ListDetails {
    fn from(list: &List) -> Self {
        Self {
            list_name: list.list_name.clone(),
            list_description: list.list_description.clone(),
            listings: list.listings.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;

    #[test]
    fn test_list_json_shape() {
        let list = List {
            list_id: "abc".to_string(),
            list_name: "Weekend".to_string(),
            list_description: String::new(),
            owner_username: LOCAL_OWNER.to_string(),
            listings: vec![Listing {
                id: 1396,
                title: "Breaking Bad".to_string(),
                img_url: None,
                media_type: MediaType::Tv,
                id_within_list: Some("x".to_string()),
            }],
        };

        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["listId"], "abc");
        assert_eq!(json["listName"], "Weekend");
        assert_eq!(json["ownerUsername"], "localstorage");
        assert_eq!(json["listings"][0]["idWithinList"], "x");
    }

    #[test]
    fn test_details_round_into_list() {
        let details = ListDetails {
            list_name: "A".to_string(),
            list_description: "d".to_string(),
            listings: vec![],
        };
        let list = details.clone().into_list("id1".to_string(), "ana".to_string());
        assert_eq!(list.list_id, "id1");
        assert_eq!(ListDetails::from(&list), details);
    }
}
