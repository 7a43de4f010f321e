/// Account-backed list server
///
/// API Flow:
/// 1. Create: `POST /createlist` with the list minus its id → new list id
/// 2. Update: `PATCH /updatelist/{listId}` with name, description and listings
/// 3. Delete: `DELETE /deletelist/{listId}`
///
/// Every call carries `Authorization: Bearer <token>`. Without a credential the call is
/// refused before any request is made.
use reqwest::{Client as HttpClient, Response, StatusCode};

use crate::{
    error::{AppError, AppResult},
    models::{Credential, List, ListDetails},
};

#[derive(Debug, Clone)]
pub struct RemoteBackend {
    http_client: HttpClient,
    api_url: String,
}

impl RemoteBackend {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn create(
        &self,
        details: ListDetails,
        credential: Option<&Credential>,
    ) -> AppResult<List> {
        let credential = credential.ok_or(AppError::MissingCredential)?;
        let new_list = details.into_new_list(credential.username.clone());

        let response = self
            .http_client
            .post(format!("{}/createlist", self.api_url))
            .header(reqwest::header::AUTHORIZATION, credential.bearer())
            .json(&new_list)
            .send()
            .await?;
        let response = check_status(response).await?;

        let list_id = parse_list_id(&response.text().await?)?;

        tracing::info!(
            list_id = %list_id,
            owner = %credential.username,
            listings = new_list.listings.len(),
            "Remote list created"
        );

        Ok(List {
            list_id,
            list_name: new_list.list_name,
            list_description: new_list.list_description,
            owner_username: new_list.owner_username,
            listings: new_list.listings,
        })
    }

    pub async fn update(
        &self,
        list_id: &str,
        details: ListDetails,
        credential: Option<&Credential>,
    ) -> AppResult<()> {
        let credential = credential.ok_or(AppError::MissingCredential)?;

        let response = self
            .http_client
            .patch(format!("{}/updatelist/{}", self.api_url, list_id))
            .header(reqwest::header::AUTHORIZATION, credential.bearer())
            .json(&details)
            .send()
            .await?;
        check_status(response).await?;

        tracing::info!(list_id = %list_id, "Remote list saved");
        Ok(())
    }

    pub async fn delete(&self, list_id: &str, credential: Option<&Credential>) -> AppResult<()> {
        let credential = credential.ok_or(AppError::MissingCredential)?;

        let response = self
            .http_client
            .delete(format!("{}/deletelist/{}", self.api_url, list_id))
            .header(reqwest::header::AUTHORIZATION, credential.bearer())
            .send()
            .await?;
        check_status(response).await?;

        tracing::info!(list_id = %list_id, "Remote list deleted");
        Ok(())
    }
}

/// Maps auth failures and other non-success statuses to errors
async fn check_status(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED => Err(AppError::Unauthorized(body)),
        StatusCode::FORBIDDEN => Err(AppError::Forbidden(body)),
        _ => Err(AppError::ExternalApi(format!(
            "List server returned status {}: {}",
            status, body
        ))),
    }
}

/// The server answers with the new id either as a JSON string or as plain text
fn parse_list_id(body: &str) -> AppResult<String> {
    let list_id = serde_json::from_str::<String>(body)
        .unwrap_or_else(|_| body.trim().to_string());

    if list_id.is_empty() {
        return Err(AppError::ExternalApi(
            "List server returned an empty list id".to_string(),
        ));
    }
    Ok(list_id)
}
