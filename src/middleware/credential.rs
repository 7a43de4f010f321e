use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::models::Credential;

/// HTTP header carrying the signed-in username
pub const USERNAME_HEADER: &str = "x-username";

/// Extension type holding the caller's credential, if they sent one
#[derive(Clone, Debug, Default)]
pub struct CurrentCredential(pub Option<Credential>);

impl CurrentCredential {
    pub fn credential(&self) -> Option<&Credential> {
        self.0.as_ref()
    }

    /// Reads `Authorization: Bearer <token>` and `x-username`. Both must be present.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let username = headers
            .get(USERNAME_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|u| !u.is_empty());

        match (username, token) {
            (Some(username), Some(token)) => Self(Some(Credential::new(username, token))),
            _ => Self(None),
        }
    }
}

/// Middleware that stores the caller's credential in the request extensions.
///
/// Requests without a complete credential still go through; remote list operations
/// refuse them later.
pub async fn credential_middleware(mut request: Request, next: Next) -> Response {
    let credential = CurrentCredential::from_headers(request.headers());
    if let Some(c) = credential.credential() {
        tracing::debug!(username = %c.username, "Request carries a credential");
    }

    request.extensions_mut().insert(credential);
    next.run(request).await
}
