//! # Authentication
//!
//! Bearer-token verification against an external identity service.
//!
//! ## Flow
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │ Request ──► require_auth middleware                                │
//! │               │                                                    │
//! │               ├─ extract "Authorization: Bearer <token>"           │
//! │               ├─ AuthVerifier::verify(token) ──► identity service  │
//! │               │                                                    │
//! │               ├─ Some(AuthUser) ──► insert extension, continue     │
//! │               └─ None ──► 401 {"error": ...}                       │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All verification failures collapse to `None`: a missing header, a
//! malformed token, a network error, and an identity-service rejection
//! are indistinguishable to the client.

use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// The authenticated caller, attached to every request that passes the
/// auth middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

/// Token verification seam. The production implementation calls the
/// identity service over HTTP; tests substitute a static verifier.
#[async_trait]
pub trait AuthVerifier: Send + Sync {
    /// Resolves a bearer token to a user, or `None` if it cannot be
    /// verified for any reason.
    async fn verify(&self, token: &str) -> Option<AuthUser>;
}

/// Identity-service response shape for a verified token.
#[derive(Debug, Deserialize)]
struct IdentityUser {
    id: String,
    email: Option<String>,
}

/// Verifies tokens by forwarding them to the identity service.
pub struct IdentityServiceVerifier {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl IdentityServiceVerifier {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        IdentityServiceVerifier {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl AuthVerifier for IdentityServiceVerifier {
    async fn verify(&self, token: &str) -> Option<AuthUser> {
        let url = format!("{}/auth/v1/user", self.base_url.trim_end_matches('/'));
        let mut request = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, format!("Bearer {token}"));
        if let Some(ref key) = self.api_key {
            request = request.header("apikey", key);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(err) => {
                debug!(error = %err, "Identity service unreachable");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(status = %response.status(), "Identity service rejected token");
            return None;
        }

        let user: IdentityUser = response.json().await.ok()?;
        Some(AuthUser {
            id: user.id,
            email: user.email,
        })
    }
}

/// Pulls the token out of `Authorization: Bearer <token>`.
fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
}

/// Middleware guarding every protected route. On success the resolved
/// [`AuthUser`] is inserted as a request extension for handlers to read.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request).ok_or(ApiError::Unauthorized)?;

    let user = state
        .verifier
        .verify(token)
        .await
        .ok_or(ApiError::Unauthorized)?;

    debug!(user_id = %user.id, "Authenticated request");
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
