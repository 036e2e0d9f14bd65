//! Bearer-token guard for the admin routes.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::application::envelope::{Envelope, messages};
use crate::application::error::ErrorReport;
use crate::config::AdminSettings;
use crate::infra::error::InfraError;

use super::state::HttpState;

/// SHA-256 digest of the admin bearer token. Without one, nothing verifies.
#[derive(Clone, Default)]
pub struct AdminToken {
    digest: Option<Vec<u8>>,
}

impl AdminToken {
    pub fn from_settings(settings: &AdminSettings) -> Result<Self, InfraError> {
        let digest = settings
            .token_sha256
            .as_deref()
            .map(hex::decode)
            .transpose()
            .map_err(|err| InfraError::configuration(format!("admin.token_sha256: {err}")))?;
        Ok(Self { digest })
    }

    /// Build from the plain token, hashing it the way requests are checked.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            digest: Some(hash_token(secret)),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.digest.is_some()
    }

    pub fn verify(&self, token: &str) -> bool {
        match &self.digest {
            Some(expected) => expected.ct_eq(&hash_token(token)).unwrap_u8() == 1,
            None => false,
        }
    }
}

fn hash_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}

fn extract_token(header: Option<&HeaderValue>) -> Option<&str> {
    let raw = header?.to_str().ok()?;
    raw.strip_prefix("Bearer ").map(str::trim)
}

pub async fn require_admin(
    State(state): State<HttpState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let verified = extract_token(request.headers().get(AUTHORIZATION))
        .is_some_and(|token| state.admin.verify(token));

    if !verified {
        let reason = if state.admin.is_configured() {
            "missing or invalid bearer token"
        } else {
            "admin token digest is not configured"
        };
        let mut response =
            Envelope::<()>::failure(StatusCode::UNAUTHORIZED, messages::UNAUTHORIZED)
                .into_response();
        ErrorReport::from_message("infra::http::auth", StatusCode::UNAUTHORIZED, reason)
            .attach(&mut response);
        return response;
    }

    next.run(request).await
}
