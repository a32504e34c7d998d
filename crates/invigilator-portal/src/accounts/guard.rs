use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use super::token::{Claims, TokenIssuer};
use super::TOKEN_COOKIE;
use crate::applications::domain::Role;

/// Authentication failures raised by the session extractors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authentication required")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Access denied for role {0}")]
    Forbidden(&'static str),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::MissingToken | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

fn presented_token(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    CookieJar::from_headers(&parts.headers)
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

fn authenticate<S>(parts: &Parts, state: &S) -> Result<Claims, AuthError>
where
    Arc<TokenIssuer>: FromRef<S>,
{
    let token = presented_token(parts).ok_or(AuthError::MissingToken)?;
    let issuer = Arc::<TokenIssuer>::from_ref(state);
    issuer.verify(&token).map_err(|err| {
        tracing::debug!(error = %err, "rejected session token");
        AuthError::InvalidToken
    })
}

/// Any signed-in user.
#[derive(Debug, Clone)]
pub struct Session(pub Claims);

/// A signed-in user with the candidate role.
#[derive(Debug, Clone)]
pub struct CandidateSession(pub Claims);

/// A signed-in user with the admin role.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Claims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
    Arc<TokenIssuer>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).map(Session)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CandidateSession
where
    Arc<TokenIssuer>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = authenticate(parts, state)?;
        match claims.role {
            Role::Candidate => Ok(CandidateSession(claims)),
            other => Err(AuthError::Forbidden(other.label())),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    Arc<TokenIssuer>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = authenticate(parts, state)?;
        match claims.role {
            Role::Admin => Ok(AdminSession(claims)),
            other => Err(AuthError::Forbidden(other.label())),
        }
    }
}
