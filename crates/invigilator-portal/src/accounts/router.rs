use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::extract::WithRejection;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::json;

use super::domain::{AuthData, LoginRequest, LoginResponse, SignupRequest};
use super::guard::{CandidateSession, Session};
use super::service::{AccountError, AccountService};
use super::{AUTH_DATA_COOKIE, TOKEN_COOKIE};
use crate::applications::domain::ApplicationForm;
use crate::extract::JsonBody;
use crate::state::PortalState;

/// Signup, login and the signed-in user's own application.
pub fn account_router(state: PortalState) -> Router {
    Router::new()
        .route("/api/v1/auth/signup", post(signup_handler))
        .route("/api/v1/auth/login", post(login_handler))
        .route("/api/v1/me", get(me_handler))
        .route(
            "/api/v1/me/application",
            post(submit_handler).put(update_handler),
        )
        .with_state(state)
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let status = match &self {
            AccountError::MissingSignupFields
            | AccountError::MissingCredentials
            | AccountError::Invalid(_) => StatusCode::BAD_REQUEST,
            AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AccountError::NotFound => StatusCode::NOT_FOUND,
            AccountError::DuplicateEmail
            | AccountError::AlreadySubmitted
            | AccountError::NotSubmitted
            | AccountError::Locked => StatusCode::CONFLICT,
            AccountError::Password(_)
            | AccountError::Token(_)
            | AccountError::SessionData(_)
            | AccountError::Repository(_) => {
                tracing::error!(error = %self, "account operation failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response();
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Encode the session summary for the `authData` cookie.
pub fn encode_auth_data(data: &AuthData) -> Result<String, serde_json::Error> {
    let raw = serde_json::to_vec(data)?;
    Ok(URL_SAFE_NO_PAD.encode(raw))
}

/// Read back an `authData` cookie value. `None` when it is not a session summary.
pub fn decode_auth_data(raw: &str) -> Option<AuthData> {
    let bytes = URL_SAFE_NO_PAD.decode(raw.trim()).ok()?;
    serde_json::from_slice(&bytes).ok()
}

pub(crate) async fn signup_handler(
    State(accounts): State<Arc<AccountService>>,
    WithRejection(Json(request), _): JsonBody<SignupRequest>,
) -> Result<Response, AccountError> {
    let record = accounts.signup(request)?;
    let payload = json!({
        "message": "User registered successfully",
        "user": record.view(),
    });
    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

pub(crate) async fn login_handler(
    State(accounts): State<Arc<AccountService>>,
    jar: CookieJar,
    WithRejection(Json(request), _): JsonBody<LoginRequest>,
) -> Result<Response, AccountError> {
    let outcome = accounts.login(request)?;

    let auth_data = encode_auth_data(&outcome.auth_data())?;
    let token_cookie = Cookie::build((TOKEN_COOKIE, outcome.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    let auth_cookie = Cookie::build((AUTH_DATA_COOKIE, auth_data))
        .path("/")
        .same_site(SameSite::Lax);
    let jar = jar.add(token_cookie).add(auth_cookie);

    let body = LoginResponse {
        message: "Login successful",
        email: outcome.record.profile.email.clone(),
        name: outcome.record.profile.name.clone(),
        role: outcome.record.role,
        token: outcome.token,
    };
    Ok((StatusCode::OK, jar, Json(body)).into_response())
}

pub(crate) async fn me_handler(
    State(accounts): State<Arc<AccountService>>,
    Session(claims): Session,
) -> Result<Response, AccountError> {
    let record = accounts.profile(&claims)?;
    Ok((StatusCode::OK, Json(record.view())).into_response())
}

pub(crate) async fn submit_handler(
    State(accounts): State<Arc<AccountService>>,
    CandidateSession(claims): CandidateSession,
    WithRejection(Json(form), _): JsonBody<ApplicationForm>,
) -> Result<Response, AccountError> {
    let record = accounts.submit_application(&claims, form)?;
    let payload = json!({
        "message": "Application submitted successfully",
        "user": record.view(),
    });
    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

pub(crate) async fn update_handler(
    State(accounts): State<Arc<AccountService>>,
    CandidateSession(claims): CandidateSession,
    WithRejection(Json(form), _): JsonBody<ApplicationForm>,
) -> Result<Response, AccountError> {
    let record = accounts.update_application(&claims, form)?;
    let payload = json!({
        "message": "Application updated successfully",
        "user": record.view(),
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}
