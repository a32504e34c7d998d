use serde::{Deserialize, Serialize};

use crate::applications::domain::{ApplicationForm, ApplicationStatus, RecordId, Role};

/// Signup payload. Profile fields beyond the credentials are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(flatten)]
    pub profile: ApplicationForm,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub token: String,
}

/// Client-readable session summary stored in the `authData` cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthData {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub id: RecordId,
    pub token: String,
    pub status: Option<ApplicationStatus>,
}
