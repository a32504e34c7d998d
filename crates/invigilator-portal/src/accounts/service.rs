use std::sync::Arc;

use tracing::info;

use super::domain::{AuthData, LoginRequest, SignupRequest};
use super::password::{hash_password, verify_password, PasswordError};
use super::token::{Claims, TokenError, TokenIssuer};
use crate::applications::domain::{
    ApplicationForm, ApplicationRecord, ApplicationStatus, CandidateProfile, FormViolation, Role,
};
use crate::applications::repository::{ApplicationRepository, RepositoryError};
use crate::config::AdminSeed;

/// Candidate accounts: signup, login and self-service edits of the application form.
pub struct AccountService {
    applications: Arc<dyn ApplicationRepository>,
    tokens: Arc<TokenIssuer>,
}

/// Signed-in record together with its freshly issued token.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub record: ApplicationRecord,
    pub token: String,
}

impl LoginOutcome {
    pub fn auth_data(&self) -> AuthData {
        AuthData {
            email: self.record.profile.email.clone(),
            name: self.record.profile.name.clone(),
            role: self.record.role,
            id: self.record.id.clone(),
            token: self.token.clone(),
            status: self.record.status,
        }
    }
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

impl AccountService {
    pub fn new(applications: Arc<dyn ApplicationRepository>, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            applications,
            tokens,
        }
    }

    pub fn signup(&self, request: SignupRequest) -> Result<ApplicationRecord, AccountError> {
        let (Some(name), Some(email), Some(password)) = (
            present(request.profile.name.as_deref()),
            present(request.email.as_deref()),
            request.password.as_deref().filter(|value| !value.is_empty()),
        ) else {
            return Err(AccountError::MissingSignupFields);
        };
        request.profile.validate()?;

        let email = normalize_email(email);
        if self.applications.find_by_email(&email)?.is_some() {
            return Err(AccountError::DuplicateEmail);
        }

        let name = name.to_string();
        let password_hash = hash_password(password)?;
        let mut profile = CandidateProfile {
            email,
            ..CandidateProfile::default()
        };
        request.profile.apply_to(&mut profile);
        profile.name = name;

        let record = ApplicationRecord::new(profile, password_hash, Role::Candidate);
        let stored = self.applications.insert(record).map_err(|err| match err {
            RepositoryError::Conflict => AccountError::DuplicateEmail,
            other => AccountError::Repository(other),
        })?;
        info!(account = %stored.id, "candidate account created");
        Ok(stored)
    }

    pub fn login(&self, request: LoginRequest) -> Result<LoginOutcome, AccountError> {
        let (Some(email), Some(password)) = (
            present(request.email.as_deref()),
            request.password.as_deref().filter(|value| !value.is_empty()),
        ) else {
            return Err(AccountError::MissingCredentials);
        };

        let record = self
            .applications
            .find_by_email(&normalize_email(email))?
            .ok_or(AccountError::InvalidCredentials)?;
        if !verify_password(password, &record.password_hash)? {
            return Err(AccountError::InvalidCredentials);
        }

        let token = self.tokens.issue(&record)?;
        info!(account = %record.id, role = record.role.label(), "login succeeded");
        Ok(LoginOutcome { record, token })
    }

    pub fn profile(&self, claims: &Claims) -> Result<ApplicationRecord, AccountError> {
        self.applications
            .fetch(&claims.user_id)?
            .ok_or(AccountError::NotFound)
    }

    /// First submission of the application form. Only allowed while no status exists.
    pub fn submit_application(
        &self,
        claims: &Claims,
        form: ApplicationForm,
    ) -> Result<ApplicationRecord, AccountError> {
        form.validate()?;
        let mut record = self.profile(claims)?;
        if record.status.is_some() {
            return Err(AccountError::AlreadySubmitted);
        }

        self.store_form(&mut record, form)?;
        info!(account = %record.id, "application submitted");
        Ok(record)
    }

    /// Edit a submitted form. Approved forms are locked; any edit returns the form to review.
    pub fn update_application(
        &self,
        claims: &Claims,
        form: ApplicationForm,
    ) -> Result<ApplicationRecord, AccountError> {
        form.validate()?;
        let mut record = self.profile(claims)?;
        match record.status {
            Some(ApplicationStatus::Pending) | Some(ApplicationStatus::Reject) => {}
            Some(ApplicationStatus::Approve) => return Err(AccountError::Locked),
            None => return Err(AccountError::NotSubmitted),
        }

        self.store_form(&mut record, form)?;
        info!(account = %record.id, "application updated and returned to review");
        Ok(record)
    }

    fn store_form(
        &self,
        record: &mut ApplicationRecord,
        form: ApplicationForm,
    ) -> Result<(), AccountError> {
        form.apply_to(&mut record.profile);
        record.status = Some(ApplicationStatus::Pending);
        record.touch();
        self.applications.update(record.clone()).map_err(|err| match err {
            RepositoryError::NotFound => AccountError::NotFound,
            other => AccountError::Repository(other),
        })
    }

    /// Create the configured administrator unless an account with that email exists.
    pub fn seed_admin(&self, seed: &AdminSeed) -> Result<bool, AccountError> {
        let email = normalize_email(&seed.email);
        if self.applications.find_by_email(&email)?.is_some() {
            return Ok(false);
        }

        let profile = CandidateProfile {
            name: "Administrator".to_string(),
            email,
            ..CandidateProfile::default()
        };
        let record = ApplicationRecord::new(profile, hash_password(&seed.password)?, Role::Admin);
        let stored = self.applications.insert(record)?;
        info!(account = %stored.id, "administrator account seeded");
        Ok(true)
    }
}

/// Error raised by account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Name, email, and password are required.")]
    MissingSignupFields,
    #[error("Email and password are required.")]
    MissingCredentials,
    #[error("A user with this email already exists.")]
    DuplicateEmail,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    NotFound,
    #[error("Application already submitted. Edit it instead.")]
    AlreadySubmitted,
    #[error("No submitted application to edit.")]
    NotSubmitted,
    #[error("Your application has been approved. Please contact the admin to make changes.")]
    Locked,
    #[error(transparent)]
    Invalid(#[from] FormViolation),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("failed to encode session data: {0}")]
    SessionData(#[from] serde_json::Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
