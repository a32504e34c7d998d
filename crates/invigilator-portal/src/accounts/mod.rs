//! Candidate and administrator accounts, session tokens and the route guards built on them.

pub mod domain;
pub mod guard;
pub mod password;
pub mod router;
pub mod service;
pub mod token;

/// Cookie carrying the signed session token.
pub const TOKEN_COOKIE: &str = "token";
/// Cookie carrying the client-readable session summary.
pub const AUTH_DATA_COOKIE: &str = "authData";

pub use domain::{AuthData, LoginRequest, LoginResponse, SignupRequest};
pub use guard::{AdminSession, AuthError, CandidateSession, Session};
pub use router::{account_router, decode_auth_data, encode_auth_data};
pub use service::{AccountError, AccountService, LoginOutcome};
pub use token::{Claims, TokenError, TokenIssuer};
