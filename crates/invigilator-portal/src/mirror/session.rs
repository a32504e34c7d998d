use crate::accounts::{decode_auth_data, AuthData};
use crate::applications::domain::{ApplicationStatus, RecordId, Role};

/// Who the client believes is signed in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub authenticated: bool,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Role,
    pub user_id: Option<RecordId>,
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    LoggedIn(AuthData),
    LoggedOut,
    /// Stored cookie values found at startup.
    Restored {
        token: Option<String>,
        auth_data: Option<String>,
    },
}

impl SessionState {
    fn signed_in(data: AuthData) -> Self {
        Self {
            authenticated: true,
            email: Some(data.email),
            name: Some(data.name),
            role: data.role,
            user_id: Some(data.id),
            status: data.status,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.authenticated && self.role == Role::Admin
    }

    pub fn reduce(&mut self, action: SessionAction) {
        *self = match action {
            SessionAction::LoggedIn(data) => Self::signed_in(data),
            SessionAction::LoggedOut => Self::default(),
            SessionAction::Restored {
                token: Some(token),
                auth_data: Some(raw),
            } if !token.is_empty() => match decode_auth_data(&raw) {
                Some(data) => Self::signed_in(data),
                None => Self::default(),
            },
            SessionAction::Restored { .. } => Self::default(),
        };
    }
}
