use super::admin::{AdminAction, AdminState};
use crate::applications::domain::{ApplicationStatus, ApplicationView, RecordId};
use crate::applications::master_sheet::MasterSheetRecord;
use crate::applications::service::{ProjectionOutcome, ReviewError, ReviewService};

/// Server response to a status change as the admin screens consume it.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub user: ApplicationView,
    /// Present when the approval created a new master-sheet row.
    pub master_sheet_row: Option<MasterSheetRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl From<ReviewError> for BackendError {
    fn from(err: ReviewError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// The review API as seen from the admin screens.
pub trait ReviewBackend {
    fn list_users(&self) -> Result<Vec<ApplicationView>, BackendError>;
    fn master_sheet_rows(&self) -> Result<Vec<MasterSheetRecord>, BackendError>;
    fn update_status(
        &self,
        id: &RecordId,
        status: ApplicationStatus,
    ) -> Result<StatusUpdate, BackendError>;
    fn delete_user(&self, id: &RecordId) -> Result<RecordId, BackendError>;
    fn reset_statuses(&self) -> Result<Vec<ApplicationView>, BackendError>;
}

impl ReviewBackend for ReviewService {
    fn list_users(&self) -> Result<Vec<ApplicationView>, BackendError> {
        let records = self.list_complete()?;
        Ok(records.iter().map(|record| record.view()).collect())
    }

    fn master_sheet_rows(&self) -> Result<Vec<MasterSheetRecord>, BackendError> {
        match self.master_sheet() {
            Ok(rows) => Ok(rows),
            Err(ReviewError::EmptyMasterSheet) => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn update_status(
        &self,
        id: &RecordId,
        status: ApplicationStatus,
    ) -> Result<StatusUpdate, BackendError> {
        let change = self.set_status(id, status)?;
        let master_sheet_row = match change.projection {
            Some(ProjectionOutcome::Inserted(row)) => Some(row),
            Some(ProjectionOutcome::AlreadyPresent) | None => None,
        };
        Ok(StatusUpdate {
            user: change.record.view(),
            master_sheet_row,
        })
    }

    fn delete_user(&self, id: &RecordId) -> Result<RecordId, BackendError> {
        Ok(self.delete_application(id)?.id)
    }

    fn reset_statuses(&self) -> Result<Vec<ApplicationView>, BackendError> {
        let records = self.reset_all()?;
        Ok(records.iter().map(|record| record.view()).collect())
    }
}

/// Drives one status change: optimistic update, backend call, then confirm or roll back.
pub struct StatusUpdateFlow<'a, B: ReviewBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: ReviewBackend + ?Sized> StatusUpdateFlow<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    pub fn begin(id: &RecordId, status: ApplicationStatus) -> AdminAction {
        AdminAction::StatusRequested {
            id: id.clone(),
            status,
        }
    }

    pub fn settle(id: &RecordId, result: &Result<StatusUpdate, BackendError>) -> AdminAction {
        match result {
            Ok(update) => AdminAction::StatusConfirmed {
                user: update.user.clone(),
                master_sheet_row: update.master_sheet_row.clone(),
            },
            Err(err) => AdminAction::StatusRejected {
                id: id.clone(),
                error: err.message.clone(),
            },
        }
    }

    pub fn run(
        &self,
        state: &mut AdminState,
        id: &RecordId,
        status: ApplicationStatus,
    ) -> Result<StatusUpdate, BackendError> {
        state.reduce(Self::begin(id, status));
        let result = self.backend.update_status(id, status);
        state.reduce(Self::settle(id, &result));
        result
    }
}

/// Remaining admin round trips: loading, deletion and bulk reset.
pub struct AdminSync<'a, B: ReviewBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: ReviewBackend + ?Sized> AdminSync<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    pub fn refresh(&self, state: &mut AdminState) {
        state.reduce(AdminAction::UsersRequested);
        match self.backend.list_users() {
            Ok(users) => state.reduce(AdminAction::UsersFetched(users)),
            Err(err) => return state.reduce(AdminAction::RequestFailed(err.message)),
        }
        match self.backend.master_sheet_rows() {
            Ok(rows) => state.reduce(AdminAction::MasterSheetFetched(rows)),
            Err(err) => state.reduce(AdminAction::RequestFailed(err.message)),
        }
    }

    pub fn delete(&self, state: &mut AdminState, id: &RecordId) {
        state.reduce(AdminAction::DeleteRequested);
        match self.backend.delete_user(id) {
            Ok(removed) => state.reduce(AdminAction::DeleteConfirmed(removed)),
            Err(err) => state.reduce(AdminAction::RequestFailed(err.message)),
        }
    }

    pub fn reset(&self, state: &mut AdminState) {
        state.reduce(AdminAction::ResetRequested);
        match self.backend.reset_statuses() {
            Ok(users) => state.reduce(AdminAction::ResetConfirmed(users)),
            Err(err) => state.reduce(AdminAction::RequestFailed(err.message)),
        }
    }
}
