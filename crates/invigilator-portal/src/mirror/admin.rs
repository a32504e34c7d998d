use std::collections::BTreeSet;

use crate::applications::domain::{ApplicationStatus, ApplicationView, RecordId};
use crate::applications::master_sheet::MasterSheetRecord;

/// Local copy of the admin review screens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminState {
    pub users: Vec<ApplicationView>,
    pub master_sheet: Vec<MasterSheetRecord>,
    /// Applications with a status request in flight.
    pub loading_ids: BTreeSet<RecordId>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdminAction {
    UsersRequested,
    UsersFetched(Vec<ApplicationView>),
    MasterSheetFetched(Vec<MasterSheetRecord>),
    RequestFailed(String),
    StatusRequested {
        id: RecordId,
        status: ApplicationStatus,
    },
    StatusConfirmed {
        user: ApplicationView,
        master_sheet_row: Option<MasterSheetRecord>,
    },
    StatusRejected {
        id: RecordId,
        error: String,
    },
    DeleteRequested,
    DeleteConfirmed(RecordId),
    ResetRequested,
    ResetConfirmed(Vec<ApplicationView>),
}

impl AdminState {
    pub fn user(&self, id: &RecordId) -> Option<&ApplicationView> {
        self.users.iter().find(|user| &user.id == id)
    }

    pub fn is_loading(&self, id: &RecordId) -> bool {
        self.loading_ids.contains(id)
    }

    fn user_mut(&mut self, id: &RecordId) -> Option<&mut ApplicationView> {
        self.users.iter_mut().find(|user| &user.id == id)
    }

    /// Insert `row`, replacing a previously seen row with the same id.
    fn merge_master_sheet_row(&mut self, row: MasterSheetRecord) {
        match self
            .master_sheet
            .iter_mut()
            .find(|existing| existing.id == row.id)
        {
            Some(existing) => *existing = row,
            None => self.master_sheet.push(row),
        }
    }

    pub fn reduce(&mut self, action: AdminAction) {
        match action {
            AdminAction::UsersRequested
            | AdminAction::DeleteRequested
            | AdminAction::ResetRequested => {
                self.loading = true;
                self.error = None;
            }
            AdminAction::UsersFetched(users) | AdminAction::ResetConfirmed(users) => {
                self.loading = false;
                self.users = users;
            }
            AdminAction::MasterSheetFetched(rows) => {
                self.loading = false;
                self.master_sheet = rows;
            }
            AdminAction::RequestFailed(error) => {
                self.loading = false;
                self.error = Some(error);
            }
            AdminAction::StatusRequested { id, status } => {
                if let Some(user) = self.user_mut(&id) {
                    user.status = Some(status);
                }
                self.loading_ids.insert(id);
                self.error = None;
            }
            AdminAction::StatusConfirmed {
                user,
                master_sheet_row,
            } => {
                self.loading = false;
                self.loading_ids.remove(&user.id);
                if let Some(slot) = self.user_mut(&user.id) {
                    *slot = user;
                }
                if let Some(row) = master_sheet_row {
                    self.merge_master_sheet_row(row);
                }
            }
            AdminAction::StatusRejected { id, error } => {
                // Rejected updates fall back to pending, not to the previous status.
                self.loading = false;
                self.loading_ids.remove(&id);
                if let Some(user) = self.user_mut(&id) {
                    user.status = Some(ApplicationStatus::Pending);
                }
                self.error = Some(error);
            }
            AdminAction::DeleteConfirmed(id) => {
                self.loading = false;
                self.users.retain(|user| user.id != id);
                self.master_sheet.retain(|row| row.user_id != id);
            }
        }
    }
}
