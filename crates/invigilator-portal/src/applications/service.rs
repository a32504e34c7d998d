use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::completeness::{complete_sorted, missing_projection_fields, ProjectionField};
use super::domain::{ApplicationRecord, ApplicationStatus, RecordId};
use super::master_sheet::{write_csv, MasterSheetExportError, MasterSheetRecord, ProjectionKey};
use super::repository::{
    ApplicationRepository, KeyMatch, MasterSheetRepository, RepositoryError,
};

/// Admin review workflow: status changes, deletion and the master-sheet projection.
pub struct ReviewService {
    applications: Arc<dyn ApplicationRepository>,
    master_sheet: Arc<dyn MasterSheetRepository>,
}

/// Result of projecting an approved application into the master sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionOutcome {
    Inserted(MasterSheetRecord),
    AlreadyPresent,
}

/// Updated record plus the projection outcome when the new status was `approve`.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub record: ApplicationRecord,
    pub projection: Option<ProjectionOutcome>,
}

impl StatusChange {
    pub fn message(&self) -> String {
        let name = &self.record.profile.name;
        match &self.projection {
            Some(ProjectionOutcome::Inserted(_)) => {
                format!("{name} approved and added to master sheet!")
            }
            Some(ProjectionOutcome::AlreadyPresent) => {
                format!("{name} already in master sheet, approved!")
            }
            None => match self.record.status {
                Some(status) => format!("Status updated to {status}"),
                None => "Status updated".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulateSummary {
    pub inserted: Vec<MasterSheetRecord>,
    pub already_present: usize,
    pub skipped: Vec<RecordId>,
}

impl PopulateSummary {
    pub fn message(&self) -> String {
        format!(
            "{} added to master sheet, {} already present, {} skipped",
            self.inserted.len(),
            self.already_present,
            self.skipped.len()
        )
    }
}

impl ReviewService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        master_sheet: Arc<dyn MasterSheetRepository>,
    ) -> Self {
        Self {
            applications,
            master_sheet,
        }
    }

    pub fn parse_id(raw: &str) -> Result<RecordId, ReviewError> {
        RecordId::parse(raw).ok_or_else(|| ReviewError::InvalidId(raw.to_string()))
    }

    pub fn parse_status(raw: &str) -> Result<ApplicationStatus, ReviewError> {
        ApplicationStatus::parse(raw).ok_or_else(|| ReviewError::InvalidStatus(raw.to_string()))
    }

    /// Complete applications, most recently updated first.
    pub fn list_complete(&self) -> Result<Vec<ApplicationRecord>, ReviewError> {
        Ok(complete_sorted(self.applications.all()?))
    }

    pub fn get(&self, id: &RecordId) -> Result<ApplicationRecord, ReviewError> {
        self.applications.fetch(id)?.ok_or(ReviewError::NotFound)
    }

    /// Write `status` and, for approvals, project the record into the master sheet.
    ///
    /// The status write happens first. A projection failure leaves the application approved
    /// without a master-sheet row.
    pub fn set_status(
        &self,
        id: &RecordId,
        status: ApplicationStatus,
    ) -> Result<StatusChange, ReviewError> {
        let record = self
            .applications
            .set_status(id, status)?
            .ok_or(ReviewError::NotFound)?;
        info!(application = %id, status = %status, "application status updated");

        if status != ApplicationStatus::Approve {
            return Ok(StatusChange {
                record,
                projection: None,
            });
        }

        let projection = self.approve_and_project(id)?;
        let record = self.get(id)?;
        Ok(StatusChange {
            record,
            projection: Some(projection),
        })
    }

    /// Project an application into the master sheet unless a row with the same reference id,
    /// email and phone already exists.
    pub fn approve_and_project(&self, id: &RecordId) -> Result<ProjectionOutcome, ReviewError> {
        let record = self.get(id)?;

        let missing = missing_projection_fields(&record);
        if !missing.is_empty() {
            warn!(application = %id, "approval projection refused: required fields missing");
            return Err(ReviewError::IncompleteData(missing));
        }

        self.project(&record, KeyMatch::All)
    }

    fn project(
        &self,
        record: &ApplicationRecord,
        mode: KeyMatch,
    ) -> Result<ProjectionOutcome, ReviewError> {
        let key = ProjectionKey::of(record);
        if self.master_sheet.find(&key, mode)?.is_some() {
            info!(application = %record.id, "application already present in master sheet");
            return Ok(ProjectionOutcome::AlreadyPresent);
        }

        let row = self
            .master_sheet
            .insert(MasterSheetRecord::project(record, Utc::now()))?;
        info!(application = %record.id, row = %row.id, "application added to master sheet");
        Ok(ProjectionOutcome::Inserted(row))
    }

    /// Reset every application to pending, then return the complete ones.
    pub fn reset_all(&self) -> Result<Vec<ApplicationRecord>, ReviewError> {
        let touched = self.applications.set_all_statuses(ApplicationStatus::Pending)?;
        info!(count = touched, "application statuses reset to pending");
        self.list_complete()
    }

    /// Remove an application. Master-sheet rows derived from it are kept.
    pub fn delete_application(&self, id: &RecordId) -> Result<ApplicationRecord, ReviewError> {
        let removed = self.applications.delete(id)?.ok_or(ReviewError::NotFound)?;
        info!(application = %id, "application deleted");
        Ok(removed)
    }

    /// Project every approved application. Rows matching any identity field count as present.
    pub fn populate_master_sheet(&self) -> Result<PopulateSummary, ReviewError> {
        let approved: Vec<ApplicationRecord> = self
            .applications
            .all()?
            .into_iter()
            .filter(|record| record.status == Some(ApplicationStatus::Approve))
            .collect();
        if approved.is_empty() {
            return Err(ReviewError::NoApprovedUsers);
        }

        let mut summary = PopulateSummary::default();
        for record in approved {
            if !missing_projection_fields(&record).is_empty() {
                warn!(application = %record.id, "skipping incomplete approved application");
                summary.skipped.push(record.id.clone());
                continue;
            }
            match self.project(&record, KeyMatch::Any)? {
                ProjectionOutcome::Inserted(row) => summary.inserted.push(row),
                ProjectionOutcome::AlreadyPresent => summary.already_present += 1,
            }
        }

        info!(
            inserted = summary.inserted.len(),
            already_present = summary.already_present,
            skipped = summary.skipped.len(),
            "master sheet populated"
        );
        Ok(summary)
    }

    pub fn master_sheet(&self) -> Result<Vec<MasterSheetRecord>, ReviewError> {
        let rows = self.master_sheet.all()?;
        if rows.is_empty() {
            return Err(ReviewError::EmptyMasterSheet);
        }
        Ok(rows)
    }

    pub fn master_sheet_csv(&self) -> Result<Vec<u8>, ReviewError> {
        let rows = self.master_sheet()?;
        Ok(write_csv(&rows)?)
    }
}

/// Error raised by the review workflow.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("Invalid user ID: {0}")]
    InvalidId(String),
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
    #[error("User not found")]
    NotFound,
    #[error("User data incomplete: email, phone, sonOf, or resident missing")]
    IncompleteData(Vec<ProjectionField>),
    #[error("No approved users found")]
    NoApprovedUsers,
    #[error("No records found in master sheet")]
    EmptyMasterSheet,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] MasterSheetExportError),
}
