//! Candidate applications and the admin review workflow.
//!
//! Approving an application projects it into the master sheet of approved candidates. The
//! projection is keyed by reference id, email and phone and is not undone when an application
//! is later rejected or deleted.

pub(crate) mod completeness;
pub mod domain;
pub mod master_sheet;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use completeness::{is_complete, ProjectionField};
pub use domain::{
    ApplicationForm, ApplicationRecord, ApplicationStatus, ApplicationView, CandidateProfile,
    FormViolation, RecordId, Role,
};
pub use master_sheet::{MasterSheetRecord, ProjectionKey};
pub use repository::{ApplicationRepository, KeyMatch, MasterSheetRepository, RepositoryError};
pub use router::review_router;
pub use service::{PopulateSummary, ProjectionOutcome, ReviewError, ReviewService, StatusChange};
