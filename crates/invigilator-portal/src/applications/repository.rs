use super::domain::{ApplicationRecord, ApplicationStatus, RecordId};
use super::master_sheet::{MasterSheetRecord, ProjectionKey};

/// Storage abstraction for candidate application documents.
pub trait ApplicationRepository: Send + Sync {
    /// Fails with `Conflict` when the id or the email is already taken.
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &RecordId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn all(&self) -> Result<Vec<ApplicationRecord>, RepositoryError>;
    /// Write a new status and return the updated document, or `None` for an unknown id.
    fn set_status(
        &self,
        id: &RecordId,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationRecord>, RepositoryError>;
    /// Overwrite the status of every document, returning how many were touched.
    fn set_all_statuses(&self, status: ApplicationStatus) -> Result<usize, RepositoryError>;
    fn delete(&self, id: &RecordId) -> Result<Option<ApplicationRecord>, RepositoryError>;
}

/// How a projection key is compared against stored master-sheet rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMatch {
    /// Reference id, email and phone must all match the same row.
    All,
    /// Any one of reference id, email or phone matching counts.
    Any,
}

/// Storage abstraction for the master sheet of approved candidates.
pub trait MasterSheetRepository: Send + Sync {
    fn find(
        &self,
        key: &ProjectionKey,
        mode: KeyMatch,
    ) -> Result<Option<MasterSheetRecord>, RepositoryError>;
    fn insert(&self, record: MasterSheetRecord) -> Result<MasterSheetRecord, RepositoryError>;
    fn all(&self) -> Result<Vec<MasterSheetRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
