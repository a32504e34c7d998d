//! Thread-safe in-memory repositories backing the API binary, the demo command and the tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::applications::domain::{ApplicationRecord, ApplicationStatus, RecordId};
use crate::applications::master_sheet::{MasterSheetRecord, ProjectionKey};
use crate::applications::repository::{
    ApplicationRepository, KeyMatch, MasterSheetRepository, RepositoryError,
};
use crate::exam::domain::ExamConfiguration;
use crate::exam::repository::ExamConfigRepository;

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
}

#[derive(Default)]
pub struct MemoryApplications {
    records: Mutex<HashMap<RecordId, ApplicationRecord>>,
}

impl MemoryApplications {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ApplicationRepository for MemoryApplications {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let email_taken = guard
            .values()
            .any(|existing| existing.profile.email.eq_ignore_ascii_case(&record.profile.email));
        if guard.contains_key(&record.id) || email_taken {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        match guard.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &RecordId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.get(id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard
            .values()
            .find(|record| record.profile.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn all(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.values().cloned().collect())
    }

    fn set_status(
        &self,
        id: &RecordId,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let mut guard = lock(&self.records)?;
        Ok(guard.get_mut(id).map(|record| {
            record.status = Some(status);
            record.touch();
            record.clone()
        }))
    }

    fn set_all_statuses(&self, status: ApplicationStatus) -> Result<usize, RepositoryError> {
        let mut guard = lock(&self.records)?;
        for record in guard.values_mut() {
            record.status = Some(status);
            record.touch();
        }
        Ok(guard.len())
    }

    fn delete(&self, id: &RecordId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let mut guard = lock(&self.records)?;
        Ok(guard.remove(id))
    }
}

/// Master sheet rows in insertion order.
#[derive(Default)]
pub struct MemoryMasterSheet {
    rows: Mutex<Vec<MasterSheetRecord>>,
}

impl MemoryMasterSheet {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MasterSheetRepository for MemoryMasterSheet {
    fn find(
        &self,
        key: &ProjectionKey,
        mode: KeyMatch,
    ) -> Result<Option<MasterSheetRecord>, RepositoryError> {
        let guard = lock(&self.rows)?;
        Ok(guard.iter().find(|row| row.matches(key, mode)).cloned())
    }

    fn insert(&self, record: MasterSheetRecord) -> Result<MasterSheetRecord, RepositoryError> {
        let mut guard = lock(&self.rows)?;
        if guard.iter().any(|row| row.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn all(&self) -> Result<Vec<MasterSheetRecord>, RepositoryError> {
        let guard = lock(&self.rows)?;
        Ok(guard.clone())
    }
}

#[derive(Default)]
pub struct MemoryExamConfig {
    singleton: Mutex<Option<ExamConfiguration>>,
}

impl MemoryExamConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExamConfigRepository for MemoryExamConfig {
    fn current(&self) -> Result<Option<ExamConfiguration>, RepositoryError> {
        let guard = lock(&self.singleton)?;
        Ok(guard.clone())
    }

    fn replace(&self, config: ExamConfiguration) -> Result<ExamConfiguration, RepositoryError> {
        let mut guard = lock(&self.singleton)?;
        *guard = Some(config.clone());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::domain::{CandidateProfile, Role};
    use chrono::Utc;

    fn record(email: &str, phone: &str) -> ApplicationRecord {
        ApplicationRecord::new(
            CandidateProfile {
                email: email.to_string(),
                phone: phone.to_string(),
                ..CandidateProfile::default()
            },
            "hash".to_string(),
            Role::Candidate,
        )
    }

    #[test]
    fn duplicate_email_conflicts_case_insensitively() {
        let repository = MemoryApplications::new();
        repository
            .insert(record("lata@example.com", "9000000001"))
            .expect("first insert");
        let err = repository
            .insert(record("LATA@example.com", "9000000002"))
            .expect_err("duplicate email");
        assert!(matches!(err, RepositoryError::Conflict));
    }

    #[test]
    fn set_all_statuses_touches_every_record() {
        let repository = MemoryApplications::new();
        let first = repository
            .insert(record("a@example.com", "1"))
            .expect("insert");
        repository
            .insert(record("b@example.com", "2"))
            .expect("insert");

        let touched = repository
            .set_all_statuses(ApplicationStatus::Pending)
            .expect("reset");
        assert_eq!(touched, 2);
        let stored = repository.fetch(&first.id).expect("fetch").expect("present");
        assert_eq!(stored.status, Some(ApplicationStatus::Pending));
    }

    #[test]
    fn master_sheet_lookup_honours_match_mode() {
        let sheet = MemoryMasterSheet::new();
        let source = record("nina@example.com", "9000000003");
        sheet
            .insert(MasterSheetRecord::project(&source, Utc::now()))
            .expect("insert");

        let other = record("nina@example.com", "9111111111");
        let key = ProjectionKey::of(&other);
        assert!(sheet.find(&key, KeyMatch::All).expect("find").is_none());
        assert!(sheet.find(&key, KeyMatch::Any).expect("find").is_some());
    }
}
