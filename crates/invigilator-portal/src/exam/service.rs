use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{ExamConfigRequest, ExamConfiguration, ExamViolation};
use super::repository::ExamConfigRepository;
use crate::applications::repository::RepositoryError;

pub struct ExamService {
    repository: Arc<dyn ExamConfigRepository>,
}

impl ExamService {
    pub fn new(repository: Arc<dyn ExamConfigRepository>) -> Self {
        Self { repository }
    }

    pub fn current(&self) -> Result<Option<ExamConfiguration>, ExamError> {
        Ok(self.repository.current()?)
    }

    /// Validate and replace the singleton wholesale.
    pub fn replace(&self, request: ExamConfigRequest) -> Result<ExamConfiguration, ExamError> {
        request.validate()?;
        let stored = self
            .repository
            .replace(request.into_configuration(Utc::now()))?;
        info!(exam = %stored.exam_name, held = %stored.held_date, "exam configuration replaced");
        Ok(stored)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExamError {
    #[error("Exam configuration not found")]
    NotConfigured,
    #[error(transparent)]
    Invalid(#[from] ExamViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
