use super::domain::ExamConfiguration;
use crate::applications::repository::RepositoryError;

/// Storage for the singleton exam configuration. `replace` is an upsert.
pub trait ExamConfigRepository: Send + Sync {
    fn current(&self) -> Result<Option<ExamConfiguration>, RepositoryError>;
    fn replace(&self, config: ExamConfiguration) -> Result<ExamConfiguration, RepositoryError>;
}
