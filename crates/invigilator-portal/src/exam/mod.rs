//! Singleton exam configuration.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{ExamConfigRequest, ExamConfiguration, ExamViolation};
pub use repository::ExamConfigRepository;
pub use router::exam_router;
pub use service::{ExamError, ExamService};
