use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::applications::domain::is_iso_date;

/// Key of the single stored exam configuration.
pub const EXAM_SINGLETON_KEY: &str = "singleton";

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The exam currently being staffed. Read by the application form and the agreement packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamConfiguration {
    pub key: String,
    pub exam_name: String,
    pub held_date: String,
    pub start_date: String,
    pub end_date: String,
    pub exam_count: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExamConfigRequest {
    pub exam_name: String,
    pub held_date: String,
    pub start_date: String,
    pub end_date: String,
    pub exam_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExamViolation {
    #[error("Exam name is required.")]
    MissingName,
    #[error("Held date must look like \"January 2026\".")]
    InvalidHeldDate,
    #[error("{0} must be a date in YYYY-MM-DD format.")]
    InvalidDate(&'static str),
    #[error("Exam count must be at least 1.")]
    InvalidExamCount,
}

/// `"Month YYYY"` with an English month name.
pub fn is_held_date(raw: &str) -> bool {
    let mut parts = raw.trim().split(' ').filter(|part| !part.is_empty());
    let (Some(month), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    MONTHS.contains(&month) && year.len() == 4 && year.chars().all(|c| c.is_ascii_digit())
}

impl ExamConfigRequest {
    pub fn validate(&self) -> Result<(), ExamViolation> {
        if self.exam_name.trim().is_empty() {
            return Err(ExamViolation::MissingName);
        }
        if !is_held_date(&self.held_date) {
            return Err(ExamViolation::InvalidHeldDate);
        }
        if !is_iso_date(self.start_date.trim()) {
            return Err(ExamViolation::InvalidDate("Start date"));
        }
        if !is_iso_date(self.end_date.trim()) {
            return Err(ExamViolation::InvalidDate("End date"));
        }
        if self.exam_count < 1 || self.exam_count > i64::from(u32::MAX) {
            return Err(ExamViolation::InvalidExamCount);
        }
        Ok(())
    }

    /// Build the stored configuration. Call `validate` first.
    pub fn into_configuration(self, created_at: DateTime<Utc>) -> ExamConfiguration {
        ExamConfiguration {
            key: EXAM_SINGLETON_KEY.to_string(),
            exam_name: self.exam_name.trim().to_string(),
            held_date: self.held_date.trim().to_string(),
            start_date: self.start_date.trim().to_string(),
            end_date: self.end_date.trim().to_string(),
            exam_count: u32::try_from(self.exam_count).unwrap_or(1),
            created_at,
        }
    }
}
