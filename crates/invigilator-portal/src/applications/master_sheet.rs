use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationRecord, ApplicationStatus, CandidateProfile, RecordId, Role};
use super::repository::KeyMatch;

/// Identity fields a projection is keyed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionKey {
    pub user_id: RecordId,
    pub email: String,
    pub phone: String,
}

impl ProjectionKey {
    pub fn of(record: &ApplicationRecord) -> Self {
        Self {
            user_id: record.id.clone(),
            email: record.profile.email.clone(),
            phone: record.profile.phone.clone(),
        }
    }
}

/// Denormalized copy of an approved application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterSheetRecord {
    pub id: RecordId,
    pub user_id: RecordId,
    #[serde(flatten)]
    pub profile: CandidateProfile,
    pub role: Role,
    pub status: ApplicationStatus,
    pub approved_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl MasterSheetRecord {
    /// Project `record` as approved at `approved_at`.
    pub fn project(record: &ApplicationRecord, approved_at: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::generate(),
            user_id: record.id.clone(),
            profile: record.profile.clone(),
            role: record.role,
            status: record.status.unwrap_or(ApplicationStatus::Approve),
            approved_at,
            created_at: record.created_at,
        }
    }

    pub fn key(&self) -> ProjectionKey {
        ProjectionKey {
            user_id: self.user_id.clone(),
            email: self.profile.email.clone(),
            phone: self.profile.phone.clone(),
        }
    }

    pub fn matches(&self, key: &ProjectionKey, mode: KeyMatch) -> bool {
        let same_user = self.user_id == key.user_id;
        let same_email = self.profile.email == key.email;
        let same_phone = self.profile.phone == key.phone;
        match mode {
            KeyMatch::All => same_user && same_email && same_phone,
            KeyMatch::Any => same_user || same_email || same_phone,
        }
    }
}

const CSV_HEADER: [&str; 22] = [
    "id",
    "userId",
    "name",
    "email",
    "phone",
    "dob",
    "sonOf",
    "resident",
    "address",
    "area",
    "landmark",
    "aadhaarNo",
    "examCityPreference1",
    "examCityPreference2",
    "previousCdaExperience",
    "cdaExperienceYears",
    "cdaExperienceRole",
    "accountHolderName",
    "bankName",
    "ifsc",
    "bankAccountNo",
    "approvedAt",
];

#[derive(Debug, thiserror::Error)]
pub enum MasterSheetExportError {
    #[error("failed to write master sheet csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush master sheet csv: {0}")]
    Flush(String),
}

/// Render the master sheet as CSV, one row per approved candidate.
pub fn write_csv(records: &[MasterSheetRecord]) -> Result<Vec<u8>, MasterSheetExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for record in records {
        let profile = &record.profile;
        let approved_at = record.approved_at.to_rfc3339();
        writer.write_record([
            record.id.as_str(),
            record.user_id.as_str(),
            profile.name.as_str(),
            profile.email.as_str(),
            profile.phone.as_str(),
            profile.dob.as_str(),
            profile.son_of.as_str(),
            profile.resident.as_str(),
            profile.address.as_str(),
            profile.area.as_str(),
            profile.landmark.as_str(),
            profile.aadhaar_no.as_str(),
            profile.exam_city_preference_1.as_str(),
            profile.exam_city_preference_2.as_str(),
            profile.previous_cda_experience.as_str(),
            profile.cda_experience_years.as_str(),
            profile.cda_experience_role.as_str(),
            profile.account_holder_name.as_str(),
            profile.bank_name.as_str(),
            profile.ifsc.as_str(),
            profile.bank_account_no.as_str(),
            approved_at.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|err| MasterSheetExportError::Flush(err.to_string()))
}
