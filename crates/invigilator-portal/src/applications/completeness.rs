use super::domain::{ApplicationRecord, CandidateProfile};

/// Fields the master sheet cannot be projected without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionField {
    Email,
    Phone,
    SonOf,
    Resident,
}

impl ProjectionField {
    pub const fn label(self) -> &'static str {
        match self {
            ProjectionField::Email => "email",
            ProjectionField::Phone => "phone",
            ProjectionField::SonOf => "sonOf",
            ProjectionField::Resident => "resident",
        }
    }
}

// Only an empty string is missing; whitespace is stored as the candidate typed it.
fn filled(value: &str) -> bool {
    !value.is_empty()
}

/// Whether an application counts as a finished submission for the admin listing: all mandatory
/// fields populated and both declarations agreed.
pub fn is_complete(profile: &CandidateProfile) -> bool {
    [
        profile.name.as_str(),
        profile.email.as_str(),
        profile.aadhaar_no.as_str(),
        profile.phone.as_str(),
        profile.address.as_str(),
        profile.exam_city_preference_1.as_str(),
        profile.photo.as_str(),
        profile.signature.as_str(),
    ]
    .iter()
    .all(|value| filled(value))
        && profile.penalty_clause_agreement
        && profile.covid_declaration_agreement
}

pub fn missing_projection_fields(record: &ApplicationRecord) -> Vec<ProjectionField> {
    let profile = &record.profile;
    let mut missing = Vec::new();
    if !filled(&profile.email) {
        missing.push(ProjectionField::Email);
    }
    if !filled(&profile.phone) {
        missing.push(ProjectionField::Phone);
    }
    if !filled(&profile.son_of) {
        missing.push(ProjectionField::SonOf);
    }
    if !filled(&profile.resident) {
        missing.push(ProjectionField::Resident);
    }
    missing
}

/// Complete applications, most recently updated first.
pub fn complete_sorted(mut records: Vec<ApplicationRecord>) -> Vec<ApplicationRecord> {
    records.retain(|record| is_complete(&record.profile));
    records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    records
}
