use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper shared by application and master-sheet records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Accepts canonical UUIDs in hyphenated or simple form.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Uuid::parse_str(trimmed)
            .ok()
            .map(|uuid| Self(uuid.simple().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review state of a submitted application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approve,
    Reject,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approve => "approve",
            ApplicationStatus::Reject => "reject",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "pending" => Some(Self::Pending),
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Candidate,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Admin => "admin",
        }
    }
}

fn answer_no() -> String {
    "No".to_string()
}

fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Candidate-editable portion of an application. Absent fields fall back to the portal defaults
/// here, at the serde boundary, so the workflow never deals with missing values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CandidateProfile {
    pub name: String,
    pub email: String,
    pub dob: String,
    pub phone: String,
    pub area: String,
    pub landmark: String,
    pub address: String,
    pub exam_city_preference_1: String,
    pub exam_city_preference_2: String,
    pub previous_cda_experience: String,
    pub cda_experience_years: String,
    pub cda_experience_role: String,
    pub photo: String,
    pub signature: String,
    pub thumbprint: String,
    pub aadhaar_no: String,
    pub penalty_clause_agreement: bool,
    pub fever: String,
    pub cough: String,
    pub breathlessness: String,
    pub sore_throat: String,
    pub other_symptoms: String,
    pub other_symptoms_details: String,
    pub close_contact: String,
    pub covid_declaration_agreement: bool,
    pub account_holder_name: String,
    pub bank_name: String,
    pub ifsc: String,
    pub branch: String,
    pub bank_account_no: String,
    pub current_date: String,
    pub son_of: String,
    pub resident: String,
}

impl Default for CandidateProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            dob: String::new(),
            phone: String::new(),
            area: String::new(),
            landmark: String::new(),
            address: String::new(),
            exam_city_preference_1: String::new(),
            exam_city_preference_2: String::new(),
            previous_cda_experience: answer_no(),
            cda_experience_years: String::new(),
            cda_experience_role: String::new(),
            photo: String::new(),
            signature: String::new(),
            thumbprint: String::new(),
            aadhaar_no: String::new(),
            penalty_clause_agreement: false,
            fever: answer_no(),
            cough: answer_no(),
            breathlessness: answer_no(),
            sore_throat: answer_no(),
            other_symptoms: answer_no(),
            other_symptoms_details: String::new(),
            close_contact: answer_no(),
            covid_declaration_agreement: false,
            account_holder_name: String::new(),
            bank_name: String::new(),
            ifsc: String::new(),
            branch: String::new(),
            bank_account_no: String::new(),
            current_date: today(),
            son_of: String::new(),
            resident: String::new(),
        }
    }
}

/// Form payload submitted by a candidate. Every field is optional; only supplied values are
/// written onto the stored profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationForm {
    pub name: Option<String>,
    pub dob: Option<String>,
    pub phone: Option<String>,
    pub area: Option<String>,
    pub landmark: Option<String>,
    pub address: Option<String>,
    pub exam_city_preference_1: Option<String>,
    pub exam_city_preference_2: Option<String>,
    pub previous_cda_experience: Option<String>,
    pub cda_experience_years: Option<String>,
    pub cda_experience_role: Option<String>,
    pub photo: Option<String>,
    pub signature: Option<String>,
    pub thumbprint: Option<String>,
    pub aadhaar_no: Option<String>,
    pub penalty_clause_agreement: Option<bool>,
    pub fever: Option<String>,
    pub cough: Option<String>,
    pub breathlessness: Option<String>,
    pub sore_throat: Option<String>,
    pub other_symptoms: Option<String>,
    pub other_symptoms_details: Option<String>,
    pub close_contact: Option<String>,
    pub covid_declaration_agreement: Option<bool>,
    pub account_holder_name: Option<String>,
    pub bank_name: Option<String>,
    pub ifsc: Option<String>,
    pub branch: Option<String>,
    pub bank_account_no: Option<String>,
    pub current_date: Option<String>,
    pub son_of: Option<String>,
    pub resident: Option<String>,
}

/// Field-level problems with a candidate form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormViolation {
    #[error("Aadhaar number must be exactly 12 digits")]
    InvalidAadhaar,
    #[error("Invalid date format. Use YYYY-MM-DD.")]
    InvalidCurrentDate,
}

impl ApplicationForm {
    pub fn validate(&self) -> Result<(), FormViolation> {
        if let Some(aadhaar) = self.aadhaar_no.as_deref() {
            let aadhaar = aadhaar.trim();
            let valid = aadhaar.len() == 12 && aadhaar.chars().all(|c| c.is_ascii_digit());
            if !aadhaar.is_empty() && !valid {
                return Err(FormViolation::InvalidAadhaar);
            }
        }

        if let Some(date) = self.current_date.as_deref() {
            if !date.is_empty() && !is_iso_date(date) {
                return Err(FormViolation::InvalidCurrentDate);
            }
        }

        Ok(())
    }

    /// Copy the supplied values onto `profile`, leaving omitted fields untouched.
    pub fn apply_to(self, profile: &mut CandidateProfile) {
        fn set<T>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        set(&mut profile.name, self.name);
        set(&mut profile.dob, self.dob);
        set(&mut profile.phone, self.phone);
        set(&mut profile.area, self.area);
        set(&mut profile.landmark, self.landmark);
        set(&mut profile.address, self.address);
        set(&mut profile.exam_city_preference_1, self.exam_city_preference_1);
        set(&mut profile.exam_city_preference_2, self.exam_city_preference_2);
        set(&mut profile.previous_cda_experience, self.previous_cda_experience);
        set(&mut profile.cda_experience_years, self.cda_experience_years);
        set(&mut profile.cda_experience_role, self.cda_experience_role);
        set(&mut profile.photo, self.photo);
        set(&mut profile.signature, self.signature);
        set(&mut profile.thumbprint, self.thumbprint);
        set(&mut profile.aadhaar_no, self.aadhaar_no);
        set(&mut profile.penalty_clause_agreement, self.penalty_clause_agreement);
        set(&mut profile.fever, self.fever);
        set(&mut profile.cough, self.cough);
        set(&mut profile.breathlessness, self.breathlessness);
        set(&mut profile.sore_throat, self.sore_throat);
        set(&mut profile.other_symptoms, self.other_symptoms);
        set(&mut profile.other_symptoms_details, self.other_symptoms_details);
        set(&mut profile.close_contact, self.close_contact);
        set(
            &mut profile.covid_declaration_agreement,
            self.covid_declaration_agreement,
        );
        set(&mut profile.account_holder_name, self.account_holder_name);
        set(&mut profile.bank_name, self.bank_name);
        set(&mut profile.ifsc, self.ifsc);
        set(&mut profile.branch, self.branch);
        set(&mut profile.bank_account_no, self.bank_account_no);
        set(&mut profile.current_date, self.current_date);
        set(&mut profile.son_of, self.son_of);
        set(&mut profile.resident, self.resident);
    }
}

pub(crate) fn is_iso_date(raw: &str) -> bool {
    raw.len() == 10 && NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
}

/// Stored application document: account credentials, the candidate profile and review state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub profile: CandidateProfile,
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRecord {
    pub fn new(profile: CandidateProfile, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::generate(),
            profile,
            password_hash,
            role,
            status: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Public representation with credentials removed.
    pub fn view(&self) -> ApplicationView {
        ApplicationView {
            id: self.id.clone(),
            profile: self.profile.clone(),
            role: self.role,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Application as returned over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub id: RecordId,
    #[serde(flatten)]
    pub profile: CandidateProfile,
    pub role: Role,
    pub status: Option<ApplicationStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
