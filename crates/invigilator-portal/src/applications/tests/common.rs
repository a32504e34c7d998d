use std::path::PathBuf;
use std::sync::Arc;

use axum::response::Response;
use chrono::{Duration, Utc};
use serde_json::Value;

use crate::accounts::{Claims, TokenIssuer};
use crate::applications::domain::{
    ApplicationRecord, ApplicationStatus, CandidateProfile, RecordId, Role,
};
use crate::applications::master_sheet::{MasterSheetRecord, ProjectionKey};
use crate::applications::repository::{
    ApplicationRepository, KeyMatch, MasterSheetRepository, RepositoryError,
};
use crate::applications::ReviewService;
use crate::export::{PageGeometry, PdfSettings};
use crate::memory::{MemoryApplications, MemoryExamConfig, MemoryMasterSheet};
use crate::state::PortalState;

pub(super) const SECRET: &str = "review-tests-secret";

pub(super) fn complete_profile(name: &str, phone: &str) -> CandidateProfile {
    CandidateProfile {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_ascii_lowercase()),
        dob: "1994-06-02".to_string(),
        phone: phone.to_string(),
        address: "44 Lake View, Indore".to_string(),
        exam_city_preference_1: "Indore".to_string(),
        exam_city_preference_2: "Bhopal".to_string(),
        aadhaar_no: "567856785678".to_string(),
        photo: "https://cdn.example.com/photo.jpg".to_string(),
        signature: "https://cdn.example.com/signature.jpg".to_string(),
        penalty_clause_agreement: true,
        covid_declaration_agreement: true,
        son_of: "Suresh".to_string(),
        resident: "Indore".to_string(),
        ..CandidateProfile::default()
    }
}

pub(super) fn build_service() -> (
    ReviewService,
    Arc<MemoryApplications>,
    Arc<MemoryMasterSheet>,
) {
    let applications = Arc::new(MemoryApplications::new());
    let master_sheet = Arc::new(MemoryMasterSheet::new());
    let service = ReviewService::new(applications.clone(), master_sheet.clone());
    (service, applications, master_sheet)
}

pub(super) fn seed(
    applications: &MemoryApplications,
    profile: CandidateProfile,
    status: Option<ApplicationStatus>,
) -> RecordId {
    let mut record = ApplicationRecord::new(profile, "hash".to_string(), Role::Candidate);
    record.status = status;
    applications.insert(record).expect("seed insert").id
}

pub(super) fn portal_state(
    applications: Arc<dyn ApplicationRepository>,
    master_sheet: Arc<dyn MasterSheetRepository>,
) -> PortalState {
    PortalState::with_repositories(
        applications,
        master_sheet,
        Arc::new(MemoryExamConfig::new()),
        Arc::new(TokenIssuer::new(SECRET, 7)),
        PdfSettings {
            font_dir: PathBuf::from("./fonts"),
            font_family: "LiberationSans".to_string(),
            geometry: PageGeometry::A4,
            upload_limit_bytes: 32 * 1024 * 1024,
        },
    )
}

pub(super) fn claims(role: Role) -> Claims {
    let now = Utc::now();
    Claims {
        user_id: RecordId::generate(),
        email: format!("{}@example.com", role.label()),
        role,
        status: None,
        iat: now.timestamp(),
        exp: (now + Duration::days(1)).timestamp(),
    }
}

pub(super) fn bearer(role: Role) -> String {
    let record = ApplicationRecord::new(
        CandidateProfile {
            email: format!("{}@example.com", role.label()),
            ..CandidateProfile::default()
        },
        "hash".to_string(),
        role,
    );
    let token = TokenIssuer::new(SECRET, 7)
        .issue(&record)
        .expect("token issues");
    format!("Bearer {token}")
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ApplicationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &RecordId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_email(&self, _email: &str) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn set_status(
        &self,
        _id: &RecordId,
        _status: ApplicationStatus,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn set_all_statuses(&self, _status: ApplicationStatus) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &RecordId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Master sheet that accepts lookups but refuses writes.
pub(super) struct ReadOnlyMasterSheet;

impl MasterSheetRepository for ReadOnlyMasterSheet {
    fn find(
        &self,
        _key: &ProjectionKey,
        _mode: KeyMatch,
    ) -> Result<Option<MasterSheetRecord>, RepositoryError> {
        Ok(None)
    }

    fn insert(&self, _record: MasterSheetRecord) -> Result<MasterSheetRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn all(&self) -> Result<Vec<MasterSheetRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf8 body")
}
