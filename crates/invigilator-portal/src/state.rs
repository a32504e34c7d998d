use std::sync::Arc;

use axum::extract::FromRef;
use axum::Router;

use crate::accounts::{account_router, AccountService, TokenIssuer};
use crate::applications::{
    review_router, ApplicationRepository, MasterSheetRepository, ReviewService,
};
use crate::config::AppConfig;
use crate::exam::{exam_router, ExamConfigRepository, ExamService};
use crate::export::{export_router, ExportService, PdfSettings};
use crate::memory::{MemoryApplications, MemoryExamConfig, MemoryMasterSheet};

/// Services shared by every portal route. Handlers pull the piece they need through `FromRef`.
#[derive(Clone, FromRef)]
pub struct PortalState {
    pub reviews: Arc<ReviewService>,
    pub accounts: Arc<AccountService>,
    pub exams: Arc<ExamService>,
    pub exports: Arc<ExportService>,
    pub tokens: Arc<TokenIssuer>,
}

impl PortalState {
    /// Wire every service over fresh in-memory repositories.
    pub fn in_memory(config: &AppConfig) -> Self {
        let tokens = Arc::new(TokenIssuer::from_config(&config.auth));
        let pdf = PdfSettings::from_config(&config.export);
        Self::with_repositories(
            Arc::new(MemoryApplications::new()),
            Arc::new(MemoryMasterSheet::new()),
            Arc::new(MemoryExamConfig::new()),
            tokens,
            pdf,
        )
    }

    pub fn with_repositories(
        applications: Arc<dyn ApplicationRepository>,
        master_sheet: Arc<dyn MasterSheetRepository>,
        exam_config: Arc<dyn ExamConfigRepository>,
        tokens: Arc<TokenIssuer>,
        pdf: PdfSettings,
    ) -> Self {
        Self {
            reviews: Arc::new(ReviewService::new(applications.clone(), master_sheet)),
            accounts: Arc::new(AccountService::new(applications.clone(), tokens.clone())),
            exams: Arc::new(ExamService::new(exam_config.clone())),
            exports: Arc::new(ExportService::new(applications, exam_config, pdf)),
            tokens,
        }
    }
}

/// Every portal route: accounts, review workflow, exam configuration and export.
pub fn portal_router(state: PortalState) -> Router {
    Router::new()
        .merge(account_router(state.clone()))
        .merge(review_router(state.clone()))
        .merge(exam_router(state.clone()))
        .merge(export_router(state))
}
