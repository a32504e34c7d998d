use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::json;

use super::domain::ApplicationView;
use super::service::{ReviewError, ReviewService};
use crate::accounts::AdminSession;
use crate::extract::JsonBody;
use crate::state::PortalState;

/// Admin review endpoints over applications and the master sheet.
pub fn review_router(state: PortalState) -> Router {
    Router::new()
        .route("/api/v1/admin/applications", get(list_handler))
        .route(
            "/api/v1/admin/applications/reset-statuses",
            put(reset_handler),
        )
        .route(
            "/api/v1/admin/applications/:id",
            get(get_handler).delete(delete_handler),
        )
        .route(
            "/api/v1/admin/applications/:id/status",
            put(status_handler),
        )
        .route(
            "/api/v1/admin/master-sheet",
            get(master_sheet_handler).post(populate_handler),
        )
        .route(
            "/api/v1/admin/master-sheet/export",
            get(master_sheet_csv_handler),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub status: String,
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        let status = match &self {
            ReviewError::InvalidId(_)
            | ReviewError::InvalidStatus(_)
            | ReviewError::IncompleteData(_) => StatusCode::BAD_REQUEST,
            ReviewError::NotFound
            | ReviewError::NoApprovedUsers
            | ReviewError::EmptyMasterSheet => StatusCode::NOT_FOUND,
            ReviewError::Repository(_) | ReviewError::Export(_) => {
                tracing::error!(error = %self, "review operation failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response();
            }
        };

        let mut payload = json!({ "error": self.to_string() });
        if let ReviewError::IncompleteData(fields) = &self {
            let missing: Vec<&str> = fields.iter().map(|field| field.label()).collect();
            payload["missing"] = json!(missing);
        }
        (status, Json(payload)).into_response()
    }
}

fn views(records: &[super::domain::ApplicationRecord]) -> Vec<ApplicationView> {
    records.iter().map(|record| record.view()).collect()
}

pub(crate) async fn list_handler(
    State(reviews): State<Arc<ReviewService>>,
    _admin: AdminSession,
) -> Result<Response, ReviewError> {
    let records = reviews.list_complete()?;
    Ok((StatusCode::OK, Json(views(&records))).into_response())
}

pub(crate) async fn get_handler(
    State(reviews): State<Arc<ReviewService>>,
    _admin: AdminSession,
    Path(raw_id): Path<String>,
) -> Result<Response, ReviewError> {
    let id = ReviewService::parse_id(&raw_id)?;
    let record = reviews.get(&id)?;
    Ok((StatusCode::OK, Json(record.view())).into_response())
}

pub(crate) async fn status_handler(
    State(reviews): State<Arc<ReviewService>>,
    _admin: AdminSession,
    Path(raw_id): Path<String>,
    WithRejection(Json(request), _): JsonBody<StatusRequest>,
) -> Result<Response, ReviewError> {
    let id = ReviewService::parse_id(&raw_id)?;
    let status = ReviewService::parse_status(&request.status)?;
    let change = reviews.set_status(&id, status)?;
    let payload = json!({
        "message": change.message(),
        "user": change.record.view(),
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn delete_handler(
    State(reviews): State<Arc<ReviewService>>,
    _admin: AdminSession,
    Path(raw_id): Path<String>,
) -> Result<Response, ReviewError> {
    let id = ReviewService::parse_id(&raw_id)?;
    let removed = reviews.delete_application(&id)?;
    let payload = json!({
        "message": "User deleted successfully",
        "id": removed.id,
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn reset_handler(
    State(reviews): State<Arc<ReviewService>>,
    _admin: AdminSession,
) -> Result<Response, ReviewError> {
    let records = reviews.reset_all()?;
    let payload = json!({
        "message": "All statuses reset to pending",
        "users": views(&records),
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn populate_handler(
    State(reviews): State<Arc<ReviewService>>,
    _admin: AdminSession,
) -> Result<Response, ReviewError> {
    let summary = reviews.populate_master_sheet()?;
    let payload = json!({
        "message": summary.message(),
        "summary": summary,
    });
    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

pub(crate) async fn master_sheet_handler(
    State(reviews): State<Arc<ReviewService>>,
    _admin: AdminSession,
) -> Result<Response, ReviewError> {
    let rows = reviews.master_sheet()?;
    Ok((StatusCode::OK, Json(rows)).into_response())
}

pub(crate) async fn master_sheet_csv_handler(
    State(reviews): State<Arc<ReviewService>>,
    _admin: AdminSession,
) -> Result<Response, ReviewError> {
    let body = reviews.master_sheet_csv()?;
    let headers = [
        (header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.as_ref().to_string()),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"master-sheet.csv\"".to_string(),
        ),
    ];
    Ok((StatusCode::OK, headers, body).into_response())
}
