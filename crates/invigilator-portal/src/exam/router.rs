use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde_json::json;

use super::domain::ExamConfigRequest;
use super::service::{ExamError, ExamService};
use crate::accounts::AdminSession;
use crate::extract::JsonBody;
use crate::state::PortalState;

pub fn exam_router(state: PortalState) -> Router {
    Router::new()
        .route("/api/v1/exam", get(current_handler))
        .route("/api/v1/admin/exam", put(replace_handler))
        .with_state(state)
}

impl IntoResponse for ExamError {
    fn into_response(self) -> Response {
        let status = match &self {
            ExamError::NotConfigured => StatusCode::NOT_FOUND,
            ExamError::Invalid(_) => StatusCode::BAD_REQUEST,
            ExamError::Repository(err) => {
                tracing::error!(error = %err, "exam configuration storage failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response();
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub(crate) async fn current_handler(
    State(exams): State<Arc<ExamService>>,
) -> Result<Response, ExamError> {
    let config = exams.current()?.ok_or(ExamError::NotConfigured)?;
    Ok((StatusCode::OK, Json(config)).into_response())
}

pub(crate) async fn replace_handler(
    State(exams): State<Arc<ExamService>>,
    _admin: AdminSession,
    WithRejection(Json(request), _): JsonBody<ExamConfigRequest>,
) -> Result<Response, ExamError> {
    let config = exams.replace(request)?;
    let payload = json!({
        "message": "Exam configuration saved",
        "exam": config,
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}
