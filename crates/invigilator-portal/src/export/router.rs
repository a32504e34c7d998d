use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde_json::json;

use super::raster::{SectionUpload, UploadedSectionRasterizer};
use super::service::{ExportError, ExportService, ExportedPdf};
use crate::accounts::{AdminSession, CandidateSession};
use crate::applications::domain::RecordId;
use crate::extract::JsonBody;
use crate::state::PortalState;

pub fn export_router(state: PortalState) -> Router {
    // Seven 2x section bitmaps arrive base64 encoded in one body.
    let upload_limit = DefaultBodyLimit::max(state.exports.upload_limit());
    Router::new()
        .route(
            "/api/v1/me/application/export/sections",
            get(own_sections_handler),
        )
        .route(
            "/api/v1/me/application/export",
            post(own_export_handler).layer(upload_limit),
        )
        .route(
            "/api/v1/admin/applications/:id/export/sections",
            get(sections_handler),
        )
        .route(
            "/api/v1/admin/applications/:id/export",
            post(export_handler).layer(upload_limit),
        )
        .with_state(state)
}

impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        let status = match &self {
            ExportError::NotFound => StatusCode::NOT_FOUND,
            ExportError::Raster(_) | ExportError::Layout(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ExportError::Pdf(_) | ExportError::Repository(_) | ExportError::Worker(_) => {
                tracing::error!(error = %self, "packet export failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to generate PDF" })),
                )
                    .into_response();
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

fn parse_id(raw: &str) -> Result<RecordId, Response> {
    RecordId::parse(raw).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Invalid user ID: {raw}") })),
        )
            .into_response()
    })
}

fn pdf_response(pdf: ExportedPdf) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", pdf.filename);
    let headers = [
        (header::CONTENT_TYPE, mime::APPLICATION_PDF.as_ref().to_string()),
        (header::CONTENT_DISPOSITION, disposition),
    ];
    (StatusCode::OK, headers, pdf.bytes).into_response()
}

async fn export_in_worker(
    exports: Arc<ExportService>,
    id: RecordId,
    upload: SectionUpload,
) -> Result<ExportedPdf, ExportError> {
    tokio::task::spawn_blocking(move || {
        exports.export(&id, &UploadedSectionRasterizer::new(upload))
    })
    .await
    .map_err(|err| ExportError::Worker(err.to_string()))?
}

pub(crate) async fn own_sections_handler(
    State(exports): State<Arc<ExportService>>,
    CandidateSession(claims): CandidateSession,
) -> Result<Response, ExportError> {
    let packet = exports.section_packet(&claims.user_id)?;
    Ok((StatusCode::OK, Json(packet)).into_response())
}

pub(crate) async fn own_export_handler(
    State(exports): State<Arc<ExportService>>,
    CandidateSession(claims): CandidateSession,
    WithRejection(Json(upload), _): JsonBody<SectionUpload>,
) -> Result<Response, ExportError> {
    let pdf = export_in_worker(exports, claims.user_id, upload).await?;
    Ok(pdf_response(pdf))
}

pub(crate) async fn sections_handler(
    State(exports): State<Arc<ExportService>>,
    _admin: AdminSession,
    Path(raw_id): Path<String>,
) -> Result<Response, ExportError> {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };
    let packet = exports.section_packet(&id)?;
    Ok((StatusCode::OK, Json(packet)).into_response())
}

pub(crate) async fn export_handler(
    State(exports): State<Arc<ExportService>>,
    _admin: AdminSession,
    Path(raw_id): Path<String>,
    WithRejection(Json(upload), _): JsonBody<SectionUpload>,
) -> Result<Response, ExportError> {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };
    let pdf = export_in_worker(exports, id, upload).await?;
    Ok(pdf_response(pdf))
}
