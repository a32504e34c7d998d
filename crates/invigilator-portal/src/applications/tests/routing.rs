use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use axum_extra::extract::WithRejection;
use std::marker::PhantomData;
use std::sync::Arc;
use tower::ServiceExt;

use crate::accounts::AdminSession;
use crate::applications::domain::{ApplicationStatus, RecordId, Role};
use crate::applications::repository::MasterSheetRepository;
use crate::applications::router::{
    get_handler, list_handler, status_handler, StatusRequest,
};
use crate::applications::{review_router, ReviewService};
use crate::extract::JsonBody;
use crate::memory::{MemoryApplications, MemoryMasterSheet};

fn admin() -> AdminSession {
    AdminSession(claims(Role::Admin))
}

fn status_request(status: &str) -> JsonBody<StatusRequest> {
    WithRejection(
        Json(StatusRequest {
            status: status.to_string(),
        }),
        PhantomData,
    )
}

#[tokio::test]
async fn status_handler_approves_and_reports_projection() {
    let (service, applications, master_sheet) = build_service();
    let id = seed(
        &applications,
        complete_profile("Pooja", "9000000201"),
        Some(ApplicationStatus::Pending),
    );

    let response = status_handler(
        State(Arc::new(service)),
        admin(),
        Path(id.to_string()),
        status_request("approve"),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["message"],
        "Pooja approved and added to master sheet!"
    );
    assert_eq!(payload["user"]["status"], "approve");
    assert!(payload["user"].get("passwordHash").is_none());
    assert_eq!(master_sheet.all().expect("rows").len(), 1);
}

#[tokio::test]
async fn status_handler_rejects_unknown_status_values() {
    let (service, applications, _) = build_service();
    let id = seed(&applications, complete_profile("Qadir", "9000000202"), None);

    let response = status_handler(
        State(Arc::new(service)),
        admin(),
        Path(id.to_string()),
        status_request("approved"),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "Invalid status: approved");
}

#[tokio::test]
async fn status_handler_lists_missing_projection_fields() {
    let (service, applications, _) = build_service();
    let mut profile = complete_profile("Rohan", "9000000203");
    profile.resident.clear();
    let id = seed(&applications, profile, Some(ApplicationStatus::Pending));

    let response = status_handler(
        State(Arc::new(service)),
        admin(),
        Path(id.to_string()),
        status_request("approve"),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["missing"], serde_json::json!(["resident"]));
}

#[tokio::test]
async fn get_handler_separates_malformed_and_unknown_ids() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);

    let malformed = get_handler(State(service.clone()), admin(), Path("abc".to_string()))
        .await
        .into_response();
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

    let unknown = get_handler(
        State(service),
        admin(),
        Path(RecordId::generate().to_string()),
    )
    .await
    .into_response();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(unknown).await;
    assert_eq!(payload["error"], "User not found");
}

#[tokio::test]
async fn list_handler_hides_repository_details() {
    let service = Arc::new(ReviewService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryMasterSheet::new()),
    ));

    let response = list_handler(State(service), admin()).await.into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "Internal server error");
}

#[tokio::test]
async fn admin_routes_require_admin_role() {
    let state = portal_state(
        Arc::new(MemoryApplications::new()),
        Arc::new(MemoryMasterSheet::new()),
    );

    let anonymous = review_router(state.clone())
        .oneshot(
            Request::get("/api/v1/admin/applications")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let candidate = review_router(state)
        .oneshot(
            Request::get("/api/v1/admin/applications")
                .header(header::AUTHORIZATION, bearer(Role::Candidate))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(candidate.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn populate_then_export_master_sheet_csv() {
    let applications = Arc::new(MemoryApplications::new());
    seed(
        &applications,
        complete_profile("Sneha", "9000000204"),
        Some(ApplicationStatus::Approve),
    );
    let state = portal_state(applications, Arc::new(MemoryMasterSheet::new()));
    let router = review_router(state);

    let populated = router
        .clone()
        .oneshot(
            Request::post("/api/v1/admin/master-sheet")
                .header(header::AUTHORIZATION, bearer(Role::Admin))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(populated.status(), StatusCode::CREATED);
    let payload = read_json_body(populated).await;
    assert_eq!(payload["summary"]["inserted"].as_array().map(Vec::len), Some(1));

    let exported = router
        .oneshot(
            Request::get("/api/v1/admin/master-sheet/export")
                .header(header::AUTHORIZATION, bearer(Role::Admin))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(exported.status(), StatusCode::OK);
    assert_eq!(
        exported.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let body = read_text_body(exported).await;
    assert!(body.starts_with("id,userId,name,email,phone"));
    assert!(body.contains("sneha@example.com"));
}

#[tokio::test]
async fn delete_and_reset_routes() {
    let applications = Arc::new(MemoryApplications::new());
    let doomed = seed(
        &applications,
        complete_profile("Tara", "9000000205"),
        Some(ApplicationStatus::Reject),
    );
    seed(
        &applications,
        complete_profile("Uday", "9000000206"),
        Some(ApplicationStatus::Approve),
    );
    let router = review_router(portal_state(
        applications,
        Arc::new(MemoryMasterSheet::new()),
    ));

    let deleted = router
        .clone()
        .oneshot(
            Request::delete(format!("/api/v1/admin/applications/{doomed}"))
                .header(header::AUTHORIZATION, bearer(Role::Admin))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(deleted.status(), StatusCode::OK);

    let reset = router
        .oneshot(
            Request::put("/api/v1/admin/applications/reset-statuses")
                .header(header::AUTHORIZATION, bearer(Role::Admin))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(reset.status(), StatusCode::OK);
    let payload = read_json_body(reset).await;
    let users = payload["users"].as_array().expect("users array");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["status"], "pending");
}
