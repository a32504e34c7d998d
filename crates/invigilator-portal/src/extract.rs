use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::WithRejection;
use serde_json::json;

/// `Json<T>` whose rejections answer with the portal's `{"error": ...}` body.
///
/// Destructure as `WithRejection(Json(value), _)`.
pub type JsonBody<T> = WithRejection<Json<T>, JsonBodyError>;

#[derive(Debug)]
pub struct JsonBodyError(JsonRejection);

impl From<JsonRejection> for JsonBodyError {
    fn from(rejection: JsonRejection) -> Self {
        Self(rejection)
    }
}

impl IntoResponse for JsonBodyError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            tracing::warn!(error = %self.0.body_text(), "request body over limit");
        }
        (status, Json(json!({ "error": self.0.body_text() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Greeting {
        name: String,
    }

    async fn greet(WithRejection(Json(body), _): JsonBody<Greeting>) -> String {
        body.name
    }

    async fn error_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 16)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json error body")
    }

    fn post_json(body: &'static str) -> Request<Body> {
        Request::post("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .expect("request")
    }

    #[tokio::test]
    async fn malformed_json_is_reported_as_json() {
        let app = Router::new().route("/", post(greet));
        let response = app.oneshot(post_json("{\"name\":")).await.expect("route runs");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = error_body(response).await;
        assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()));
    }

    #[tokio::test]
    async fn wrong_shape_and_missing_content_type_keep_their_status() {
        let app = Router::new().route("/", post(greet));
        let response = app
            .clone()
            .oneshot(post_json("{\"name\": 7}"))
            .await
            .expect("route runs");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(error_body(response).await["error"].is_string());

        let response = app
            .oneshot(
                Request::post("/")
                    .body(Body::from("{\"name\":\"x\"}"))
                    .expect("request"),
            )
            .await
            .expect("route runs");
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(error_body(response).await["error"].is_string());
    }
}
