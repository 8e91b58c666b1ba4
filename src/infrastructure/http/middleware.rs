//! HTTP Middleware
//!
//! 请求结果日志：上传一次会跑完整条流水线，耗时一并记录

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Level;

/// 按状态码决定日志级别，2xx/3xx 不记录
fn log_level_for(status: StatusCode) -> Option<Level> {
    if status.is_server_error() {
        Some(Level::ERROR)
    } else if status.is_client_error() {
        Some(Level::WARN)
    } else {
        None
    }
}

/// 记录失败请求的方法、路径、状态码和耗时
///
/// 流水线内部的失败原因已在编排器中按 run_id 记录，这里只记录请求层面的结果。
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match log_level_for(status) {
        Some(Level::ERROR) => tracing::error!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "Request failed"
        ),
        Some(_) => tracing::warn!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "Request rejected"
        ),
        None => {}
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request as HttpRequest},
        routing::{get, post},
        Router,
    };
    use tower::util::ServiceExt;

    use crate::application::PipelineError;
    use crate::infrastructure::http::error::ApiError;
    use crate::infrastructure::http::handlers;

    async fn rejected_upload() -> Result<&'static str, ApiError> {
        Err(PipelineError::validation("No selected file").into())
    }

    async fn failed_synthesis() -> Result<&'static str, ApiError> {
        Err(PipelineError::synthesis(3, "quota exceeded").into())
    }

    async fn missing_podcast() -> Result<&'static str, ApiError> {
        Err(ApiError::NotFound("podcast_x.wav".to_string()))
    }

    fn create_test_router() -> Router {
        Router::new()
            .route("/", get(handlers::hello))
            .route("/rejected", post(rejected_upload))
            .route("/failed", post(failed_synthesis))
            .route("/missing", get(missing_podcast))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Option<String>, String) {
        let request = HttpRequest::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_log_level_for_status() {
        assert_eq!(log_level_for(StatusCode::OK), None);
        assert_eq!(log_level_for(StatusCode::NOT_MODIFIED), None);
        assert_eq!(log_level_for(StatusCode::BAD_REQUEST), Some(Level::WARN));
        assert_eq!(log_level_for(StatusCode::NOT_FOUND), Some(Level::WARN));
        assert_eq!(log_level_for(StatusCode::INTERNAL_SERVER_ERROR), Some(Level::ERROR));
        assert_eq!(log_level_for(StatusCode::BAD_GATEWAY), Some(Level::ERROR));
    }

    #[tokio::test]
    async fn test_hello_is_untouched() {
        let (status, _, body) = send(create_test_router(), "GET", "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello everyone");
    }

    #[tokio::test]
    async fn test_validation_error_keeps_json_body() {
        let (status, content_type, body) = send(create_test_router(), "POST", "/rejected").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type.as_deref(), Some("application/json"));

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("No selected file"));
    }

    #[tokio::test]
    async fn test_pipeline_failure_keeps_ordinal_in_body() {
        let (status, _, body) = send(create_test_router(), "POST", "/failed").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        let message = json["error"].as_str().unwrap();
        assert!(message.contains("reply 3"));
        assert!(message.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_missing_podcast_stays_plain_text() {
        let (status, content_type, body) = send(create_test_router(), "GET", "/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
        assert_eq!(body, "File not found");
    }

    #[tokio::test]
    async fn test_unknown_route_passes_through() {
        let (status, _, body) = send(create_test_router(), "GET", "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());
    }
}
