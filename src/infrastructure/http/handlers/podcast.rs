//! Podcast Download Handler

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use std::path::{Component, Path as FsPath};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::domain::podcast::AudioFormat;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 只接受单独一段普通文件名
fn is_plain_file_name(name: &str) -> bool {
    let mut components = FsPath::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// 下载合并后的播客（流式返回）
pub async fn serve_podcast(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    tracing::debug!(
        filename = %filename,
        dir = %state.podcast_dir.display(),
        "Serving podcast"
    );

    if !is_plain_file_name(&filename) {
        return Err(ApiError::NotFound(filename));
    }

    let path = state.podcast_dir.join(&filename);
    let file = match tokio::fs::File::open(&path).await {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(filename));
        }
        Err(e) => return Err(ApiError::Internal(format!("Failed to open podcast: {}", e))),
    };

    let metadata = file
        .metadata()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to get file metadata: {}", e)))?;
    if !metadata.is_file() {
        return Err(ApiError::NotFound(filename));
    }

    let content_type = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(AudioFormat::from_extension)
        .map(|f| f.content_type())
        .unwrap_or("application/octet-stream");

    let body = Body::from_stream(ReaderStream::new(file));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, metadata.len())
        .body(body)
        .map_err(|e| ApiError::Internal(e.to_string()))
}
