//! Upload Handler - 上传文档并生成播客

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;
use tokio::fs;

use crate::application::{GeneratePodcast, PipelineError};
use crate::infrastructure::http::dto::UploadResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

const UPLOAD_FIELD: &str = "pdf_file";

/// 只保留客户端文件名的最后一段
fn sanitize_filename(raw: &str) -> Option<String> {
    let name = raw.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

/// 上传 PDF（同步执行完整流水线）
pub async fn upload_pdf(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;
        upload = Some((filename, data.to_vec()));
        break;
    }

    let (raw_filename, data) = upload.ok_or_else(|| {
        PipelineError::validation(format!("No '{}' part in the request", UPLOAD_FIELD))
    })?;
    let filename = sanitize_filename(&raw_filename)
        .ok_or_else(|| PipelineError::validation("No selected file"))?;

    // 保存上传文件
    let document_path = state.uploads_dir.join(&filename);
    fs::write(&document_path, &data)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to save upload: {}", e)))?;

    tracing::info!(
        filename = %filename,
        size = data.len(),
        "Document uploaded"
    );

    // 在独立任务中运行，客户端断开也不会中断清理
    let handler = state.podcast_handler.clone();
    let outcome = tokio::spawn(async move {
        handler.handle(GeneratePodcast { document_path }).await
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Podcast task aborted: {}", e)))??;

    Ok(Json(UploadResponse {
        message: "PDF processed, dialogue generated, and merged podcast created".to_string(),
        filename,
        generated_dialogue: outcome.dialogue_text,
        podcast_filename: outcome.podcast_filename,
    }))
}
