//! HTTP Routes
//!
//! Endpoints:
//! - /                              GET   存活检查
//! - /upload-pdf                    POST  上传 PDF 并同步生成播客
//! - /podcast_generated/:filename   GET   下载合并后的播客

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::hello))
        .route("/upload-pdf", post(handlers::upload_pdf))
        .route("/podcast_generated/:filename", get(handlers::serve_podcast))
}
