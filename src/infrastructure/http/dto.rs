//! Data Transfer Objects

use serde::{Deserialize, Serialize};

/// 上传成功响应
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    /// 保存后的上传文件名
    pub filename: String,
    pub generated_dialogue: String,
    /// 可通过 /podcast_generated/{filename} 下载
    pub podcast_filename: String,
}

/// 错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
