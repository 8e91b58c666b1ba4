//! Text Extractor Port - 文档文本提取抽象

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// 文本提取错误
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Unreadable document: {0}")]
    Unreadable(String),
}

/// Text Extractor Port
///
/// 返回空字符串表示没有提取到任何内容，调用方将其视为失败
#[async_trait]
pub trait TextExtractorPort: Send + Sync {
    async fn extract(&self, document_path: &Path) -> Result<String, ExtractError>;
}
