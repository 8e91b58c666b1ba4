//! PDF Extractor - 基于 pdf-extract 的文本提取
//!
//! 实现 TextExtractorPort trait。解析是同步 CPU 操作，放到 blocking 线程池中执行。

use async_trait::async_trait;
use std::path::Path;

use crate::application::ports::{ExtractError, TextExtractorPort};

/// PDF 文本提取器
#[derive(Debug, Default, Clone)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractorPort for PdfTextExtractor {
    async fn extract(&self, document_path: &Path) -> Result<String, ExtractError> {
        if !tokio::fs::try_exists(document_path)
            .await
            .map_err(|e| ExtractError::IoError(e.to_string()))?
        {
            return Err(ExtractError::IoError(format!(
                "File not found: {}",
                document_path.display()
            )));
        }

        let path = document_path.to_path_buf();
        // pdf-extract 遇到不规范的文件可能 panic，JoinError 会把它转换成普通错误
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path))
            .await
            .map_err(|e| ExtractError::Unreadable(format!("Extractor crashed: {}", e)))?
            .map_err(|e| ExtractError::Unreadable(e.to_string()))?;

        tracing::debug!(
            path = %document_path.display(),
            chars = text.chars().count(),
            "PDF text extracted"
        );

        Ok(text)
    }
}
