//! Dialogue Generator Port - 生成模型抽象

use async_trait::async_trait;
use thiserror::Error;

/// 生成错误
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model returned no candidates")]
    EmptyResponse,
}

/// Dialogue Generator Port
///
/// 输入完整提示词，返回模型生成的一整段对白文本
#[async_trait]
pub trait DialogueGeneratorPort: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError>;
}
