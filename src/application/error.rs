//! 应用层错误定义
//!
//! 播客生成流水线的统一错误类型

use thiserror::Error;

/// 流水线错误
///
/// 每个外部步骤失败都会终止本次任务，不做重试
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 上传内容无效
    #[error("{0}")]
    Validation(String),

    /// 文档中没有提取到文本
    #[error("Could not extract text from PDF: {0}")]
    Extraction(String),

    /// 生成模型调用失败
    #[error("Error during dialogue generation: {0}")]
    Generation(String),

    /// 某句对白合成失败
    #[error("Error during audio synthesis of reply {ordinal}: {message}")]
    Synthesis { ordinal: u32, message: String },

    /// 合并输出失败
    #[error("Error during audio merging: {0}")]
    Assembly(String),

    /// 上传或片段文件写入失败
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PipelineError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }

    pub fn synthesis(ordinal: u32, message: impl Into<String>) -> Self {
        Self::Synthesis {
            ordinal,
            message: message.into(),
        }
    }

    /// 是否为调用方输入错误
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<crate::application::ports::GeneratorError> for PipelineError {
    fn from(err: crate::application::ports::GeneratorError) -> Self {
        Self::Generation(err.to_string())
    }
}

impl From<crate::application::ports::AssembleError> for PipelineError {
    fn from(err: crate::application::ports::AssembleError) -> Self {
        Self::Assembly(err.to_string())
    }
}

impl From<crate::application::ports::SegmentStorageError> for PipelineError {
    fn from(err: crate::application::ports::SegmentStorageError) -> Self {
        Self::Storage(err.to_string())
    }
}
