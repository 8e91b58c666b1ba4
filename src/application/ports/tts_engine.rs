//! TTS Engine Port - 语音合成引擎抽象
//!
//! 定义语音合成的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::podcast::AudioFormat;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// 要合成的文本
    pub text: String,
    /// 音色名称，例如 "fr-FR-Wavenet-C"
    pub voice_name: String,
    /// 语言代码，例如 "fr-FR"
    pub language_code: String,
}

/// 合成结果
#[derive(Debug, Clone)]
pub struct SynthesisResponse {
    /// 编码后的音频数据
    pub audio_data: Vec<u8>,
    /// 音频数据的编码格式
    pub format: AudioFormat,
}

/// TTS Engine Port
///
/// 外部语音合成服务的抽象接口，每句对白调用一次
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 合成一段语音
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError>;

    /// 检查服务是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
