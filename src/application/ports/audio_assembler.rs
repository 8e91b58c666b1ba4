//! Audio Assembler Port - 音频拼接抽象
//!
//! 将有序的片段文件拼接成一个可播放的音频文件

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use crate::domain::podcast::{AudioSegment, MergedArtifact};

/// 拼接错误
///
/// 单个片段解码失败不会产生错误（跳过该片段），只有输出失败才会
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 拼接结果
#[derive(Debug, Clone)]
pub struct AssembledAudio {
    /// 输出文件
    pub artifact: MergedArtifact,
    /// 成功拼接的片段序号（按拼接顺序）
    pub merged_ordinals: Vec<u32>,
    /// 因读取或解码失败被跳过的片段序号
    pub skipped_ordinals: Vec<u32>,
    /// 时长（毫秒）
    pub duration_ms: u64,
    /// 采样率
    pub sample_rate: u32,
    /// 声道数
    pub channels: u8,
}

/// Audio Assembler Port
#[async_trait]
pub trait AudioAssemblerPort: Send + Sync {
    /// 按输入顺序拼接片段并写入 `output_path`
    ///
    /// 空输入也会产生一个合法的零时长文件
    async fn assemble(
        &self,
        segments: &[AudioSegment],
        output_path: &Path,
    ) -> Result<AssembledAudio, AssembleError>;
}
