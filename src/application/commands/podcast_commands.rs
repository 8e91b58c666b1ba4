//! Podcast Commands

use std::path::PathBuf;

/// 从文档生成播客命令
#[derive(Debug, Clone)]
pub struct GeneratePodcast {
    /// 已保存的上传文档路径
    pub document_path: PathBuf,
}

/// 生成成功的结果
#[derive(Debug, Clone)]
pub struct PodcastOutcome {
    /// 模型生成的原始对白文本
    pub dialogue_text: String,
    /// 合并后的播客文件名（位于播客输出目录）
    pub podcast_filename: String,
    /// 对白句数
    pub utterance_count: usize,
    /// 播客时长（毫秒）
    pub duration_ms: u64,
}
