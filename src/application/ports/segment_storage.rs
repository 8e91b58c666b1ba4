//! Segment Storage Port - 出站端口
//!
//! 管理单次任务中逐句合成的中间音频文件

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 片段存储错误
#[derive(Debug, Error)]
pub enum SegmentStorageError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Path outside working directory: {0}")]
    OutsideWorkDir(String),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),
}

/// Segment Storage Port
///
/// 所有读写都限制在配置的工作目录之内
#[async_trait]
pub trait SegmentStoragePort: Send + Sync {
    /// 工作目录
    fn work_dir(&self) -> &Path;

    /// 片段文件的完整路径
    fn segment_path(&self, file_name: &str) -> PathBuf {
        self.work_dir().join(file_name)
    }

    /// 写入片段数据，返回文件路径
    async fn save_segment(&self, file_name: &str, data: &[u8])
        -> Result<PathBuf, SegmentStorageError>;

    /// 删除片段文件（文件不存在视为成功）
    async fn delete_segment(&self, path: &Path) -> Result<(), SegmentStorageError>;
}
