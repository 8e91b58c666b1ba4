//! File Storage - 文件系统片段存储实现
//!
//! 实现 SegmentStoragePort trait

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::application::ports::{SegmentStorageError, SegmentStoragePort};

/// 文件系统片段存储
pub struct FileSegmentStorage {
    /// 工作目录
    work_dir: PathBuf,
}

impl FileSegmentStorage {
    /// 创建新的文件存储
    pub async fn new(work_dir: impl AsRef<Path>) -> Result<Self, SegmentStorageError> {
        let work_dir = work_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&work_dir)
            .await
            .map_err(|e| SegmentStorageError::IoError(e.to_string()))?;

        Ok(Self { work_dir })
    }

    /// 文件名只能是单独一段普通路径
    fn validate_file_name(file_name: &str) -> Result<(), SegmentStorageError> {
        let mut components = Path::new(file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(()),
            _ => Err(SegmentStorageError::InvalidFileName(file_name.to_string())),
        }
    }
}

#[async_trait]
impl SegmentStoragePort for FileSegmentStorage {
    fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    async fn save_segment(
        &self,
        file_name: &str,
        data: &[u8],
    ) -> Result<PathBuf, SegmentStorageError> {
        Self::validate_file_name(file_name)?;
        let path = self.segment_path(file_name);

        if let Err(e) = fs::write(&path, data).await {
            // 写入失败时不留下半截文件
            let _ = fs::remove_file(&path).await;
            return Err(SegmentStorageError::IoError(e.to_string()));
        }

        tracing::debug!(path = %path.display(), size = data.len(), "Saved segment");

        Ok(path)
    }

    async fn delete_segment(&self, path: &Path) -> Result<(), SegmentStorageError> {
        if path.parent() != Some(self.work_dir.as_path()) {
            return Err(SegmentStorageError::OutsideWorkDir(
                path.to_string_lossy().to_string(),
            ));
        }

        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SegmentStorageError::IoError(e.to_string())),
        }
    }
}
