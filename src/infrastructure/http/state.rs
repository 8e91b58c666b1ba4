//! Application State

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::GeneratePodcastHandler;

/// 应用状态
pub struct AppState {
    /// 播客生成流水线
    pub podcast_handler: Arc<GeneratePodcastHandler>,
    /// 上传文件保存目录
    pub uploads_dir: PathBuf,
    /// 合并产物目录（下载接口只读取这里的文件）
    pub podcast_dir: PathBuf,
}

impl AppState {
    pub fn new(podcast_handler: GeneratePodcastHandler, uploads_dir: PathBuf) -> Self {
        let podcast_dir = podcast_handler.settings().podcast_dir.clone();
        Self {
            podcast_handler: Arc::new(podcast_handler),
            uploads_dir,
            podcast_dir,
        }
    }
}
