//! Podcast Context - 播客产物限界上下文
//!
//! 职责:
//! - 单次任务标识（RunToken）
//! - 中间片段与最终产物的值对象
//! - 文件命名规则

mod value_objects;

pub use value_objects::{
    podcast_file_name, segment_file_name, AudioFormat, AudioSegment, MergedArtifact, RunToken,
};
