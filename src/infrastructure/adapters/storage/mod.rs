//! Storage Adapter - 中间片段文件存储

mod file_storage;

pub use file_storage::FileSegmentStorage;
