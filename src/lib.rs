//! Podcastify - 文档转双人播客服务
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Dialogue: 说话人、对白解析、提示词
//! - Podcast: 运行标识、片段与产物命名
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TextExtractor, DialogueGenerator, TtsEngine, SegmentStorage, AudioAssembler）
//! - Commands: GeneratePodcast 流水线
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: 上传、下载、存活检查
//! - Adapters: PDF 提取、Vertex Gemini、Google TTS、片段存储、WAV 合并

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
