//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（文本提取、对白生成、TTS、片段存储、音频合并）
//! - commands: GeneratePodcast 命令及其流水线处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;

pub use commands::{
    handlers::{GeneratePodcastHandler, PodcastSettings},
    GeneratePodcast, PodcastOutcome,
};

pub use error::PipelineError;

pub use ports::{
    AssembleError, AssembledAudio, AudioAssemblerPort, DialogueGeneratorPort, ExtractError,
    GeneratorError, SegmentStorageError, SegmentStoragePort, SynthesisRequest,
    SynthesisResponse, TextExtractorPort, TtsEnginePort, TtsError,
};
