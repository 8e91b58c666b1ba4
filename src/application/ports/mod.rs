//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_assembler;
mod dialogue_generator;
mod segment_storage;
mod text_extractor;
mod tts_engine;

pub use audio_assembler::{AssembleError, AssembledAudio, AudioAssemblerPort};
pub use dialogue_generator::{DialogueGeneratorPort, GeneratorError};
pub use segment_storage::{SegmentStorageError, SegmentStoragePort};
pub use text_extractor::{ExtractError, TextExtractorPort};
pub use tts_engine::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};
