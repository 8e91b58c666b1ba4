//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod assembler;
pub mod auth;
pub mod extractor;
pub mod llm;
pub mod storage;
pub mod tts;

pub use assembler::*;
pub use auth::*;
pub use extractor::*;
pub use llm::*;
pub use storage::*;
pub use tts::*;
