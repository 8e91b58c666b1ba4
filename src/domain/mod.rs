//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Dialogue Context: 说话人、提示词、对白解析
//! - Podcast Context: 音频片段与合并产物

pub mod dialogue;
pub mod podcast;
