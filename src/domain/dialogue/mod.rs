//! Dialogue Context - 对白限界上下文
//!
//! 职责:
//! - 说话人名册（标签 + 音色）
//! - 生成提示词
//! - 对白文本解析

mod parser;
mod prompt;
mod value_objects;

pub use parser::{parse_dialogue, ParsedDialogue};
pub use prompt::build_dialogue_prompt;
pub use value_objects::{Speaker, SpeakerId, SpeakerRoster, Utterance};
