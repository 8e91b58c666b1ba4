//! LLM Adapter - 对白生成器实现

mod fake_dialogue_generator;
mod vertex_gemini_client;

pub use fake_dialogue_generator::FakeDialogueGenerator;
pub use vertex_gemini_client::{VertexGeminiClient, VertexGeminiClientConfig};
