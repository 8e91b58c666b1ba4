//! Fake Dialogue Generator - 本地调试用的生成器
//!
//! 不调用模型，从提示词中取出文档文本，按句子交替分配给两个说话人

use async_trait::async_trait;

use crate::application::ports::{DialogueGeneratorPort, GeneratorError};
use crate::domain::dialogue::{SpeakerId, SpeakerRoster};

const TEXT_START: &str = "Texte extrait du PDF :\n";
const TEXT_END: &str = "\n---";

/// Fake Dialogue Generator
pub struct FakeDialogueGenerator {
    roster: SpeakerRoster,
    max_replies: usize,
}

impl FakeDialogueGenerator {
    pub fn new(roster: SpeakerRoster) -> Self {
        Self {
            roster,
            max_replies: 12,
        }
    }

    fn embedded_text(prompt: &str) -> &str {
        prompt
            .split_once(TEXT_START)
            .and_then(|(_, rest)| rest.split_once(TEXT_END))
            .map(|(text, _)| text)
            .unwrap_or(prompt)
    }
}

#[async_trait]
impl DialogueGeneratorPort for FakeDialogueGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        let sentences: Vec<String> = Self::embedded_text(prompt)
            .split_inclusive(['.', '!', '?'])
            .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|s| !s.is_empty())
            .take(self.max_replies)
            .collect();

        if sentences.is_empty() {
            return Err(GeneratorError::EmptyResponse);
        }

        let dialogue = sentences
            .iter()
            .enumerate()
            .map(|(i, sentence)| {
                let id = SpeakerId::ALL[i % 2];
                format!("{}: {}", self.roster.get(id).label(), sentence)
            })
            .collect::<Vec<_>>()
            .join("\n");

        tracing::debug!(replies = sentences.len(), "FakeDialogueGenerator: dialogue built");

        Ok(dialogue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::{build_dialogue_prompt, parse_dialogue};

    #[tokio::test]
    async fn test_generated_dialogue_parses_back() {
        let roster = SpeakerRoster::default();
        let prompt = build_dialogue_prompt("Le soleil brille. Il fait chaud!\nOn va nager?", &roster);
        let generator = FakeDialogueGenerator::new(roster.clone());

        let dialogue = generator.generate(&prompt).await.unwrap();
        let parsed = parse_dialogue(&dialogue, &roster);

        assert_eq!(
            dialogue,
            "Amina: Le soleil brille.\nDavid: Il fait chaud!\nAmina: On va nager?"
        );
        assert_eq!(parsed.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_text_is_an_error() {
        let roster = SpeakerRoster::default();
        let prompt = build_dialogue_prompt("   ", &roster);
        let generator = FakeDialogueGenerator::new(roster);

        assert!(generator.generate(&prompt).await.is_err());
    }
}
