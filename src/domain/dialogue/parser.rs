//! 对白解析器
//!
//! 将生成模型返回的整段对白拆成有序的 [`Utterance`] 序列。
//! 解析是宽松的：不以已知标签开头的行（标题、旁白、空行）直接丢弃。

use super::value_objects::{SpeakerRoster, Utterance};

/// 解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDialogue {
    utterances: Vec<Utterance>,
    /// 被丢弃的非空行数量
    skipped_lines: usize,
}

impl ParsedDialogue {
    pub fn utterances(&self) -> &[Utterance] {
        &self.utterances
    }

    pub fn into_utterances(self) -> Vec<Utterance> {
        self.utterances
    }

    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }
}

/// 解析对白文本
///
/// 规则：
/// 1. 按行分割（支持 \n 和 \r\n），去掉首尾空白
/// 2. 以 "<标签>:" 开头的行产生一句对白，文本为去掉标签后的内容
/// 3. 序号在两个说话人之间共用，从 1 开始，每个带已知标签的行占用一个序号
/// 4. 标签后为空的行仍是一句对白（文本为空），由合成步骤拒绝
pub fn parse_dialogue(text: &str, roster: &SpeakerRoster) -> ParsedDialogue {
    let mut parsed = ParsedDialogue::default();
    let mut next_ordinal: u32 = 1;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some((speaker, rest)) = roster.match_line(line) else {
            parsed.skipped_lines += 1;
            continue;
        };

        parsed
            .utterances
            .push(Utterance::new(speaker, rest.trim(), next_ordinal));
        next_ordinal += 1;
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::SpeakerId;

    fn roster() -> SpeakerRoster {
        SpeakerRoster::default()
    }

    #[test]
    fn test_three_line_dialogue() {
        let parsed = parse_dialogue("Amina: Bonjour\nDavid: Salut\nAmina: Ça va?", &roster());
        let utterances = parsed.utterances();

        assert_eq!(utterances.len(), 3);
        assert_eq!(utterances[0], Utterance::new(SpeakerId::A, "Bonjour", 1));
        assert_eq!(utterances[1], Utterance::new(SpeakerId::B, "Salut", 2));
        assert_eq!(utterances[2], Utterance::new(SpeakerId::A, "Ça va?", 3));
    }

    #[test]
    fn test_unknown_speaker_does_not_consume_ordinal() {
        let text = "Amina: Bonjour\nNarrator: some note\nDavid: Salut";
        let parsed = parse_dialogue(text, &roster());

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.utterances()[1].ordinal(), 2);
        assert_eq!(parsed.utterances()[1].text(), "Salut");
        assert_eq!(parsed.skipped_lines(), 1);
    }

    #[test]
    fn test_headers_and_blank_lines_skipped() {
        let text = "## Dialogue\r\n\r\n  Amina:   Premier point.  \r\n---\r\nDavid: D'accord.\r\n";
        let parsed = parse_dialogue(text, &roster());

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.utterances()[0].text(), "Premier point.");
        assert_eq!(parsed.utterances()[1].ordinal(), 2);
        assert_eq!(parsed.skipped_lines(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_dialogue("", &roster()).is_empty());
        assert!(parse_dialogue("\n\n   \n", &roster()).is_empty());
    }

    #[test]
    fn test_no_recognized_labels() {
        let parsed = parse_dialogue("Alice: hi\nBob: hello", &roster());
        assert!(parsed.is_empty());
        assert_eq!(parsed.skipped_lines(), 2);
    }

    #[test]
    fn test_label_without_text_keeps_its_ordinal() {
        let parsed = parse_dialogue("Amina: Un\nDavid:\nAmina: Trois", &roster());

        let ordinals: Vec<u32> = parsed.utterances().iter().map(|u| u.ordinal()).collect();
        assert_eq!(ordinals, [1, 2, 3]);
        assert_eq!(parsed.utterances()[1], Utterance::new(SpeakerId::B, "", 2));
        assert_eq!(parsed.utterances()[2].text(), "Trois");
        assert_eq!(parsed.skipped_lines(), 0);
    }

    #[test]
    fn test_colon_inside_text_is_kept() {
        let parsed = parse_dialogue("David: Note: c'est important", &roster());
        assert_eq!(parsed.utterances()[0].text(), "Note: c'est important");
    }

    #[test]
    fn test_ordinals_are_contiguous() {
        let mut text = String::new();
        for i in 0..12 {
            let label = if i % 3 == 0 { "David" } else { "Amina" };
            text.push_str(&format!("{}: réplique {}\n(pause)\n", label, i));
        }
        let parsed = parse_dialogue(&text, &roster());

        let ordinals: Vec<u32> = parsed.utterances().iter().map(|u| u.ordinal()).collect();
        assert_eq!(ordinals, (1..=12).collect::<Vec<u32>>());
    }

    #[test]
    fn test_parse_is_pure() {
        let text = "Amina: Un\nDavid: Deux\nxx\nAmina: Trois";
        assert_eq!(parse_dialogue(text, &roster()), parse_dialogue(text, &roster()));
    }
}
