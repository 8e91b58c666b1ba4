//! Dialogue Context - Value Objects

use serde::{Deserialize, Serialize};

/// 说话人标识
///
/// 固定两个角色：A（默认 Amina）与 B（默认 David）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeakerId {
    A,
    B,
}

impl SpeakerId {
    pub const ALL: [SpeakerId; 2] = [SpeakerId::A, SpeakerId::B];
}

impl std::fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeakerId::A => write!(f, "A"),
            SpeakerId::B => write!(f, "B"),
        }
    }
}

/// 说话人：对白标签 + 合成音色
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speaker {
    label: String,
    voice_name: String,
}

impl Speaker {
    pub fn new(label: impl Into<String>, voice_name: impl Into<String>) -> Result<Self, &'static str> {
        let label = label.into().trim().to_string();
        let voice_name = voice_name.into().trim().to_string();
        if label.is_empty() {
            return Err("说话人标签不能为空");
        }
        if label.contains(':') || label.contains('\n') {
            return Err("说话人标签不能包含冒号或换行");
        }
        if voice_name.is_empty() {
            return Err("音色名称不能为空");
        }
        Ok(Self { label, voice_name })
    }

    /// 对白中的标签，例如 "Amina"
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn voice_name(&self) -> &str {
        &self.voice_name
    }

    /// 用于中间文件命名的小写标签
    pub fn file_stem(&self) -> String {
        self.label
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect::<String>()
            .to_lowercase()
    }
}

/// 两个说话人的名册
///
/// 不变量: 两个标签互不相同
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerRoster {
    a: Speaker,
    b: Speaker,
}

impl SpeakerRoster {
    pub fn new(a: Speaker, b: Speaker) -> Result<Self, &'static str> {
        if a.label == b.label {
            return Err("两个说话人的标签必须不同");
        }
        Ok(Self { a, b })
    }

    pub fn get(&self, id: SpeakerId) -> &Speaker {
        match id {
            SpeakerId::A => &self.a,
            SpeakerId::B => &self.b,
        }
    }

    pub fn voice_for(&self, id: SpeakerId) -> &str {
        self.get(id).voice_name()
    }

    /// 若该行以 "<标签>:" 开头，返回说话人与去掉标签后的剩余文本
    pub fn match_line<'a>(&self, line: &'a str) -> Option<(SpeakerId, &'a str)> {
        SpeakerId::ALL.into_iter().find_map(|id| {
            line.strip_prefix(self.get(id).label())
                .and_then(|rest| rest.strip_prefix(':'))
                .map(|rest| (id, rest))
        })
    }
}

impl Default for SpeakerRoster {
    fn default() -> Self {
        Self {
            a: Speaker {
                label: "Amina".to_string(),
                voice_name: "fr-FR-Wavenet-C".to_string(),
            },
            b: Speaker {
                label: "David".to_string(),
                voice_name: "fr-FR-Wavenet-B".to_string(),
            },
        }
    }
}

/// 一句对白
///
/// `ordinal` 为整段对话中的位置（从 1 开始，两个说话人共用计数）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    speaker: SpeakerId,
    text: String,
    ordinal: u32,
}

impl Utterance {
    pub fn new(speaker: SpeakerId, text: impl Into<String>, ordinal: u32) -> Self {
        Self {
            speaker,
            text: text.into(),
            ordinal,
        }
    }

    pub fn speaker(&self) -> SpeakerId {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }
}
