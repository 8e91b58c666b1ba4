//! Podcast Context - Value Objects

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::domain::dialogue::SpeakerId;

/// 单次生成任务的唯一标识
///
/// 所有中间文件名都以它为前缀，避免并发任务互相覆盖
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunToken(Uuid);

impl RunToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文件名中使用的短形式（8 位十六进制）
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for RunToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 片段音频格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
}

impl AudioFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "wav" => Some(Self::Wav),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
        }
    }
}

/// 中间片段文件名: `<run>_<speaker>_reply_<ordinal>.<ext>`
pub fn segment_file_name(
    run: &RunToken,
    speaker_stem: &str,
    ordinal: u32,
    format: AudioFormat,
) -> String {
    format!(
        "{}_{}_reply_{}.{}",
        run.short(),
        speaker_stem,
        ordinal,
        format.extension()
    )
}

/// 合并后的播客文件名: `podcast_<YYYYmmddHHMMSS>_<run>.wav`
pub fn podcast_file_name<Tz: TimeZone>(created_at: &DateTime<Tz>, run: &RunToken) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "podcast_{}_{}.{}",
        created_at.format("%Y%m%d%H%M%S"),
        run.short(),
        AudioFormat::Wav.extension()
    )
}

/// 一句对白对应的合成音频片段
///
/// 由编排器独占，合并结束后（无论成功与否）删除
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSegment {
    ordinal: u32,
    speaker: SpeakerId,
    artifact_path: PathBuf,
}

impl AudioSegment {
    pub fn new(ordinal: u32, speaker: SpeakerId, artifact_path: PathBuf) -> Self {
        Self {
            ordinal,
            speaker,
            artifact_path,
        }
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn speaker(&self) -> SpeakerId {
        self.speaker
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    pub fn format(&self) -> Option<AudioFormat> {
        self.artifact_path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(AudioFormat::from_extension)
    }
}

/// 最终的合并产物
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedArtifact {
    filename: String,
    path: PathBuf,
}

impl MergedArtifact {
    /// 从输出路径构造，文件名取路径最后一段
    pub fn from_path(path: PathBuf) -> Self {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { filename, path }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_segment_file_name() {
        let run = RunToken::from_uuid(Uuid::parse_str("0123456789abcdef0123456789abcdef").unwrap());
        assert_eq!(
            segment_file_name(&run, "amina", 3, AudioFormat::Mp3),
            "01234567_amina_reply_3.mp3"
        );
    }

    #[test]
    fn test_podcast_file_name() {
        let run = RunToken::from_uuid(Uuid::parse_str("fedcba9876543210fedcba9876543210").unwrap());
        let at = Utc.with_ymd_and_hms(2024, 11, 5, 14, 3, 9).unwrap();
        assert_eq!(podcast_file_name(&at, &run), "podcast_20241105140309_fedcba98.wav");
    }

    #[test]
    fn test_run_tokens_differ() {
        assert_ne!(RunToken::new().short(), RunToken::new().short());
    }

    #[test]
    fn test_segment_format_from_path() {
        let segment = AudioSegment::new(1, SpeakerId::A, PathBuf::from("work/x_amina_reply_1.mp3"));
        assert_eq!(segment.format(), Some(AudioFormat::Mp3));
    }

    #[test]
    fn test_merged_artifact_filename() {
        let artifact = MergedArtifact::from_path(PathBuf::from("podcast_generated/podcast_1.wav"));
        assert_eq!(artifact.filename(), "podcast_1.wav");
    }
}
