//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::dialogue::{Speaker, SpeakerRoster};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 目录配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 说话人与语言
    #[serde(default)]
    pub speakers: SpeakersConfig,

    /// Google Cloud 凭据
    #[serde(default)]
    pub google: GoogleConfig,

    /// 对白生成
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// TTS 引擎配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// 是否选用了需要 Google 凭据的实现
    pub fn uses_google(&self) -> bool {
        self.generator.provider == GeneratorProvider::Vertex
            || self.tts.provider == TtsProvider::Google
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 上传请求体上限（字节）
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_upload_size() -> usize {
    50 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// 目录配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 上传文件目录
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,

    /// 中间片段目录
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// 合并产物目录
    #[serde(default = "default_podcast_dir")]
    pub podcast_dir: PathBuf,
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("work")
}

fn default_podcast_dir() -> PathBuf {
    PathBuf::from("podcast_generated")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
            work_dir: default_work_dir(),
            podcast_dir: default_podcast_dir(),
        }
    }
}

/// 单个说话人
#[derive(Debug, Clone, Deserialize)]
pub struct SpeakerConfig {
    pub label: String,
    pub voice: String,
}

/// 说话人配置
#[derive(Debug, Clone, Deserialize)]
pub struct SpeakersConfig {
    #[serde(default = "default_speaker_a")]
    pub a: SpeakerConfig,

    #[serde(default = "default_speaker_b")]
    pub b: SpeakerConfig,

    /// 合成语言，如 `fr-FR`
    #[serde(default = "default_language_code")]
    pub language_code: String,
}

fn default_speaker_a() -> SpeakerConfig {
    SpeakerConfig {
        label: "Amina".to_string(),
        voice: "fr-FR-Wavenet-C".to_string(),
    }
}

fn default_speaker_b() -> SpeakerConfig {
    SpeakerConfig {
        label: "David".to_string(),
        voice: "fr-FR-Wavenet-B".to_string(),
    }
}

fn default_language_code() -> String {
    "fr-FR".to_string()
}

impl Default for SpeakersConfig {
    fn default() -> Self {
        Self {
            a: default_speaker_a(),
            b: default_speaker_b(),
            language_code: default_language_code(),
        }
    }
}

impl SpeakersConfig {
    /// 构造说话人名册
    pub fn roster(&self) -> Result<SpeakerRoster, String> {
        let a = Speaker::new(&self.a.label, &self.a.voice)
            .map_err(|e| format!("speakers.a: {}", e))?;
        let b = Speaker::new(&self.b.label, &self.b.voice)
            .map_err(|e| format!("speakers.b: {}", e))?;
        SpeakerRoster::new(a, b).map_err(|e| e.to_string())
    }
}

/// Google Cloud 凭据（可由 `.env` 中的裸变量补全）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleConfig {
    #[serde(default)]
    pub project_id: Option<String>,

    /// Vertex AI 区域，如 `europe-west1`
    #[serde(default)]
    pub location: Option<String>,

    /// 固定 OAuth2 访问令牌，不会刷新；未设置时使用 Application Default Credentials
    #[serde(default)]
    pub access_token: Option<String>,
}

/// 生成器实现
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorProvider {
    Vertex,
    Fake,
}

/// 对白生成配置
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_generator_provider")]
    pub provider: GeneratorProvider,

    /// Gemini 模型名
    #[serde(default = "default_generator_model")]
    pub model: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_generator_timeout")]
    pub timeout_secs: u64,
}

fn default_generator_provider() -> GeneratorProvider {
    GeneratorProvider::Vertex
}

fn default_generator_model() -> String {
    "gemini-1.5-flash-002".to_string()
}

fn default_generator_timeout() -> u64 {
    120
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: default_generator_provider(),
            model: default_generator_model(),
            timeout_secs: default_generator_timeout(),
        }
    }
}

/// TTS 实现
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    Google,
    Fake,
}

/// TTS 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    #[serde(default = "default_tts_provider")]
    pub provider: TtsProvider,

    /// TTS 服务基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,
}

fn default_tts_provider() -> TtsProvider {
    TtsProvider::Google
}

fn default_tts_url() -> String {
    "https://texttospeech.googleapis.com".to_string()
}

fn default_tts_timeout() -> u64 {
    60
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: default_tts_provider(),
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::SpeakerId;

    #[test]
    fn test_default_roster() {
        let roster = SpeakersConfig::default().roster().unwrap();
        assert_eq!(roster.get(SpeakerId::A).label(), "Amina");
        assert_eq!(roster.voice_for(SpeakerId::B), "fr-FR-Wavenet-B");
    }

    #[test]
    fn test_roster_rejects_duplicate_labels() {
        let mut speakers = SpeakersConfig::default();
        speakers.b.label = "Amina".to_string();
        assert!(speakers.roster().is_err());
    }

    #[test]
    fn test_uses_google() {
        let mut config = AppConfig::default();
        assert!(config.uses_google());

        config.generator.provider = GeneratorProvider::Fake;
        assert!(config.uses_google());

        config.tts.provider = TtsProvider::Fake;
        assert!(!config.uses_google());
    }

    #[test]
    fn test_provider_names() {
        let provider: GeneratorProvider = serde_json::from_str("\"fake\"").unwrap();
        assert_eq!(provider, GeneratorProvider::Fake);
        let provider: TtsProvider = serde_json::from_str("\"google\"").unwrap();
        assert_eq!(provider, TtsProvider::Google);
    }
}
