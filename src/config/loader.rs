//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, GeneratorProvider};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "PODCASTIFY";

/// 未带前缀的 Google Cloud 变量（通常来自 `.env`）
const PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";
const LOCATION_ENV: &str = "VERTEX_AI_LOCATION";
const ACCESS_TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `PODCASTIFY_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// `google` 段缺失的字段再从 `GOOGLE_CLOUD_PROJECT`、`VERTEX_AI_LOCATION`、
/// `GOOGLE_ACCESS_TOKEN` 补全。
///
/// # 环境变量示例
/// - `PODCASTIFY_SERVER__PORT=8080`
/// - `PODCASTIFY_GOOGLE__PROJECT_ID=my-project`
/// - `PODCASTIFY_GENERATOR__PROVIDER=fake`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5000)?
        .set_default("server.max_upload_size", 50 * 1024 * 1024)?
        .set_default("storage.uploads_dir", "uploads")?
        .set_default("storage.work_dir", "work")?
        .set_default("storage.podcast_dir", "podcast_generated")?
        .set_default("speakers.a.label", "Amina")?
        .set_default("speakers.a.voice", "fr-FR-Wavenet-C")?
        .set_default("speakers.b.label", "David")?
        .set_default("speakers.b.voice", "fr-FR-Wavenet-B")?
        .set_default("speakers.language_code", "fr-FR")?
        .set_default("generator.provider", "vertex")?
        .set_default("generator.model", "gemini-1.5-flash-002")?
        .set_default("generator.timeout_secs", 120)?
        .set_default("tts.provider", "google")?
        .set_default("tts.url", "https://texttospeech.googleapis.com")?
        .set_default("tts.timeout_secs", 60)?
        .set_default("log.level", "info")?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），如 PODCASTIFY_TTS__TIMEOUT_SECS=30
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let mut app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    apply_google_fallbacks(&mut app_config, |key| std::env::var(key).ok());

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 用裸环境变量补全未设置的 Google 字段
fn apply_google_fallbacks<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let google = &mut config.google;
    for (slot, key) in [
        (&mut google.project_id, PROJECT_ENV),
        (&mut google.location, LOCATION_ENV),
        (&mut google.access_token, ACCESS_TOKEN_ENV),
    ] {
        if slot.as_deref().map_or(true, |v| v.trim().is_empty()) {
            *slot = lookup(key).filter(|v| !v.trim().is_empty());
        }
    }
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    // 标签与音色
    config
        .speakers
        .roster()
        .map_err(|e| ConfigError::ValidationError(format!("Invalid speakers: {}", e)))?;

    if config.speakers.language_code.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Language code cannot be empty".to_string(),
        ));
    }

    if config.generator.provider == GeneratorProvider::Vertex {
        if config.google.project_id.is_none() {
            return Err(ConfigError::ValidationError(format!(
                "google.project_id (or {}) is required for the vertex generator",
                PROJECT_ENV
            )));
        }
        if config.google.location.is_none() {
            return Err(ConfigError::ValidationError(format!(
                "google.location (or {}) is required for the vertex generator",
                LOCATION_ENV
            )));
        }
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Max Upload Size: {} bytes", config.server.max_upload_size);
    tracing::info!("Uploads Directory: {:?}", config.storage.uploads_dir);
    tracing::info!("Work Directory: {:?}", config.storage.work_dir);
    tracing::info!("Podcast Directory: {:?}", config.storage.podcast_dir);
    tracing::info!(
        "Speakers: {} ({}), {} ({}), language {}",
        config.speakers.a.label,
        config.speakers.a.voice,
        config.speakers.b.label,
        config.speakers.b.voice,
        config.speakers.language_code
    );
    tracing::info!(
        "Generator: {:?} (model {}, timeout {}s)",
        config.generator.provider,
        config.generator.model,
        config.generator.timeout_secs
    );
    tracing::info!(
        "TTS: {:?} ({}, timeout {}s)",
        config.tts.provider,
        config.tts.url,
        config.tts.timeout_secs
    );
    tracing::info!(
        "Google Project: {}, Location: {}",
        config.google.project_id.as_deref().unwrap_or("<unset>"),
        config.google.location.as_deref().unwrap_or("<unset>")
    );
    tracing::info!(
        "Google Access Token: {}",
        if config.google.access_token.is_some() {
            "<redacted>"
        } else {
            "<unset>"
        }
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
