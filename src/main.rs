//! Podcastify - 文档转双人播客服务
//!
//! 上传 PDF → 提取文本 → 生成双人对白 → 逐句合成 → 合并为一个 WAV

use std::sync::Arc;

use podcastify::application::ports::{DialogueGeneratorPort, TtsEnginePort};
use podcastify::application::{GeneratePodcastHandler, PodcastSettings};
use podcastify::config::{load_config, print_config, AppConfig, GeneratorProvider, TtsProvider};
use podcastify::infrastructure::adapters::{
    AccessTokenSource, ApplicationDefaultCredentials, FakeDialogueGenerator, FakeTtsClient,
    FileSegmentStorage, GoogleTtsClient, GoogleTtsClientConfig, PdfTextExtractor,
    StaticAccessToken, VertexGeminiClient, VertexGeminiClientConfig, WavAssembler,
};
use podcastify::infrastructure::http::{AppState, HttpServer, ServerConfig};
use podcastify::domain::dialogue::SpeakerRoster;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 中的 Google Cloud 变量（可选）
    let _ = dotenvy::dotenv();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},podcastify={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Podcastify - document to podcast service");
    print_config(&config);

    // 确保目录存在
    tokio::fs::create_dir_all(&config.storage.uploads_dir).await?;
    tokio::fs::create_dir_all(&config.storage.podcast_dir).await?;

    let roster = config
        .speakers
        .roster()
        .map_err(|e| anyhow::anyhow!("Invalid speakers: {}", e))?;

    // 选用 Google 服务时启动即检查凭据
    let credentials = if config.uses_google() {
        Some(google_credentials(&config).await?)
    } else {
        None
    };

    let generator = build_generator(&config, &roster, credentials.clone())?;
    let tts_engine = build_tts_engine(&config, credentials)?;
    if !tts_engine.health_check().await {
        tracing::warn!("TTS engine health check failed, synthesis requests may fail");
    }

    let segment_storage = FileSegmentStorage::new(&config.storage.work_dir).await?;

    let handler = GeneratePodcastHandler::new(
        Arc::new(PdfTextExtractor::new()),
        generator,
        tts_engine,
        Arc::new(segment_storage),
        Arc::new(WavAssembler::default()),
        PodcastSettings {
            roster,
            language_code: config.speakers.language_code.clone(),
            podcast_dir: config.storage.podcast_dir.clone(),
        },
    );

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_max_upload_size(config.server.max_upload_size);
    let state = AppState::new(handler, config.storage.uploads_dir.clone());
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn google_credentials(config: &AppConfig) -> anyhow::Result<Arc<dyn AccessTokenSource>> {
    if let Some(token) = &config.google.access_token {
        tracing::warn!("Using a static Google access token, it is never refreshed");
        return Ok(Arc::new(StaticAccessToken::new(token)));
    }

    let adc = ApplicationDefaultCredentials::discover().await.map_err(|e| {
        anyhow::anyhow!(
            "{}. Set GOOGLE_APPLICATION_CREDENTIALS, run `gcloud auth application-default login`, \
             or select the fake providers",
            e
        )
    })?;
    Ok(Arc::new(adc))
}

fn build_generator(
    config: &AppConfig,
    roster: &SpeakerRoster,
    credentials: Option<Arc<dyn AccessTokenSource>>,
) -> anyhow::Result<Arc<dyn DialogueGeneratorPort>> {
    match config.generator.provider {
        GeneratorProvider::Vertex => {
            let google = &config.google;
            let (Some(project_id), Some(location)) = (&google.project_id, &google.location) else {
                anyhow::bail!("Vertex generator requires google.project_id and google.location");
            };
            let credentials =
                credentials.ok_or_else(|| anyhow::anyhow!("Vertex generator requires Google credentials"))?;

            let mut client_config = VertexGeminiClientConfig::new(project_id, location)
                .with_model(&config.generator.model);
            client_config.timeout_secs = config.generator.timeout_secs;

            Ok(Arc::new(VertexGeminiClient::new(client_config, credentials)?))
        }
        GeneratorProvider::Fake => {
            tracing::warn!("Using FakeDialogueGenerator, no model will be called");
            Ok(Arc::new(FakeDialogueGenerator::new(roster.clone())))
        }
    }
}

fn build_tts_engine(
    config: &AppConfig,
    credentials: Option<Arc<dyn AccessTokenSource>>,
) -> anyhow::Result<Arc<dyn TtsEnginePort>> {
    match config.tts.provider {
        TtsProvider::Google => {
            let credentials =
                credentials.ok_or_else(|| anyhow::anyhow!("Google TTS requires Google credentials"))?;
            let mut client_config =
                GoogleTtsClientConfig::new(&config.tts.url).with_timeout(config.tts.timeout_secs);
            client_config.project_id = config.google.project_id.clone();

            Ok(Arc::new(GoogleTtsClient::new(client_config, credentials)?))
        }
        TtsProvider::Fake => {
            tracing::warn!("Using FakeTtsClient, segments are generated tones");
            Ok(Arc::new(FakeTtsClient::with_defaults()))
        }
    }
}
