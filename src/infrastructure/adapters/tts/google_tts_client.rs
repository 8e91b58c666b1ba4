//! Google TTS Client - 调用 Google Cloud Text-to-Speech REST 服务
//!
//! 实现 TtsEnginePort trait
//!
//! 外部 TTS API:
//! POST https://texttospeech.googleapis.com/v1/text:synthesize
//! Request: {"input": {"text"}, "voice": {"languageCode", "name"}, "audioConfig": {"audioEncoding": "MP3"}}
//! Response: {"audioContent": "<base64>"}

use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};
use crate::domain::podcast::AudioFormat;
use crate::infrastructure::adapters::auth::AccessTokenSource;

#[derive(Debug, Serialize)]
struct SynthesizeBody<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    #[serde(rename = "audioConfig")]
    audio_config: AudioConfigBody,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct VoiceSelection<'a> {
    #[serde(rename = "languageCode")]
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct AudioConfigBody {
    #[serde(rename = "audioEncoding")]
    audio_encoding: &'static str,
}

#[derive(Debug, Deserialize)]
struct SynthesizeResponseBody {
    #[serde(rename = "audioContent")]
    audio_content: Option<String>,
}

/// Google TTS 客户端配置
#[derive(Debug, Clone)]
pub struct GoogleTtsClientConfig {
    /// 服务基础 URL
    pub base_url: String,
    /// 计费项目（x-goog-user-project）
    pub project_id: Option<String>,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for GoogleTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://texttospeech.googleapis.com".to_string(),
            project_id: None,
            timeout_secs: 60,
        }
    }
}

impl GoogleTtsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Google Cloud TTS 客户端
pub struct GoogleTtsClient {
    client: Client,
    config: GoogleTtsClientConfig,
    auth: Arc<dyn AccessTokenSource>,
}

impl GoogleTtsClient {
    pub fn new(
        config: GoogleTtsClientConfig,
        auth: Arc<dyn AccessTokenSource>,
    ) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            config,
            auth,
        })
    }

    fn synthesize_url(&self) -> String {
        format!("{}/v1/text:synthesize", self.config.base_url.trim_end_matches('/'))
    }

    fn voices_url(&self) -> String {
        format!("{}/v1/voices", self.config.base_url.trim_end_matches('/'))
    }

    /// 每次请求都重新取令牌
    async fn authorize(&self, builder: RequestBuilder) -> Result<RequestBuilder, TtsError> {
        let token = self.auth.access_token().await.map_err(|e| {
            tracing::error!(error = %e, "Cloud TTS authentication failed");
            TtsError::ServiceError(e.to_string())
        })?;
        let builder = builder.bearer_auth(token);
        Ok(match &self.config.project_id {
            Some(project) => builder.header("x-goog-user-project", project),
            None => builder,
        })
    }
}

/// 解析 synthesize 响应体
fn decode_audio_content(body: &[u8]) -> Result<Vec<u8>, TtsError> {
    let parsed: SynthesizeResponseBody = serde_json::from_slice(body)
        .map_err(|e| TtsError::InvalidResponse(format!("Malformed JSON: {}", e)))?;

    let content = parsed
        .audio_content
        .filter(|c| !c.is_empty())
        .ok_or_else(|| TtsError::InvalidResponse("Missing audioContent".to_string()))?;

    base64::engine::general_purpose::STANDARD
        .decode(content)
        .map_err(|e| TtsError::InvalidResponse(format!("Invalid base64 audio: {}", e)))
}

#[async_trait]
impl TtsEnginePort for GoogleTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError> {
        let body = SynthesizeBody {
            input: SynthesisInput {
                text: &request.text,
            },
            voice: VoiceSelection {
                language_code: &request.language_code,
                name: &request.voice_name,
            },
            audio_config: AudioConfigBody {
                audio_encoding: "MP3",
            },
        };

        tracing::debug!(
            url = %self.synthesize_url(),
            text_len = request.text.len(),
            voice = %request.voice_name,
            "Sending TTS synthesize request"
        );

        let response = self
            .authorize(self.client.post(self.synthesize_url()))
            .await?
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else if e.is_connect() {
                    TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
                } else {
                    TtsError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to read body: {}", e)))?;
        let audio_data = decode_audio_content(&bytes)?;

        tracing::info!(
            voice = %request.voice_name,
            audio_size = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(SynthesisResponse {
            audio_data,
            format: AudioFormat::Mp3,
        })
    }

    async fn health_check(&self) -> bool {
        let Ok(builder) = self.authorize(self.client.get(self.voices_url())).await else {
            return false;
        };
        match builder.timeout(Duration::from_secs(5)).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::auth::{AuthError, StaticAccessToken};

    struct NoCredentials;

    #[async_trait]
    impl AccessTokenSource for NoCredentials {
        async fn access_token(&self) -> Result<String, AuthError> {
            Err(AuthError::Unavailable("no ADC found".to_string()))
        }
    }

    fn request(text: &str) -> SynthesisRequest {
        SynthesisRequest {
            text: text.to_string(),
            voice_name: "fr-FR-Wavenet-C".to_string(),
            language_code: "fr-FR".to_string(),
        }
    }

    #[test]
    fn test_config_default() {
        let config = GoogleTtsClientConfig::default();
        assert_eq!(config.base_url, "https://texttospeech.googleapis.com");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_config_builder() {
        let config = GoogleTtsClientConfig::new("http://localhost:9000/").with_timeout(5);
        let client = GoogleTtsClient::new(config, Arc::new(StaticAccessToken::new("t"))).unwrap();
        assert_eq!(client.synthesize_url(), "http://localhost:9000/v1/text:synthesize");
    }

    #[test]
    fn test_request_body_shape() {
        let body = SynthesizeBody {
            input: SynthesisInput { text: "Bonjour" },
            voice: VoiceSelection {
                language_code: "fr-FR",
                name: "fr-FR-Wavenet-C",
            },
            audio_config: AudioConfigBody {
                audio_encoding: "MP3",
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["input"]["text"], "Bonjour");
        assert_eq!(json["voice"]["languageCode"], "fr-FR");
        assert_eq!(json["voice"]["name"], "fr-FR-Wavenet-C");
        assert_eq!(json["audioConfig"]["audioEncoding"], "MP3");
    }

    #[test]
    fn test_decode_audio_content() {
        let audio = decode_audio_content(br#"{"audioContent": "SUQzBA=="}"#).unwrap();
        assert_eq!(audio, b"ID3\x04");
    }

    #[test]
    fn test_decode_missing_audio_content() {
        let err = decode_audio_content(br#"{}"#).unwrap_err();
        assert!(matches!(err, TtsError::InvalidResponse(_)));

        let err = decode_audio_content(br#"{"audioContent": "%%%"}"#).unwrap_err();
        assert!(matches!(err, TtsError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_requests_carry_token_and_billing_project() {
        let mut config = GoogleTtsClientConfig::default();
        config.project_id = Some("demo-project".to_string());
        let client =
            GoogleTtsClient::new(config, Arc::new(StaticAccessToken::new("ya29.tts"))).unwrap();

        let built = client
            .authorize(client.client.post(client.synthesize_url()))
            .await
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(built.headers()[reqwest::header::AUTHORIZATION], "Bearer ya29.tts");
        assert_eq!(built.headers()["x-goog-user-project"], "demo-project");
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_synthesis_and_health_check() {
        let config = GoogleTtsClientConfig::new("http://127.0.0.1:9");
        let client = GoogleTtsClient::new(config, Arc::new(NoCredentials)).unwrap();

        let err = client.synthesize(request("Bonjour")).await.unwrap_err();
        match err {
            TtsError::ServiceError(message) => assert!(message.contains("no ADC found")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!client.health_check().await);
    }
}
