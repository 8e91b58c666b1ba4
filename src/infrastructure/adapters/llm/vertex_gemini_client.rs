//! Vertex Gemini Client - 调用 Vertex AI generateContent
//!
//! 实现 DialogueGeneratorPort trait
//!
//! 外部 API:
//! POST https://{location}-aiplatform.googleapis.com/v1/projects/{project}/locations/{location}/publishers/google/models/{model}:generateContent
//! Request: {"contents": [{"role": "user", "parts": [{"text": "..."}]}]}
//! Response: {"candidates": [{"content": {"parts": [{"text": "..."}]}}]}

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{DialogueGeneratorPort, GeneratorError};
use crate::infrastructure::adapters::auth::AccessTokenSource;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Vertex Gemini 客户端配置
#[derive(Debug, Clone)]
pub struct VertexGeminiClientConfig {
    pub project_id: String,
    pub location: String,
    pub model: String,
    /// 覆盖默认的区域端点（代理或测试用）
    pub base_url: Option<String>,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl VertexGeminiClientConfig {
    pub fn new(project_id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            location: location.into(),
            model: "gemini-1.5-flash-002".to_string(),
            base_url: None,
            timeout_secs: 120,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Vertex AI Gemini 客户端
pub struct VertexGeminiClient {
    client: Client,
    config: VertexGeminiClientConfig,
    auth: Arc<dyn AccessTokenSource>,
}

impl VertexGeminiClient {
    pub fn new(
        config: VertexGeminiClientConfig,
        auth: Arc<dyn AccessTokenSource>,
    ) -> Result<Self, GeneratorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeneratorError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            config,
            auth,
        })
    }

    /// 每次请求都重新取令牌
    async fn authorize(&self, builder: RequestBuilder) -> Result<RequestBuilder, GeneratorError> {
        let token = self.auth.access_token().await.map_err(|e| {
            tracing::error!(error = %e, "Vertex AI authentication failed");
            GeneratorError::ServiceError(e.to_string())
        })?;
        Ok(builder.bearer_auth(token))
    }

    fn generate_url(&self) -> String {
        let base = self
            .config
            .base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}-aiplatform.googleapis.com", self.config.location));
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            base.trim_end_matches('/'),
            self.config.project_id,
            self.config.location,
            self.config.model
        )
    }
}

/// 取第一个候选的第一段文本
fn first_candidate_text(body: &[u8]) -> Result<String, GeneratorError> {
    let parsed: GenerateResponse = serde_json::from_slice(body)
        .map_err(|e| GeneratorError::InvalidResponse(format!("Malformed JSON: {}", e)))?;

    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or(GeneratorError::EmptyResponse)
}

#[async_trait]
impl DialogueGeneratorPort for VertexGeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(
            url = %self.generate_url(),
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending generateContent request"
        );

        let builder = self
            .authorize(self.client.post(self.generate_url()))
            .await?
            .json(&body);

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GeneratorError::Timeout
            } else if e.is_connect() {
                GeneratorError::NetworkError(format!("Cannot connect to Vertex AI: {}", e))
            } else {
                GeneratorError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeneratorError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GeneratorError::InvalidResponse(format!("Failed to read body: {}", e)))?;
        let text = first_candidate_text(&bytes)?;

        tracing::info!(
            model = %self.config.model,
            dialogue_len = text.len(),
            "Dialogue generated"
        );

        Ok(text)
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
            Err(AuthError::TokenFetch("refresh token revoked".to_string()))
        }
    }

    fn static_token() -> Arc<dyn AccessTokenSource> {
        Arc::new(StaticAccessToken::new("ya29.test"))
    }

    #[test]
    fn test_generate_url() {
        let config = VertexGeminiClientConfig::new("my-project", "europe-west1");
        let client = VertexGeminiClient::new(config, static_token()).unwrap();
        assert_eq!(
            client.generate_url(),
            "https://europe-west1-aiplatform.googleapis.com/v1/projects/my-project/locations/europe-west1/publishers/google/models/gemini-1.5-flash-002:generateContent"
        );
    }

    #[test]
    fn test_generate_url_with_override() {
        let mut config = VertexGeminiClientConfig::new("p", "us-central1").with_model("gemini-pro");
        config.base_url = Some("http://localhost:8080/".to_string());
        let client = VertexGeminiClient::new(config, static_token()).unwrap();
        assert_eq!(
            client.generate_url(),
            "http://localhost:8080/v1/projects/p/locations/us-central1/publishers/google/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_first_candidate_text() {
        let body = br#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Amina: Bonjour"},{"text":"ignored"}]}},{"content":{"parts":[{"text":"second"}]}}]}"#;
        assert_eq!(first_candidate_text(body).unwrap(), "Amina: Bonjour");
    }

    #[test]
    fn test_no_candidates_is_an_error() {
        assert!(matches!(
            first_candidate_text(br#"{"candidates":[]}"#),
            Err(GeneratorError::EmptyResponse)
        ));
        assert!(matches!(
            first_candidate_text(br#"{"promptFeedback":{"blockReason":"SAFETY"}}"#),
            Err(GeneratorError::EmptyResponse)
        ));
        assert!(matches!(
            first_candidate_text(b"not json"),
            Err(GeneratorError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: "prompt" }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "prompt");
    }

    #[tokio::test]
    async fn test_requests_carry_fresh_bearer_token() {
        let config = VertexGeminiClientConfig::new("p", "europe-west1");
        let client = VertexGeminiClient::new(config, static_token()).unwrap();

        let request = client
            .authorize(client.client.post(client.generate_url()))
            .await
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers()[reqwest::header::AUTHORIZATION],
            "Bearer ya29.test"
        );
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_sending() {
        let mut config = VertexGeminiClientConfig::new("p", "europe-west1");
        // 不可达地址：若真的发出请求会得到网络错误而不是服务错误
        config.base_url = Some("http://127.0.0.1:9".to_string());
        let client = VertexGeminiClient::new(config, Arc::new(NoCredentials)).unwrap();

        let err = client.generate("prompt").await.unwrap_err();
        match err {
            GeneratorError::ServiceError(message) => {
                assert!(message.contains("refresh token revoked"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
