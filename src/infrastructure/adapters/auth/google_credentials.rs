//! Google Cloud 访问令牌来源
//!
//! 每次请求前取令牌。Application Default Credentials 由 gcp_auth 负责缓存与刷新，
//! 固定令牌只用于本地调试（约一小时后过期）。

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Vertex AI 与 Cloud TTS 共用的 OAuth scope
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// 取令牌失败
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No Google credentials available: {0}")]
    Unavailable(String),

    #[error("Failed to fetch access token: {0}")]
    TokenFetch(String),
}

/// 访问令牌来源
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, AuthError>;
}

/// 固定令牌（GOOGLE_ACCESS_TOKEN）
pub struct StaticAccessToken {
    token: String,
}

impl StaticAccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AccessTokenSource for StaticAccessToken {
    async fn access_token(&self) -> Result<String, AuthError> {
        Ok(self.token.clone())
    }
}

/// Application Default Credentials
///
/// 依次尝试 GOOGLE_APPLICATION_CREDENTIALS、gcloud 用户凭据、GCE 元数据服务
pub struct ApplicationDefaultCredentials {
    provider: Arc<dyn gcp_auth::TokenProvider>,
}

impl ApplicationDefaultCredentials {
    /// 启动时探测凭据，找不到则返回错误
    pub async fn discover() -> Result<Self, AuthError> {
        let provider = gcp_auth::provider()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;
        tracing::info!("Google Application Default Credentials found");
        Ok(Self { provider })
    }
}

#[async_trait]
impl AccessTokenSource for ApplicationDefaultCredentials {
    async fn access_token(&self) -> Result<String, AuthError> {
        let token = self
            .provider
            .token(&[CLOUD_PLATFORM_SCOPE])
            .await
            .map_err(|e| AuthError::TokenFetch(e.to_string()))?;
        Ok(token.as_str().to_string())
    }
}
