//! Liveness Handler

/// 存活检查
pub async fn hello() -> &'static str {
    "Hello everyone"
}
