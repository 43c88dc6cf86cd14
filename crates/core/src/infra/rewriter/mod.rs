pub mod direct;
pub mod fallback;
pub mod fields;
pub mod lexicon;
pub mod relay;

pub use direct::DirectRewriter;
pub use fallback::FallbackRewriter;
pub use relay::RelayRewriter;

use async_trait::async_trait;

use crate::domain::rewrite::{RewriteRequest, RewriteSource};

/// リライトエラー（オーケストレーター内で吸収され、次の試行に進む）
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("HTTP request failed: {0}")]
    Transport(String),
    #[error("API request failed with status: {0}")]
    Status(u16),
    #[error("Unexpected API response format: {0}")]
    Format(String),
    #[error("Rewrite timeout")]
    Timeout,
}

impl From<reqwest::Error> for RewriteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RewriteError::Timeout
        } else {
            RewriteError::Transport(e.to_string())
        }
    }
}

/// リモートのリライト戦略。オーケストレーターが順番に試行する。
#[async_trait]
pub trait Rewriter: Send + Sync {
    async fn rewrite(&self, request: &RewriteRequest) -> Result<String, RewriteError>;

    /// 成功時に結果へ付与される出所
    fn source(&self) -> RewriteSource;

    fn name(&self) -> &str;
}

/// 共有 HTTP クライアントを生成する
pub(crate) fn http_client(timeout: std::time::Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client")
}
