use std::sync::Arc;
use std::time::Duration;

use crate::domain::rewrite::{EmptyInputError, RewriteRequest, RewriteResult, RewriteSource};
use crate::domain::settings::HumanizerSettings;
use crate::infra::metrics::Metrics;
use crate::infra::rewriter::{
    DirectRewriter, FallbackRewriter, RelayRewriter, RewriteError, Rewriter,
};

/// 1回の試行結果
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(RewriteResult),
    Failed {
        source: RewriteSource,
        error: RewriteError,
    },
}

/// リライトオーケストレーター。
///
/// 登録順にリモート戦略を一つずつ試し、最初の成功を返す。
/// 全て失敗した場合はローカルフォールバックで必ず結果を返す。
/// 試行は逐次実行され、同時に実行中の外部呼び出しは常に一つ以下。
pub struct RewriteOrchestrator {
    strategies: Vec<Arc<dyn Rewriter>>,
    fallback: FallbackRewriter,
    attempt_timeout: Duration,
    metrics: Arc<Metrics>,
}

impl RewriteOrchestrator {
    pub fn new(
        strategies: Vec<Arc<dyn Rewriter>>,
        fallback: FallbackRewriter,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            strategies,
            fallback,
            attempt_timeout,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// 設定から relay → direct → fallback の順で構築する
    pub fn from_settings(settings: &HumanizerSettings) -> Self {
        let timeout = settings.attempt_timeout();
        let mut strategies: Vec<Arc<dyn Rewriter>> = Vec::new();

        match &settings.relay_url {
            Some(url) => strategies.push(Arc::new(RelayRewriter::new(
                url.clone(),
                settings.relay_api_key.clone(),
                timeout,
            ))),
            None => log::info!("relay URL not configured, skipping relay attempt"),
        }
        strategies.push(Arc::new(DirectRewriter::new(settings)));

        Self::new(
            strategies,
            FallbackRewriter::new(settings.fallback_substitution),
            timeout,
        )
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// 試行順のストラテジー名
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// 入力検証後にリライトする。空入力は外部呼び出し前にエラー。
    pub async fn rewrite(&self, text: &str, style: &str) -> Result<RewriteResult, EmptyInputError> {
        let request = RewriteRequest::new(text, style).inspect_err(|_| {
            self.metrics.inc_rejected_empty();
        })?;
        Ok(self.run(&request).await)
    }

    /// 検証済みリクエストを処理する。失敗しない。
    pub async fn run(&self, request: &RewriteRequest) -> RewriteResult {
        for strategy in &self.strategies {
            match self.attempt(strategy.as_ref(), request).await {
                AttemptOutcome::Success(result) => return result,
                AttemptOutcome::Failed { source, error } => {
                    log::warn!(
                        "{} attempt failed, falling through: {error}",
                        source.as_str()
                    );
                    self.metrics.inc_attempt_failure(source);
                }
            }
        }

        let start = tokio::time::Instant::now();
        let result = self.fallback.rewrite(request);
        self.record_success(RewriteSource::Fallback, start);
        log::info!("rewrite served by local fallback");
        result
    }

    async fn attempt(&self, strategy: &dyn Rewriter, request: &RewriteRequest) -> AttemptOutcome {
        let source = strategy.source();
        let start = tokio::time::Instant::now();
        log::debug!(
            "attempting {} rewrite ({})",
            source.as_str(),
            strategy.name()
        );

        let call = tokio::time::timeout(self.attempt_timeout, strategy.rewrite(request));
        let outcome = match call.await {
            Ok(result) => result,
            Err(_) => Err(RewriteError::Timeout),
        };

        match outcome {
            Ok(text) => {
                self.record_success(source, start);
                AttemptOutcome::Success(RewriteResult::new(text, source))
            }
            Err(error) => AttemptOutcome::Failed { source, error },
        }
    }

    fn record_success(&self, source: RewriteSource, start: tokio::time::Instant) {
        self.metrics.inc_rewrite(source);
        self.metrics
            .record_latency(source, start.elapsed().as_millis() as u64);
    }
}
