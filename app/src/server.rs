use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use th_core::domain::rewrite::RewriteRequest;
use th_core::domain::settings::HumanizerSettings;
use th_core::domain::style::map_style;
use th_core::infra::rewriter::fallback::normalize_sentences;
use th_core::infra::rewriter::FallbackRewriter;
use th_core::usecase::orchestrator::RewriteOrchestrator;

use crate::commands::CommandError;
use crate::payload::{
    RelayErrorPayload, RelayPayload, RelaySuccessPayload, CORS_ALLOW_HEADERS, CORS_ALLOW_ORIGIN,
    FUNCTION_PATH,
};

pub const DEFAULT_BIND: &str = "127.0.0.1:8787";

/// リレーサーバー設定
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind: String,
    /// true なら外部 humanizer へ転送し、失敗時のみローカル処理
    pub forward_upstream: bool,
    pub settings: HumanizerSettings,
}

impl RelayConfig {
    /// TH_RELAY_BIND / TH_FORWARD_UPSTREAM から構築する
    pub fn from_env(settings: HumanizerSettings) -> Self {
        let bind = std::env::var("TH_RELAY_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let forward_upstream = std::env::var("TH_FORWARD_UPSTREAM")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);
        Self {
            bind,
            forward_upstream,
            settings,
        }
    }
}

/// ハンドラ共有状態
#[derive(Clone)]
pub struct RelayState {
    upstream: Option<Arc<RewriteOrchestrator>>,
    fallback: FallbackRewriter,
}

impl RelayState {
    /// ローカル処理のみ
    pub fn local(settings: &HumanizerSettings) -> Self {
        Self {
            upstream: None,
            fallback: FallbackRewriter::new(settings.fallback_substitution),
        }
    }

    /// 外部 humanizer へ転送する（自分自身への relay 試行は除外）
    pub fn forwarding(settings: &HumanizerSettings) -> Self {
        let direct_only = HumanizerSettings {
            relay_url: None,
            ..settings.clone()
        };
        Self {
            upstream: Some(Arc::new(RewriteOrchestrator::from_settings(&direct_only))),
            fallback: FallbackRewriter::new(settings.fallback_substitution),
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        if config.forward_upstream {
            Self::forwarding(&config.settings)
        } else {
            Self::local(&config.settings)
        }
    }

    async fn rewrite(&self, text: &str, style: &str) -> String {
        let request = match RewriteRequest::new(text, style) {
            Ok(request) => request,
            // 空入力はそのまま正規化して返す
            Err(_) => return normalize_sentences(text),
        };
        match &self.upstream {
            Some(orchestrator) => orchestrator.run(&request).await.text,
            None => self.fallback.rewrite(&request).text,
        }
    }
}

async fn send_text_to_api(State(state): State<RelayState>, body: Bytes) -> Response {
    let payload: RelayPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "invalid request body");
            return (StatusCode::BAD_REQUEST, Json(RelayErrorPayload::bad_request()))
                .into_response();
        }
    };

    let style = payload.selected_style.unwrap_or_default();
    let mapping = map_style(&style);
    tracing::info!(
        input_len = payload.input_text.len(),
        style = %style,
        readability = mapping.readability,
        purpose = mapping.purpose,
        strength = mapping.strength,
        "received request"
    );

    let text = state.rewrite(&payload.input_text, &style).await;
    Json(RelaySuccessPayload::new(text)).into_response()
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub fn router(state: RelayState) -> Router {
    Router::new()
        .route(FUNCTION_PATH, post(send_text_to_api).options(preflight))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(CORS_ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CORS_ALLOW_HEADERS),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: RelayConfig) -> Result<(), CommandError> {
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(
        bind = %config.bind,
        forward_upstream = config.forward_upstream,
        "relay listening on {FUNCTION_PATH}"
    );
    axum::serve(listener, router(RelayState::from_config(&config))).await?;
    Ok(())
}
