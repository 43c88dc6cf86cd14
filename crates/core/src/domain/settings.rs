use serde::{Deserialize, Serialize};

use crate::domain::error::AppError;

/// humanizer クライアント設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanizerSettings {
    /// デフォルトスタイル
    pub default_style: String,
    /// リレーエンドポイント（send-text-to-api）。None なら relay 試行をスキップ
    pub relay_url: Option<String>,
    /// リレー用 API キー（Authorization / apikey ヘッダ）
    pub relay_api_key: Option<String>,
    /// 外部 humanizer API エンドポイント
    pub direct_endpoint: String,
    /// 外部 API に送るクライアント ID
    pub client_id: String,
    pub model: String,
    pub user_agent: String,
    pub document_type: String,
    pub source_url: String,
    /// 各試行のタイムアウト（ミリ秒）
    pub attempt_timeout_ms: u64,
    /// ローカルフォールバック結果でもクレジットを消費するか
    pub charge_fallback: bool,
    /// フォールバック時に単語置換を適用するか
    pub fallback_substitution: bool,
}

pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:8787/functions/v1/send-text-to-api";
pub const DEFAULT_DIRECT_ENDPOINT: &str = "https://humanize.undetectable.ai/submit";

impl Default for HumanizerSettings {
    fn default() -> Self {
        Self {
            default_style: "fluent".to_string(),
            relay_url: Some(DEFAULT_RELAY_URL.to_string()),
            relay_api_key: None,
            direct_endpoint: DEFAULT_DIRECT_ENDPOINT.to_string(),
            client_id: "79b84da7-bb2a-4e36-a135-e77e0f3e5144".to_string(),
            model: "v2".to_string(),
            user_agent: "TextHuman Web App".to_string(),
            document_type: "Text".to_string(),
            source_url: "https://example.com/".to_string(),
            attempt_timeout_ms: 8_000,
            charge_fallback: false,
            fallback_substitution: false,
        }
    }
}

impl HumanizerSettings {
    /// `TH_*` 環境変数で上書きした設定を返す
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// lookup から取得できた値で上書きする。数値/真偽値が不正な場合は既存値を保持。
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("TH_RELAY_URL") {
            // 空文字列で relay を無効化できる
            self.relay_url = if url.trim().is_empty() {
                None
            } else {
                Some(url)
            };
        }
        if let Some(key) = lookup("TH_RELAY_API_KEY") {
            self.relay_api_key = Some(key);
        }
        if let Some(endpoint) = lookup("TH_DIRECT_ENDPOINT") {
            self.direct_endpoint = endpoint;
        }
        if let Some(id) = lookup("TH_CLIENT_ID") {
            self.client_id = id;
        }
        if let Some(style) = lookup("TH_DEFAULT_STYLE") {
            self.default_style = style;
        }
        if let Some(ms) = lookup("TH_ATTEMPT_TIMEOUT_MS") {
            match ms.parse() {
                Ok(ms) => self.attempt_timeout_ms = ms,
                Err(_) => log::warn!("TH_ATTEMPT_TIMEOUT_MS is not a number: {ms}"),
            }
        }
        if let Some(flag) = lookup("TH_CHARGE_FALLBACK") {
            self.charge_fallback = parse_flag(&flag).unwrap_or(self.charge_fallback);
        }
        if let Some(flag) = lookup("TH_FALLBACK_SUBSTITUTION") {
            self.fallback_substitution = parse_flag(&flag).unwrap_or(self.fallback_substitution);
        }
        self
    }

    /// 1フィールドを書き換えた設定を返す。
    /// 値は JSON として解釈し、解釈できなければ文字列として扱う。`null` で Option を消去する。
    pub fn with_field(&self, key: &str, value: &str) -> Result<Self, AppError> {
        let mut json = serde_json::to_value(self)
            .map_err(|e| AppError::internal(format!("settings serialize: {e}")))?;
        let Some(fields) = json.as_object_mut() else {
            return Err(AppError::internal("settings is not an object"));
        };
        if !fields.contains_key(key) {
            return Err(AppError::invalid_input(format!("unknown setting: {key}")));
        }

        let parsed = serde_json::from_str(value)
            .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
        fields.insert(key.to_string(), parsed);

        serde_json::from_value(json)
            .map_err(|e| AppError::invalid_input(format!("invalid value for {key}: {e}")))
    }

    pub fn attempt_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.attempt_timeout_ms)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_humanizer_constants() {
        let s = HumanizerSettings::default();
        assert_eq!(s.model, "v2");
        assert_eq!(s.user_agent, "TextHuman Web App");
        assert_eq!(s.document_type, "Text");
        assert_eq!(s.source_url, "https://example.com/");
        assert_eq!(s.direct_endpoint, DEFAULT_DIRECT_ENDPOINT);
        assert!(!s.charge_fallback);
    }

    #[test]
    fn overrides_apply() {
        let s = HumanizerSettings::default().with_overrides(lookup(&[
            ("TH_RELAY_URL", "http://relay.test/fn"),
            ("TH_ATTEMPT_TIMEOUT_MS", "1500"),
            ("TH_CHARGE_FALLBACK", "yes"),
        ]));
        assert_eq!(s.relay_url.as_deref(), Some("http://relay.test/fn"));
        assert_eq!(s.attempt_timeout_ms, 1500);
        assert!(s.charge_fallback);
    }

    #[test]
    fn empty_relay_url_disables_relay() {
        let s = HumanizerSettings::default().with_overrides(lookup(&[("TH_RELAY_URL", "")]));
        assert!(s.relay_url.is_none());
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let s = HumanizerSettings::default().with_overrides(lookup(&[
            ("TH_ATTEMPT_TIMEOUT_MS", "soon"),
            ("TH_CHARGE_FALLBACK", "maybe"),
        ]));
        assert_eq!(s.attempt_timeout_ms, 8_000);
        assert!(!s.charge_fallback);
    }

    #[test]
    fn with_field_updates_typed_values() {
        let s = HumanizerSettings::default()
            .with_field("attempt_timeout_ms", "2500")
            .unwrap()
            .with_field("default_style", "formal")
            .unwrap()
            .with_field("relay_url", "null")
            .unwrap();
        assert_eq!(s.attempt_timeout_ms, 2500);
        assert_eq!(s.default_style, "formal");
        assert!(s.relay_url.is_none());
    }

    #[test]
    fn with_field_rejects_unknown_key_and_bad_type() {
        let s = HumanizerSettings::default();
        let err = s.with_field("colour", "blue").unwrap_err();
        assert_eq!(err.code, crate::domain::error::ErrorCode::InvalidInput);

        let err = s.with_field("charge_fallback", "sometimes").unwrap_err();
        assert_eq!(err.code, crate::domain::error::ErrorCode::InvalidInput);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let s: HumanizerSettings = serde_json::from_str(r#"{"charge_fallback":true}"#).unwrap();
        assert!(s.charge_fallback);
        assert_eq!(s.model, "v2");
    }
}
