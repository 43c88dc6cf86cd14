use serde::{Deserialize, Serialize};

/// send-text-to-api のパス
pub const FUNCTION_PATH: &str = "/functions/v1/send-text-to-api";

/// CORS ヘッダ値
pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// リクエストペイロード
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayPayload {
    pub input_text: String,
    #[serde(default)]
    pub selected_style: Option<String>,
}

/// 成功レスポンス
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelaySuccessPayload {
    pub second_api_data: String,
    pub message: &'static str,
}

impl RelaySuccessPayload {
    pub fn new(text: String) -> Self {
        Self {
            second_api_data: text,
            message: "Text rewritten successfully",
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Clone, Serialize)]
pub struct RelayErrorPayload {
    pub error: &'static str,
}

impl RelayErrorPayload {
    pub fn bad_request() -> Self {
        Self {
            error: "Failed to process request",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_accepts_missing_style() {
        let p: RelayPayload = serde_json::from_str(r#"{"inputText":"Hi."}"#).unwrap();
        assert_eq!(p.input_text, "Hi.");
        assert!(p.selected_style.is_none());
    }

    #[test]
    fn payload_requires_input_text() {
        assert!(serde_json::from_str::<RelayPayload>(r#"{"selectedStyle":"formal"}"#).is_err());
    }

    #[test]
    fn success_payload_shape() {
        let json = serde_json::to_value(RelaySuccessPayload::new("x".into())).unwrap();
        assert_eq!(json["secondApiData"], "x");
        assert_eq!(json["message"], "Text rewritten successfully");
    }
}
