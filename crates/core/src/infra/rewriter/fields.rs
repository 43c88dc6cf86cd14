//! レスポンスからリライト結果を取り出すフィールド優先順位ポリシー。
//!
//! 受理するフィールド名は閉じた集合として定義する。上流の契約変更を
//! 黙って受け入れないよう、raw 変換はポリシーで明示的に許可した場合のみ行う。

use serde_json::Value;

use super::RewriteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseFields {
    /// 優先順に確認するフィールド名
    pub names: &'static [&'static str],
    /// どのフィールドも無い場合にレスポンス全体を文字列化して受理するか
    pub coerce_raw: bool,
}

/// send-text-to-api リレーのレスポンス
pub const RELAY_FIELDS: ResponseFields = ResponseFields {
    names: &["rewrittenText", "secondApiData"],
    coerce_raw: true,
};

/// humanizer API のレスポンス
pub const DIRECT_FIELDS: ResponseFields = ResponseFields {
    names: &["humanized_text", "result"],
    coerce_raw: false,
};

impl ResponseFields {
    /// 最初に見つかった非空の文字列フィールドを返す。
    ///
    /// `null` は本文なし扱い。既知フィールドが存在するのに空白のみの場合は
    /// raw 変換せずエラーにする。
    pub fn extract(&self, body: &Value) -> Result<String, RewriteError> {
        if body.is_null() {
            return Err(RewriteError::Format("missing body".to_string()));
        }

        let mut present = false;
        for name in self.names {
            let Some(field) = body.get(*name) else {
                continue;
            };
            present = true;
            if let Some(text) = field.as_str() {
                if !text.trim().is_empty() {
                    return Ok(text.to_string());
                }
            }
        }

        if present {
            return Err(RewriteError::Format(format!(
                "[{}] present but empty",
                self.names.join(", ")
            )));
        }

        if self.coerce_raw {
            return Ok(coerce_display(body));
        }

        Err(RewriteError::Format(format!("none of [{}] present", self.names.join(", "))))
    }

    /// 生のレスポンスボディを解析して extract する。空ボディと非 JSON はエラー。
    pub fn extract_from_body(&self, body: &str) -> Result<String, RewriteError> {
        if body.trim().is_empty() {
            return Err(RewriteError::Format("missing body".to_string()));
        }
        let value: Value = serde_json::from_str(body)
            .map_err(|e| RewriteError::Format(format!("Response parse error: {e}")))?;
        self.extract(&value)
    }
}

fn coerce_display(body: &Value) -> String {
    match body {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primary_field_wins() {
        let body = json!({ "rewrittenText": "primary", "secondApiData": "secondary" });
        assert_eq!(RELAY_FIELDS.extract(&body).unwrap(), "primary");
    }

    #[test]
    fn alternate_field_used_when_primary_missing_or_empty() {
        let body = json!({ "secondApiData": "secondary" });
        assert_eq!(RELAY_FIELDS.extract(&body).unwrap(), "secondary");

        let body = json!({ "rewrittenText": "", "secondApiData": "secondary" });
        assert_eq!(RELAY_FIELDS.extract(&body).unwrap(), "secondary");
    }

    #[test]
    fn relay_coerces_raw_body() {
        let body = json!("just a string");
        assert_eq!(RELAY_FIELDS.extract(&body).unwrap(), "just a string");

        let body = json!({ "message": "ok" });
        assert_eq!(RELAY_FIELDS.extract(&body).unwrap(), r#"{"message":"ok"}"#);
    }

    #[test]
    fn relay_null_body_is_missing() {
        let err = RELAY_FIELDS.extract_from_body("null").unwrap_err();
        assert!(matches!(err, RewriteError::Format(ref m) if m == "missing body"));
    }

    #[test]
    fn relay_empty_known_field_is_not_coerced() {
        for body in [
            r#"{"rewrittenText":""}"#,
            r#"{"secondApiData":"   "}"#,
            r#"{"rewrittenText":null}"#,
        ] {
            let err = RELAY_FIELDS.extract_from_body(body).unwrap_err();
            assert!(matches!(err, RewriteError::Format(_)), "{body}");
        }
    }

    #[test]
    fn direct_rejects_unknown_shape() {
        let body = json!({ "output": "text" });
        let err = DIRECT_FIELDS.extract(&body).unwrap_err();
        assert!(matches!(err, RewriteError::Format(_)));
    }

    #[test]
    fn direct_checks_both_names() {
        let body = json!({ "humanized_text": "a" });
        assert_eq!(DIRECT_FIELDS.extract(&body).unwrap(), "a");

        let body = json!({ "result": "b" });
        assert_eq!(DIRECT_FIELDS.extract(&body).unwrap(), "b");
    }

    #[test]
    fn non_string_field_is_ignored() {
        let body = json!({ "humanized_text": 42, "result": "ok" });
        assert_eq!(DIRECT_FIELDS.extract(&body).unwrap(), "ok");
    }

    #[test]
    fn body_errors() {
        assert!(matches!(
            RELAY_FIELDS.extract_from_body("   "),
            Err(RewriteError::Format(_))
        ));
        assert!(matches!(
            RELAY_FIELDS.extract_from_body("<html>"),
            Err(RewriteError::Format(_))
        ));
        assert_eq!(
            RELAY_FIELDS
                .extract_from_body(r#"{"secondApiData":"x"}"#)
                .unwrap(),
            "x"
        );
    }
}
