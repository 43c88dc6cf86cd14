use serde::{Deserialize, Serialize};

use super::style::Style;

// ─── RewriteRequest ──────────────────────────────────────────────

/// 空白のみ / 空の入力。ネットワーク呼び出し前に検出される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("input text is empty")]
pub struct EmptyInputError;

/// 検証済みのリライトリクエスト。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRequest {
    text: String,
    /// 呼び出し元が指定したタグ（リレーにはそのまま転送する）
    style_tag: String,
    style: Style,
}

impl RewriteRequest {
    /// テキストに非空白文字が一つ以上含まれていれば生成できる。
    pub fn new(text: impl Into<String>, style: impl Into<String>) -> Result<Self, EmptyInputError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(EmptyInputError);
        }
        let style_tag = style.into();
        let style = Style::from_tag_or_default(&style_tag);
        Ok(Self {
            text,
            style_tag,
            style,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style_tag(&self) -> &str {
        &self.style_tag
    }

    /// 解決済みスタイル（未知タグは Fluent）
    pub fn style(&self) -> Style {
        self.style
    }
}

// ─── RewriteResult ───────────────────────────────────────────────

/// 結果を生成した試行。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteSource {
    Relay,
    Direct,
    Fallback,
}

impl RewriteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewriteSource::Relay => "relay",
            RewriteSource::Direct => "direct",
            RewriteSource::Fallback => "fallback",
        }
    }

    /// 有料サービスを経由した結果かどうか
    pub fn is_remote(&self) -> bool {
        !matches!(self, RewriteSource::Fallback)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteResult {
    pub text: String,
    pub source: RewriteSource,
}

impl RewriteResult {
    pub fn new(text: impl Into<String>, source: RewriteSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_rejects_blank_text() {
        assert_eq!(RewriteRequest::new("", "fluent"), Err(EmptyInputError));
        assert_eq!(
            RewriteRequest::new(" \t\n ", "fluent"),
            Err(EmptyInputError)
        );
    }

    #[test]
    fn request_keeps_tag_and_resolves_style() {
        let req = RewriteRequest::new("Hi there.", "mystery").unwrap();
        assert_eq!(req.text(), "Hi there.");
        assert_eq!(req.style_tag(), "mystery");
        assert_eq!(req.style(), Style::Fluent);

        let req = RewriteRequest::new("Hi there.", "formal").unwrap();
        assert_eq!(req.style(), Style::Formal);
    }

    #[test]
    fn only_fallback_is_local() {
        assert!(RewriteSource::Relay.is_remote());
        assert!(RewriteSource::Direct.is_remote());
        assert!(!RewriteSource::Fallback.is_remote());
    }
}
