use async_trait::async_trait;
use serde::Serialize;

use super::fields::DIRECT_FIELDS;
use super::{http_client, RewriteError, Rewriter};
use crate::domain::rewrite::{RewriteRequest, RewriteSource};
use crate::domain::settings::HumanizerSettings;

/// 外部 humanizer API を直接呼ぶリライター
pub struct DirectRewriter {
    client: reqwest::Client,
    endpoint: String,
    identity: ClientIdentity,
}

/// リクエストに毎回含める固定の識別フィールド
#[derive(Debug, Clone)]
struct ClientIdentity {
    id: String,
    model: String,
    user_agent: String,
    document_type: String,
    url: String,
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    id: &'a str,
    content: &'a str,
    readability: &'a str,
    purpose: &'a str,
    strength: &'a str,
    model: &'a str,
    user_agent: &'a str,
    document_type: &'a str,
    url: &'a str,
}

impl DirectRewriter {
    pub fn new(settings: &HumanizerSettings) -> Self {
        Self {
            client: http_client(settings.attempt_timeout()),
            endpoint: settings.direct_endpoint.clone(),
            identity: ClientIdentity {
                id: settings.client_id.clone(),
                model: settings.model.clone(),
                user_agent: settings.user_agent.clone(),
                document_type: settings.document_type.clone(),
                url: settings.source_url.clone(),
            },
        }
    }

    fn submit_body<'a>(&'a self, request: &'a RewriteRequest) -> SubmitRequest<'a> {
        let mapping = request.style().mapping();
        SubmitRequest {
            id: &self.identity.id,
            content: request.text(),
            readability: mapping.readability,
            purpose: mapping.purpose,
            strength: mapping.strength,
            model: &self.identity.model,
            user_agent: &self.identity.user_agent,
            document_type: &self.identity.document_type,
            url: &self.identity.url,
        }
    }
}

#[async_trait]
impl Rewriter for DirectRewriter {
    async fn rewrite(&self, request: &RewriteRequest) -> Result<String, RewriteError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(&self.submit_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RewriteError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RewriteError::Format(format!("Response parse error: {e}")))?;

        DIRECT_FIELDS.extract(&body)
    }

    fn source(&self) -> RewriteSource {
        RewriteSource::Direct
    }

    fn name(&self) -> &str {
        "direct"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_body_carries_mapping_and_identity() {
        let rewriter = DirectRewriter::new(&HumanizerSettings::default());
        let request = RewriteRequest::new("Some text.", "creative").unwrap();
        let json = serde_json::to_value(rewriter.submit_body(&request)).unwrap();

        assert_eq!(json["id"], "79b84da7-bb2a-4e36-a135-e77e0f3e5144");
        assert_eq!(json["content"], "Some text.");
        assert_eq!(json["readability"], "Journalist");
        assert_eq!(json["purpose"], "Story");
        assert_eq!(json["strength"], "More Human");
        assert_eq!(json["model"], "v2");
        assert_eq!(json["user_agent"], "TextHuman Web App");
        assert_eq!(json["document_type"], "Text");
        assert_eq!(json["url"], "https://example.com/");
    }

    #[test]
    fn unknown_style_uses_default_mapping() {
        let rewriter = DirectRewriter::new(&HumanizerSettings::default());
        let request = RewriteRequest::new("Some text.", "baroque").unwrap();
        let json = serde_json::to_value(rewriter.submit_body(&request)).unwrap();
        assert_eq!(json["readability"], "University");
        assert_eq!(json["strength"], "Balanced");
    }
}
