use async_trait::async_trait;
use serde::Serialize;

use super::fields::RELAY_FIELDS;
use super::{http_client, RewriteError, Rewriter};
use crate::domain::rewrite::{RewriteRequest, RewriteSource};

/// バックエンドリレー（send-text-to-api）経由のリライター
pub struct RelayRewriter {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RelayRequest<'a> {
    input_text: &'a str,
    selected_style: &'a str,
}

impl RelayRewriter {
    pub fn new(url: String, api_key: Option<String>, timeout: std::time::Duration) -> Self {
        Self {
            client: http_client(timeout),
            url,
            api_key,
        }
    }
}

#[async_trait]
impl Rewriter for RelayRewriter {
    async fn rewrite(&self, request: &RewriteRequest) -> Result<String, RewriteError> {
        let body = RelayRequest {
            input_text: request.text(),
            selected_style: request.style_tag(),
        };

        let mut builder = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key).header("apikey", key);
        }

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RewriteError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        RELAY_FIELDS.extract_from_body(&text)
    }

    fn source(&self) -> RewriteSource {
        RewriteSource::Relay
    }

    fn name(&self) -> &str {
        "relay"
    }
}
