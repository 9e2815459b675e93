//! Gemini `generateContent` client constrained to the campaign response schema.

use super::{decode_draft, CampaignExtractor, ExtractError};
use crate::config::AiConfig;
use crate::model::CampaignDraft;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

const EXTRACTION_INSTRUCTION: &str = "Analise o seguinte texto de missões da FJU (Força Jovem Universal).
Extraia o título da campanha (semana), o versículo bíblico (se houver), e a lista de missões.
Para cada missão, identifique o título da missão e as regras de pontuação (label e pontos).

Texto:
";

pub struct GeminiExtractor {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiExtractor {
    pub fn new(cfg: &AiConfig, api_key: String, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            api_key: api_key.trim().to_string(),
            model: cfg.model.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "parts": [{ "text": format!("{EXTRACTION_INSTRUCTION}{text}") }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            }
        })
    }
}

/// Declared output contract: weekTitle, verse, missions[{title, rules[{description, points}]}].
pub(crate) fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "weekTitle": { "type": "STRING" },
            "verse": { "type": "STRING" },
            "missions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "rules": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "description": { "type": "STRING" },
                                    "points": { "type": "NUMBER" }
                                }
                            }
                        }
                    }
                }
            }
        }
    })
}

#[async_trait]
impl CampaignExtractor for GeminiExtractor {
    async fn extract(&self, text: &str) -> Result<CampaignDraft, ExtractError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!(model = %self.model, chars = text.len(), "requesting campaign extraction");

        let resp = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(text))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "extraction request rejected");
            return Err(ExtractError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.bytes().await?;
        let json: serde_json::Value = serde_json::from_slice(&body)?;
        let content = json["candidates"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["content"]["parts"].as_array())
            .and_then(|parts| parts.first())
            .and_then(|p| p["text"].as_str())
            .ok_or(ExtractError::EmptyResponse)?;

        decode_draft(content)
    }
}
