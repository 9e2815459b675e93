use super::{CampaignStore, Result, StoreError};
use crate::config::DatabaseConfig;
use crate::model::Campaign;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

/// Campaign table exposed through PostgREST (`{url}/rest/v1/{table}`).
pub struct PostgrestStore {
    client: Client,
    endpoint: String,
}

impl PostgrestStore {
    pub fn new(cfg: &DatabaseConfig, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&cfg.api_key)
            .map_err(|_| anyhow::anyhow!("database api key contains invalid characters"))?;
        headers.insert("apikey", key);
        let bearer = HeaderValue::from_str(&format!("Bearer {}", cfg.api_key))
            .map_err(|_| anyhow::anyhow!("database api key contains invalid characters"))?;
        headers.insert(AUTHORIZATION, bearer);

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(format!("tribe-points/{}", env!("CARGO_PKG_VERSION")));
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/rest/v1/{}",
                cfg.url.trim_end_matches('/'),
                cfg.table
            ),
        })
    }
}

async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), %body, "database request rejected");
    Err(StoreError::Api {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl CampaignStore for PostgrestStore {
    async fn list(&self) -> Result<Vec<Campaign>> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("select", "*"), ("order", "date.desc")])
            .send()
            .await?;
        let body = check(resp).await?.bytes().await?;
        let campaigns: Vec<Campaign> = serde_json::from_slice(&body)?;
        debug!(count = campaigns.len(), "campaigns fetched");
        Ok(campaigns)
    }

    async fn upsert(&self, campaign: &Campaign) -> Result<()> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Prefer", "resolution=merge-duplicates")
            .json(campaign)
            .send()
            .await?;
        check(resp).await?;
        debug!(id = %campaign.id, "campaign upserted");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let filter = format!("eq.{id}");
        let resp = self
            .client
            .delete(&self.endpoint)
            .query(&[("id", filter.as_str())])
            .send()
            .await?;
        check(resp).await?;
        debug!(%id, "campaign deleted");
        Ok(())
    }
}
