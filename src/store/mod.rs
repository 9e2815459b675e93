//! Remote campaign persistence.
//!
//! The controller only talks to [`CampaignStore`]; the production implementation is a
//! PostgREST table (Supabase), tests substitute an in-memory store.

mod postgrest;

#[cfg(test)]
pub(crate) mod memory;

pub use postgrest::PostgrestStore;

use crate::model::Campaign;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("database returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("could not decode campaigns: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Full-record persistence for campaigns. No partial-field updates.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    /// Every campaign, newest date first.
    async fn list(&self) -> Result<Vec<Campaign>>;

    /// Insert or replace the record with `campaign.id`.
    async fn upsert(&self, campaign: &Campaign) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}
