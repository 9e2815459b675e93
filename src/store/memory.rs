use super::{CampaignStore, Result, StoreError};
use crate::model::Campaign;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-process stand-in for the remote table, with switchable failures.
#[derive(Default)]
pub(crate) struct MemoryStore {
    rows: Mutex<Vec<Campaign>>,
    pub fail_list: AtomicBool,
    pub fail_upsert: AtomicBool,
    pub fail_delete: AtomicBool,
    /// Upsert latency keyed by campaign name, used to force overlapping saves.
    pub slow_names: Mutex<Vec<(String, Duration)>>,
    /// Names in the order upserts completed.
    pub upsert_log: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn with_rows(rows: Vec<Campaign>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    pub fn rows(&self) -> Vec<Campaign> {
        self.rows.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn refused() -> StoreError {
        StoreError::Api {
            status: 503,
            body: "unavailable".into(),
        }
    }
}

#[async_trait]
impl CampaignStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Campaign>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Self::refused());
        }
        let mut rows = self.rows();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn upsert(&self, campaign: &Campaign) -> Result<()> {
        let delay = self
            .slow_names
            .lock()
            .ok()
            .and_then(|s| s.iter().find(|(n, _)| *n == campaign.name).map(|(_, d)| *d));
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
        if self.fail_upsert.load(Ordering::SeqCst) {
            return Err(Self::refused());
        }
        if let Ok(mut rows) = self.rows.lock() {
            match rows.iter_mut().find(|r| r.id == campaign.id) {
                Some(existing) => *existing = campaign.clone(),
                None => rows.push(campaign.clone()),
            }
        }
        if let Ok(mut log) = self.upsert_log.lock() {
            log.push(campaign.name.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Self::refused());
        }
        if let Ok(mut rows) = self.rows.lock() {
            rows.retain(|r| r.id != id);
        }
        Ok(())
    }
}
