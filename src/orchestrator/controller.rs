//! Persistence and extraction controller.
//!
//! Receives commands from presentation layers, runs each against the store or the
//! extractor on its own task, and reports outcomes back as [`AppEvent`]s.

use crate::ai::{CampaignExtractor, ExtractError};
use crate::model::{AppEvent, Campaign, InfoEvent};
use crate::store::CampaignStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// How long pending saves and deletes may run after `Quit`.
const WRITE_GRACE: Duration = Duration::from_secs(5);

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub(crate) enum StoreCommand {
    Load,
    Save(Campaign),
    Delete(String),
    Extract { seq: u64, text: String },
    Quit,
}

/// In-flight work. Writes for the same campaign are chained so they reach the
/// store in the order they were issued; everything else runs concurrently.
#[derive(Default)]
struct Tasks {
    by_id: HashMap<String, JoinHandle<()>>,
    loose: Vec<JoinHandle<()>>,
}

impl Tasks {
    fn prune(&mut self) {
        self.by_id.retain(|_, h| !h.is_finished());
        self.loose.retain(|h| !h.is_finished());
    }

    fn spawn_loose<F>(&mut self, fut: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.loose.push(tokio::spawn(fut));
    }

    fn spawn_for_id<F>(&mut self, id: String, fut: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let prev = self.by_id.remove(&id);
        let handle = tokio::spawn(async move {
            if let Some(prev) = prev {
                let _ = prev.await;
            }
            fut.await;
        });
        self.by_id.insert(id, handle);
    }

    /// Abort loads and extractions, then give writes up to `grace` to land.
    async fn drain(self, grace: Duration) {
        for h in &self.loose {
            h.abort();
        }
        let writes: Vec<JoinHandle<()>> = self.by_id.into_values().collect();
        if writes.is_empty() {
            return;
        }
        let aborts: Vec<_> = writes.iter().map(JoinHandle::abort_handle).collect();
        if tokio::time::timeout(grace, futures::future::join_all(writes))
            .await
            .is_err()
        {
            warn!(pending = aborts.len(), "writes still pending at shutdown, abandoning");
            for a in aborts {
                a.abort();
            }
        }
    }
}

/// Serve UI commands until `Quit` or until every sender is dropped.
/// Pending reads are dropped; outstanding writes get a short grace period.
pub(crate) async fn run_controller(
    store: Arc<dyn CampaignStore>,
    extractor: Option<Arc<dyn CampaignExtractor>>,
    event_tx: UnboundedSender<AppEvent>,
    mut cmd_rx: UnboundedReceiver<StoreCommand>,
) {
    let mut tasks = Tasks::default();

    while let Some(cmd) = cmd_rx.recv().await {
        tasks.prune();
        match cmd {
            StoreCommand::Load => {
                let _ = event_tx.send(AppEvent::Info(InfoEvent::Loading));
                let store = store.clone();
                let tx = event_tx.clone();
                tasks.spawn_loose(async move {
                    let ev = match store.list().await {
                        Ok(rows) => {
                            info!(count = rows.len(), "campaigns loaded");
                            AppEvent::Loaded(rows)
                        }
                        Err(e) => {
                            warn!(error = %e, "load failed");
                            AppEvent::LoadFailed(e.to_string())
                        }
                    };
                    let _ = tx.send(ev);
                });
            }
            StoreCommand::Save(campaign) => {
                let _ = event_tx.send(AppEvent::Info(InfoEvent::Saving {
                    name: campaign.name.clone(),
                }));
                let store = store.clone();
                let tx = event_tx.clone();
                let id = campaign.id.clone();
                tasks.spawn_for_id(id.clone(), async move {
                    let ev = match store.upsert(&campaign).await {
                        Ok(()) => {
                            debug!(%id, "campaign saved");
                            AppEvent::Saved { id }
                        }
                        Err(e) => {
                            warn!(%id, error = %e, "save failed");
                            AppEvent::SaveFailed {
                                id,
                                error: e.to_string(),
                            }
                        }
                    };
                    let _ = tx.send(ev);
                });
            }
            StoreCommand::Delete(id) => {
                let store = store.clone();
                let tx = event_tx.clone();
                tasks.spawn_for_id(id.clone(), async move {
                    let ev = match store.delete(&id).await {
                        Ok(()) => {
                            info!(%id, "campaign deleted");
                            AppEvent::Deleted { id }
                        }
                        Err(e) => {
                            warn!(%id, error = %e, "delete failed");
                            AppEvent::DeleteFailed {
                                id,
                                error: e.to_string(),
                            }
                        }
                    };
                    let _ = tx.send(ev);
                });
            }
            StoreCommand::Extract { seq, text } => {
                let Some(extractor) = extractor.clone() else {
                    let _ = event_tx.send(AppEvent::ExtractFailed {
                        seq,
                        error: ExtractError::NotConfigured.to_string(),
                    });
                    continue;
                };
                let _ = event_tx.send(AppEvent::Info(InfoEvent::Extracting));
                let tx = event_tx.clone();
                tasks.spawn_loose(async move {
                    let ev = match extractor.extract(&text).await {
                        Ok(draft) => {
                            info!(seq, missions = draft.missions.len(), "extraction finished");
                            AppEvent::Extracted { seq, draft }
                        }
                        Err(e) => {
                            warn!(seq, error = %e, "extraction failed");
                            AppEvent::ExtractFailed {
                                seq,
                                error: e.to_string(),
                            }
                        }
                    };
                    let _ = tx.send(ev);
                });
            }
            StoreCommand::Quit => break,
        }
    }

    debug!("controller stopping");
    tasks.drain(WRITE_GRACE).await;
}
