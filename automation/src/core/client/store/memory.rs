use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::{MetadataStore, ResultStore, StoreError};
use crate::types::constant::{DEFAULT_METADATA_TTL, DEFAULT_RESULT_TTL};
use crate::types::{CheckResult, CoordinatedBlockProposal, UpkeepType};

struct TimedEntry<T> {
    value: T,
    added_at: Instant,
}

/// Result store keyed by work id. A later add for the same work id replaces
/// the earlier one; entries older than the TTL are not returned by `view`.
pub struct InMemoryResultStore {
    ttl: Duration,
    results: RwLock<HashMap<String, TimedEntry<CheckResult>>>,
}

impl InMemoryResultStore {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, results: RwLock::new(HashMap::new()) }
    }

    pub async fn len(&self) -> usize {
        self.view().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops expired entries and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut results = self.results.write().await;
        let before = results.len();
        results.retain(|_, entry| entry.added_at.elapsed() < self.ttl);
        before - results.len()
    }
}

impl Default for InMemoryResultStore {
    fn default() -> Self {
        Self::new(DEFAULT_RESULT_TTL)
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn add(&self, results: Vec<CheckResult>) {
        let mut stored = self.results.write().await;
        let now = Instant::now();
        for result in results {
            stored.insert(result.work_id.clone(), TimedEntry { value: result, added_at: now });
        }
    }

    async fn view(&self) -> Vec<CheckResult> {
        let stored = self.results.read().await;
        let mut live: Vec<_> = stored.values().filter(|entry| entry.added_at.elapsed() < self.ttl).collect();
        live.sort_by_key(|entry| entry.added_at);
        live.into_iter().map(|entry| entry.value.clone()).collect()
    }

    async fn remove(&self, work_ids: &[String]) {
        let mut stored = self.results.write().await;
        for work_id in work_ids {
            stored.remove(work_id);
        }
    }
}

/// Metadata store holding proposals per upkeep type, keyed by work id.
pub struct InMemoryMetadataStore {
    ttl: Duration,
    proposals: RwLock<HashMap<UpkeepType, HashMap<String, TimedEntry<CoordinatedBlockProposal>>>>,
}

impl InMemoryMetadataStore {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, proposals: RwLock::new(HashMap::new()) }
    }

    /// Drops proposals older than the TTL and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut proposals = self.proposals.write().await;
        let mut removed = 0;
        for by_work_id in proposals.values_mut() {
            let before = by_work_id.len();
            by_work_id.retain(|_, entry| entry.added_at.elapsed() < self.ttl);
            removed += before - by_work_id.len();
        }
        removed
    }
}

impl Default for InMemoryMetadataStore {
    fn default() -> Self {
        Self::new(DEFAULT_METADATA_TTL)
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn view_proposals(&self, upkeep_type: UpkeepType) -> Result<Vec<CoordinatedBlockProposal>, StoreError> {
        let proposals = self.proposals.read().await;
        let Some(by_work_id) = proposals.get(&upkeep_type) else {
            return Ok(Vec::new());
        };
        let mut live: Vec<_> = by_work_id.values().filter(|entry| entry.added_at.elapsed() < self.ttl).collect();
        live.sort_by_key(|entry| entry.added_at);
        Ok(live.into_iter().map(|entry| entry.value.clone()).collect())
    }

    async fn add_proposals(&self, proposals: Vec<CoordinatedBlockProposal>) {
        let mut stored = self.proposals.write().await;
        let now = Instant::now();
        for proposal in proposals {
            stored
                .entry(proposal.upkeep_type())
                .or_default()
                .entry(proposal.work_id.clone())
                .or_insert(TimedEntry { value: proposal, added_at: now });
        }
    }
}
