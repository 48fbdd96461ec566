use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::{ProposalQueue, QueueError, RetryQueue, RetryRecord};
use crate::types::constant::{DEFAULT_QUEUE_CAPACITY, DEFAULT_RETRY_INTERVAL};
use crate::types::{CoordinatedBlockProposal, UpkeepPayload, UpkeepType};

struct PendingRetry {
    record: RetryRecord,
    ready_at: Instant,
    sequence: u64,
}

#[derive(Default)]
struct RetryState {
    pending: HashMap<String, PendingRetry>,
    next_sequence: u64,
}

/// Retry queue keyed by work id. Re-enqueueing the same work replaces the
/// pending record and restarts its delay.
pub struct InMemoryRetryQueue {
    capacity: usize,
    state: Mutex<RetryState>,
}

impl InMemoryRetryQueue {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, state: Mutex::new(RetryState::default()) }
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryRetryQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

#[async_trait]
impl RetryQueue for InMemoryRetryQueue {
    async fn enqueue(&self, records: Vec<RetryRecord>) -> Result<(), QueueError> {
        let mut state = self.state.lock().await;

        let new_keys = records
            .iter()
            .map(|record| record.payload.work_id.as_str())
            .filter(|work_id| !state.pending.contains_key(*work_id))
            .collect::<HashSet<_>>()
            .len();
        if state.pending.len() + new_keys > self.capacity {
            return Err(QueueError::Full { capacity: self.capacity });
        }

        let now = Instant::now();
        for record in records {
            let ready_at = now + record.interval.unwrap_or(DEFAULT_RETRY_INTERVAL);
            let sequence = state.next_sequence;
            state.next_sequence += 1;
            state.pending.insert(record.payload.work_id.clone(), PendingRetry { record, ready_at, sequence });
        }
        Ok(())
    }

    async fn dequeue(&self, max: usize) -> Result<Vec<UpkeepPayload>, QueueError> {
        let mut state = self.state.lock().await;
        let now = Instant::now();

        let mut ready: Vec<(u64, String)> = state
            .pending
            .iter()
            .filter(|(_, pending)| pending.ready_at <= now)
            .map(|(work_id, pending)| (pending.sequence, work_id.clone()))
            .collect();
        ready.sort();

        Ok(ready
            .into_iter()
            .take(max)
            .filter_map(|(_, work_id)| state.pending.remove(&work_id))
            .map(|pending| pending.record.payload)
            .collect())
    }
}

#[derive(Default)]
struct ProposalState {
    queues: HashMap<UpkeepType, VecDeque<CoordinatedBlockProposal>>,
    queued: HashSet<String>,
}

/// FIFO proposal queue per upkeep type. A work id already waiting in the
/// queue is not queued twice.
pub struct InMemoryProposalQueue {
    capacity: usize,
    state: Mutex<ProposalState>,
}

impl InMemoryProposalQueue {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, state: Mutex::new(ProposalState::default()) }
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.queued.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryProposalQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

#[async_trait]
impl ProposalQueue for InMemoryProposalQueue {
    async fn enqueue(&self, proposals: Vec<CoordinatedBlockProposal>) -> Result<(), QueueError> {
        let mut state = self.state.lock().await;

        let new_keys = proposals
            .iter()
            .map(|proposal| proposal.work_id.as_str())
            .filter(|work_id| !state.queued.contains(*work_id))
            .collect::<HashSet<_>>()
            .len();
        if state.queued.len() + new_keys > self.capacity {
            return Err(QueueError::Full { capacity: self.capacity });
        }

        for proposal in proposals {
            if state.queued.insert(proposal.work_id.clone()) {
                state.queues.entry(proposal.upkeep_type()).or_default().push_back(proposal);
            }
        }
        Ok(())
    }

    async fn dequeue(&self, upkeep_type: UpkeepType, max: usize) -> Result<Vec<CoordinatedBlockProposal>, QueueError> {
        let mut state = self.state.lock().await;
        let Some(queue) = state.queues.get_mut(&upkeep_type) else {
            return Ok(Vec::new());
        };

        let take = max.min(queue.len());
        let dequeued: Vec<_> = queue.drain(..take).collect();
        for proposal in &dequeued {
            state.queued.remove(&proposal.work_id);
        }
        Ok(dequeued)
    }
}

