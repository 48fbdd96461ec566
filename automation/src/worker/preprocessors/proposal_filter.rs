use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use super::PreProcessor;
use crate::core::client::MetadataStore;
use crate::error::FlowResult;
use crate::types::{UpkeepPayload, UpkeepType};

/// Drops payloads whose work is already recorded as a proposal of
/// `upkeep_type`, so work in flight is not proposed again.
pub struct ProposalFilterer {
    metadata: Arc<dyn MetadataStore>,
    upkeep_type: UpkeepType,
}

impl ProposalFilterer {
    pub fn new(metadata: Arc<dyn MetadataStore>, upkeep_type: UpkeepType) -> Self {
        Self { metadata, upkeep_type }
    }
}

#[async_trait]
impl PreProcessor for ProposalFilterer {
    fn name(&self) -> &'static str {
        "proposal_filterer"
    }

    async fn pre_process(&self, payloads: Vec<UpkeepPayload>) -> FlowResult<Vec<UpkeepPayload>> {
        let proposals = self.metadata.view_proposals(self.upkeep_type).await?;
        let in_flight: HashSet<String> = proposals.into_iter().map(|proposal| proposal.work_id).collect();

        Ok(payloads.into_iter().filter(|payload| !in_flight.contains(&payload.work_id)).collect())
    }
}
