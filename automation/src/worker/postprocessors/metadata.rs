use async_trait::async_trait;
use std::sync::Arc;

use super::{record_classified, PostProcessor};
use crate::core::client::MetadataStore;
use crate::error::FlowResult;
use crate::types::{CheckResult, CoordinatedBlockProposal, UpkeepPayload};

/// Records every result as a proposal, whatever its eligibility. Additive.
pub struct AddProposalToMetadataStore {
    metadata: Arc<dyn MetadataStore>,
}

impl AddProposalToMetadataStore {
    pub fn new(metadata: Arc<dyn MetadataStore>) -> Self {
        Self { metadata }
    }
}

#[async_trait]
impl PostProcessor for AddProposalToMetadataStore {
    fn name(&self) -> &'static str {
        "metadata"
    }

    async fn post_process(&self, results: &[CheckResult], _payloads: &[UpkeepPayload]) -> FlowResult<()> {
        if results.is_empty() {
            return Ok(());
        }

        let proposals: Vec<CoordinatedBlockProposal> = results.iter().map(CoordinatedBlockProposal::from).collect();
        record_classified(self.name(), proposals.len());
        self.metadata.add_proposals(proposals).await;
        Ok(())
    }
}
