use async_trait::async_trait;

use super::PreProcessor;
use crate::error::FlowResult;
use crate::types::UpkeepPayload;

/// Turns on the off-chain data lookup for every payload when `enabled`.
pub struct LookupEnabler {
    enabled: bool,
}

impl LookupEnabler {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl PreProcessor for LookupEnabler {
    fn name(&self) -> &'static str {
        "lookup_enabler"
    }

    async fn pre_process(&self, mut payloads: Vec<UpkeepPayload>) -> FlowResult<Vec<UpkeepPayload>> {
        if self.enabled {
            payloads.iter_mut().for_each(|payload| payload.lookup_enabled = true);
        }
        Ok(payloads)
    }
}
