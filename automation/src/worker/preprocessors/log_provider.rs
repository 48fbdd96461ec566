use async_trait::async_trait;
use std::sync::Arc;

use super::PreProcessor;
use crate::core::client::LogEventProvider;
use crate::error::FlowResult;
use crate::types::UpkeepPayload;

/// Replaces the batch with the latest payloads from the log provider.
pub struct LogProviderPreProcessor {
    provider: Arc<dyn LogEventProvider>,
}

impl LogProviderPreProcessor {
    pub fn new(provider: Arc<dyn LogEventProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl PreProcessor for LogProviderPreProcessor {
    fn name(&self) -> &'static str {
        "log_provider"
    }

    async fn pre_process(&self, _payloads: Vec<UpkeepPayload>) -> FlowResult<Vec<UpkeepPayload>> {
        Ok(self.provider.get_latest_payloads().await?)
    }
}
