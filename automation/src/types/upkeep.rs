use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;

/// Opaque 32 byte identifier of an upkeep registered on-chain.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UpkeepIdentifier(pub [u8; 32]);

impl UpkeepIdentifier {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl From<[u8; 32]> for UpkeepIdentifier {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<u128> for UpkeepIdentifier {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; 32];
        bytes[16..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

impl From<u64> for UpkeepIdentifier {
    fn from(value: u64) -> Self {
        Self::from(value as u128)
    }
}

impl fmt::Display for UpkeepIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum UpkeepType {
    /// Evaluated on block cadence
    Conditional,
    /// Evaluated in reaction to an on-chain log
    LogTrigger,
}

/// Identity of the log that justifies evaluating a log triggered upkeep.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LogTriggerExtension {
    pub tx_hash: [u8; 32],
    pub index: u32,
    pub block_hash: [u8; 32],
    pub block_number: u64,
}

impl LogTriggerExtension {
    /// `block_hash ‖ tx_hash ‖ index` with the index big-endian encoded.
    pub fn log_identifier(&self) -> Vec<u8> {
        let mut id = Vec::with_capacity(68);
        id.extend_from_slice(&self.block_hash);
        id.extend_from_slice(&self.tx_hash);
        id.extend_from_slice(&self.index.to_be_bytes());
        id
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Trigger {
    pub block_number: u64,
    pub block_hash: [u8; 32],
    pub log_trigger_extension: Option<LogTriggerExtension>,
}

impl Trigger {
    pub fn new(block_number: u64, block_hash: [u8; 32]) -> Self {
        Self { block_number, block_hash, log_trigger_extension: None }
    }

    pub fn with_log(mut self, extension: LogTriggerExtension) -> Self {
        self.log_trigger_extension = Some(extension);
        self
    }

    pub fn upkeep_type(&self) -> UpkeepType {
        match self.log_trigger_extension {
            Some(_) => UpkeepType::LogTrigger,
            None => UpkeepType::Conditional,
        }
    }
}

/// Stable fingerprint of (upkeep, trigger).
///
/// Conditional upkeeps hash only the identifier, so every block for the same
/// upkeep maps to one unit of work. Log triggered upkeeps append the log
/// identifier, giving one unit of work per log.
pub fn work_id(upkeep_id: &UpkeepIdentifier, trigger: &Trigger) -> String {
    let mut hasher = Keccak256::new();
    hasher.update(upkeep_id.as_bytes());
    if let Some(extension) = &trigger.log_trigger_extension {
        hasher.update(extension.log_identifier());
    }
    hex::encode(hasher.finalize())
}

/// A unit of candidate work handed to the filter chain.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct UpkeepPayload {
    pub upkeep_id: UpkeepIdentifier,
    pub trigger: Trigger,
    pub work_id: String,
    pub check_data: Vec<u8>,
    /// Enables the auxiliary off-chain data lookup during evaluation
    pub lookup_enabled: bool,
}

impl UpkeepPayload {
    pub fn new(upkeep_id: UpkeepIdentifier, trigger: Trigger, check_data: Vec<u8>) -> Self {
        let work_id = work_id(&upkeep_id, &trigger);
        Self { upkeep_id, trigger, work_id, check_data, lookup_enabled: false }
    }

    /// Builders return an empty payload for proposals they could not resolve.
    pub fn is_empty(&self) -> bool {
        self.upkeep_id.is_zero() && self.work_id.is_empty()
    }

    pub fn upkeep_type(&self) -> UpkeepType {
        self.trigger.upkeep_type()
    }
}
