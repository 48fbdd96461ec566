pub mod constant;
pub mod params;
pub mod ratio;
pub mod result;
pub mod telemetry;
pub mod upkeep;

pub use ratio::Ratio;
pub use result::{CheckResult, CoordinatedBlockProposal, UpkeepState};
pub use telemetry::Status;
pub use upkeep::{LogTriggerExtension, Trigger, UpkeepIdentifier, UpkeepPayload, UpkeepType};
