pub mod controller;
pub mod flows;
pub mod observer;
pub mod postprocessors;
pub mod preprocessors;
pub mod scheduler;

pub use controller::FlowController;
pub use flows::{build_all, FlowDependencies};
pub use observer::{Observer, PayloadSource};
pub use scheduler::PipelineScheduler;
