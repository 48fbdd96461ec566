pub mod flow;

pub use flow::FlowCliArgs;
