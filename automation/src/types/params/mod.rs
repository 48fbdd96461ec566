pub mod flow;

pub use flow::FlowParams;
