pub mod agent;
pub mod workflow;

pub use agent::*;
pub use workflow::*;
