pub mod content;
mod health;
mod workflow;

pub use health::{HealthProbe, DEFAULT_PROBE_PATH};
pub use workflow::ConversionWorkflow;
