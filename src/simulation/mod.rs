//! Step orchestration and default role logic

pub mod behavior;
pub mod step;

pub use behavior::{Activity, AgentBrain, JobBrain};
pub use step::{Orchestrator, StepReport, ZoneReport};
