//! Demand-driven population control: what to spawn, whom to cull, whom to promote

pub mod bodies;
pub mod controller;
pub mod targets;

pub use bodies::{build_body, critical_count, BOOTSTRAP_BODY};
pub use controller::{supply, PopulationController, PopulationDecision, RoleDemand, SpawnPlan};
pub use targets::{compute_targets, target_for, DemandSignals, PopulationTarget};
