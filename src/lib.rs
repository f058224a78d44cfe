//! Swarm Steward - step-based coordination for agents on a tile world

pub mod agent;
pub mod core;
pub mod market;
pub mod memory;
pub mod movement;
pub mod population;
pub mod simulation;
pub mod world;
