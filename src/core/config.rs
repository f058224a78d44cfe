//! Coordinator configuration with documented constants
//!
//! All tuning numbers for the three coordination phases are collected here.
//! Every section deserializes with defaults, so a TOML file only needs to name
//! the values it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, StewardError};

/// Top-level configuration handed to the orchestrator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StewardConfig {
    pub market: MarketConfig,
    pub population: PopulationConfig,
    pub movement: MovementConfig,
}

/// Job scoring weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Score contributed per priority level
    ///
    /// At 100, one priority level outweighs 50 tiles of travel distance,
    /// so distance only ever breaks ties within a priority band.
    pub priority_weight: i32,

    /// Score removed per tile of distance between agent and job target
    pub distance_weight: i32,

    /// Upper bound on harvest slots per resource node
    pub max_harvest_slots: u32,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            priority_weight: 100,
            distance_weight: 2,
            max_harvest_slots: 3,
        }
    }
}

/// Population demand and culling thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    // === TARGETS ===
    /// WORK parts that fully drain one resource node between regenerations
    pub harvest_work_per_node: u32,

    /// CARRY target while the zone has no extensions and no storage
    pub minimal_transport_carry: u32,

    /// CARRY target per zone tier once energy sinks exist
    pub transport_carry_per_tier: u32,

    /// Builder WORK target per open construction site
    pub builder_work_per_site: u32,

    /// Hard cap on the builder WORK target
    pub builder_work_cap: u32,

    /// Zone tier below which no dedicated spender is created
    pub spender_min_tier: u8,

    /// Energy capacity needed per upgrader WORK part
    pub upgrader_capacity_per_work: u32,

    /// Hard cap on the upgrader WORK target
    pub upgrader_work_cap: u32,

    /// Defender ATTACK target per hostile present
    pub defender_attack_per_hostile: u32,

    // === GATES ===
    /// Fraction of energy capacity that must be filled before spenders spawn
    ///
    /// Keeps builders and upgraders from draining energy that the spawn
    /// would otherwise spend replacing harvesters and transporters.
    pub spender_energy_ratio: f32,

    // === CULLING ===
    /// Cohort size must exceed this before any member may be culled
    pub cull_min_cohort: usize,

    /// Remaining lifetime at or below which an agent is left to expire naturally
    pub cull_lifetime_margin: u32,

    /// Fraction of a fresh body's critical parts below which an agent is dead weight
    pub cull_viable_fraction: f32,

    // === BODIES ===
    /// Maximum parts in a single body
    pub max_body_parts: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            harvest_work_per_node: 5,
            minimal_transport_carry: 2,
            transport_carry_per_tier: 4,
            builder_work_per_site: 2,
            builder_work_cap: 6,
            spender_min_tier: 2,
            upgrader_capacity_per_work: 300,
            upgrader_work_cap: 15,
            defender_attack_per_hostile: 4,
            spender_energy_ratio: 0.8,
            cull_min_cohort: 2,
            cull_lifetime_margin: 200,
            cull_viable_fraction: 0.5,
            max_body_parts: 50,
        }
    }
}

/// Path costs and search limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Cost of stepping onto a paved (road) tile
    pub road_cost: u32,

    /// Cost of stepping onto a plain tile
    pub plain_cost: u32,

    /// Cost of stepping onto a swamp tile
    pub swamp_cost: u32,

    /// Maximum nodes expanded by one path search before it gives up
    ///
    /// An exhausted search is treated exactly like an unreachable target.
    pub max_search_nodes: usize,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            road_cost: 1,
            plain_cost: 2,
            swamp_cost: 10,
            max_search_nodes: 4000,
        }
    }
}

impl StewardConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: StewardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let m = &self.movement;
        if m.road_cost == 0 || m.plain_cost == 0 || m.swamp_cost == 0 {
            return Err(StewardError::InvalidConfig(
                "path costs must be positive".into(),
            ));
        }
        if m.road_cost > m.plain_cost {
            return Err(StewardError::InvalidConfig(format!(
                "road_cost ({}) should be <= plain_cost ({})",
                m.road_cost, m.plain_cost
            )));
        }

        let p = &self.population;
        for (name, value) in [
            ("spender_energy_ratio", p.spender_energy_ratio),
            ("cull_viable_fraction", p.cull_viable_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(StewardError::InvalidConfig(format!(
                    "{} ({}) must be within 0..=1",
                    name, value
                )));
            }
        }
        if p.upgrader_capacity_per_work == 0 {
            return Err(StewardError::InvalidConfig(
                "upgrader_capacity_per_work must be positive".into(),
            ));
        }
        if p.max_body_parts == 0 {
            return Err(StewardError::InvalidConfig(
                "max_body_parts must be positive".into(),
            ));
        }

        Ok(())
    }
}
