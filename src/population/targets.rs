//! Per-role demand, derived fresh every step from live world signals

use crate::agent::role::Role;
use crate::core::config::PopulationConfig;
use crate::market::board::TaskMarket;
use crate::market::job::JobType;
use crate::world::zone::Zone;

/// Everything population control reads from the world and the market
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemandSignals {
    pub node_count: u32,
    pub has_energy_sinks: bool,
    pub tier: u8,
    pub energy_available: u32,
    pub energy_capacity: u32,
    /// Hostiles carrying attack parts
    pub threats: u32,
    /// Build jobs on this step's board
    pub construction_jobs: u32,
}

impl DemandSignals {
    pub fn gather(zone: &Zone, market: &TaskMarket) -> Self {
        Self {
            node_count: zone.nodes.len() as u32,
            has_energy_sinks: zone.has_energy_sinks(),
            tier: zone.tier,
            energy_available: zone.energy_available(),
            energy_capacity: zone.energy_capacity(),
            threats: zone.hostiles.iter().filter(|h| h.attack_parts > 0).count() as u32,
            construction_jobs: market.count(zone.id, &JobType::Build) as u32,
        }
    }

    pub fn under_threat(&self) -> bool {
        self.threats > 0
    }

    /// Share of spawning energy currently filled, 0.0 for a zone with no capacity
    pub fn fill_ratio(&self) -> f32 {
        if self.energy_capacity == 0 {
            return 0.0;
        }
        self.energy_available as f32 / self.energy_capacity as f32
    }
}

/// How many critical parts a role should field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationTarget {
    pub role: Role,
    pub critical_parts: u32,
}

/// Target for one role; generalists are never a target
pub fn target_for(role: Role, signals: &DemandSignals, config: &PopulationConfig) -> u32 {
    let spenders_allowed = signals.tier >= config.spender_min_tier;
    match role {
        Role::Generalist => 0,
        Role::Harvester => signals.node_count * config.harvest_work_per_node,
        Role::Transporter => {
            if signals.has_energy_sinks {
                signals.tier as u32 * config.transport_carry_per_tier
            } else {
                config.minimal_transport_carry
            }
        }
        Role::Builder if spenders_allowed => (signals.construction_jobs
            * config.builder_work_per_site)
            .min(config.builder_work_cap),
        Role::Upgrader if spenders_allowed => (signals.energy_capacity
            / config.upgrader_capacity_per_work)
            .min(config.upgrader_work_cap),
        Role::Builder | Role::Upgrader => 0,
        Role::Defender => signals.threats * config.defender_attack_per_hostile,
    }
}

/// Targets for every specialized role, in spawn-priority order
pub fn compute_targets(signals: &DemandSignals, config: &PopulationConfig) -> Vec<PopulationTarget> {
    Role::SPAWN_ORDER
        .iter()
        .map(|&role| PopulationTarget {
            role,
            critical_parts: target_for(role, signals, config),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals() -> DemandSignals {
        DemandSignals {
            node_count: 2,
            has_energy_sinks: false,
            tier: 1,
            energy_available: 300,
            energy_capacity: 300,
            threats: 0,
            construction_jobs: 0,
        }
    }

    #[test]
    fn test_harvest_target_scales_with_nodes() {
        let config = PopulationConfig::default();
        assert_eq!(target_for(Role::Harvester, &signals(), &config), 10);
    }

    #[test]
    fn test_transport_falls_back_without_sinks() {
        let config = PopulationConfig::default();
        let mut s = signals();
        assert_eq!(target_for(Role::Transporter, &s, &config), 2);

        s.has_energy_sinks = true;
        s.tier = 3;
        assert_eq!(target_for(Role::Transporter, &s, &config), 12);
    }

    #[test]
    fn test_spenders_gated_by_tier() {
        let config = PopulationConfig::default();
        let mut s = signals();
        s.construction_jobs = 10;
        s.energy_capacity = 1800;
        assert_eq!(target_for(Role::Builder, &s, &config), 0);
        assert_eq!(target_for(Role::Upgrader, &s, &config), 0);

        s.tier = 2;
        // Capped at six no matter how many sites
        assert_eq!(target_for(Role::Builder, &s, &config), 6);
        assert_eq!(target_for(Role::Upgrader, &s, &config), 6);
    }

    #[test]
    fn test_upgrader_bounded_by_capacity() {
        let config = PopulationConfig::default();
        let mut s = signals();
        s.tier = 8;
        s.energy_capacity = 12_900;
        assert_eq!(target_for(Role::Upgrader, &s, &config), 15);
        s.energy_capacity = 550;
        assert_eq!(target_for(Role::Upgrader, &s, &config), 1);
    }

    #[test]
    fn test_defense_only_under_threat() {
        let config = PopulationConfig::default();
        let mut s = signals();
        assert_eq!(target_for(Role::Defender, &s, &config), 0);
        s.threats = 2;
        assert_eq!(target_for(Role::Defender, &s, &config), 8);
    }

    #[test]
    fn test_targets_follow_spawn_order() {
        let targets = compute_targets(&signals(), &PopulationConfig::default());
        let roles: Vec<_> = targets.iter().map(|t| t.role).collect();
        assert_eq!(roles, Role::SPAWN_ORDER.to_vec());
    }

    #[test]
    fn test_fill_ratio_handles_zero_capacity() {
        let mut s = signals();
        s.energy_capacity = 0;
        assert_eq!(s.fill_ratio(), 0.0);
        s.energy_capacity = 600;
        assert!((s.fill_ratio() - 0.5).abs() < 1e-6);
    }
}
