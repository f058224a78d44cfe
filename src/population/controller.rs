//! Spawn, cull and promotion decisions for one zone per step

use crate::agent::body::body_cost;
use crate::agent::role::Role;
use crate::agent::Agent;
use crate::core::config::PopulationConfig;
use crate::core::types::{AgentId, ObjectId};
use crate::market::board::TaskMarket;
use crate::population::bodies::{build_body, critical_count, BOOTSTRAP_BODY};
use crate::population::targets::{compute_targets, target_for, DemandSignals, PopulationTarget};
use crate::world::zone::{SpawnRequest, Zone};

/// What the spawning part of a step came to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpawnPlan {
    /// Every spawn was busy; nothing else was evaluated
    #[default]
    NoIdleSpawn,
    /// Empty zone, minimal generalist requested
    Bootstrap,
    Spawn(Role),
    /// The highest unmet role cannot be afforded yet
    Waiting(Role),
    Satisfied,
}

/// Target and current supply of one role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleDemand {
    pub role: Role,
    pub target: u32,
    pub supply: u32,
}

/// Everything the controller wants done this step
///
/// Promotions are applied to the roster directly; spawns and culls go
/// through the world's primitives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulationDecision {
    pub plan: SpawnPlan,
    pub spawn: Option<SpawnRequest>,
    pub cull: Option<AgentId>,
    pub promoted: Option<AgentId>,
    pub demand: Vec<RoleDemand>,
}

#[derive(Debug, Clone, Default)]
pub struct PopulationController {
    config: PopulationConfig,
}

impl PopulationController {
    pub fn new(config: PopulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }

    /// Decide this step's population changes for `zone`
    ///
    /// `roster` holds the zone's agents for this step.
    pub fn run(&self, zone: &Zone, market: &TaskMarket, roster: &mut [Agent]) -> PopulationDecision {
        let mut decision = PopulationDecision::default();
        let Some(spawn) = zone.idle_spawn().map(|s| s.id) else {
            return decision;
        };
        let signals = DemandSignals::gather(zone, market);

        if roster.is_empty() {
            self.bootstrap(zone, spawn, &signals, &mut decision);
            return decision;
        }

        decision.cull = self.pick_cull(roster, &signals);
        if let Some(id) = decision.cull {
            tracing::info!(zone = %zone.id, agent = %id, "culling underpowered agent");
        }
        decision.promoted = self.promote(zone, roster, &signals, decision.cull);
        self.plan_spawn(zone, spawn, roster, &signals, &mut decision);
        decision
    }

    fn bootstrap(
        &self,
        zone: &Zone,
        spawn: ObjectId,
        signals: &DemandSignals,
        decision: &mut PopulationDecision,
    ) {
        if body_cost(&BOOTSTRAP_BODY) > signals.energy_available {
            decision.plan = SpawnPlan::Waiting(Role::Generalist);
            return;
        }
        tracing::info!(zone = %zone.id, "zone is empty, bootstrapping a generalist");
        decision.plan = SpawnPlan::Bootstrap;
        decision.spawn = Some(SpawnRequest {
            spawn,
            role: Role::Generalist,
            body: BOOTSTRAP_BODY.to_vec(),
        });
    }

    /// First agent whose body is too weak to be worth keeping, if any
    fn pick_cull(&self, roster: &[Agent], signals: &DemandSignals) -> Option<AgentId> {
        let cfg = &self.config;
        roster
            .iter()
            .find(|agent| {
                if agent.role.critical_part().is_none()
                    || agent.spawning
                    || agent.has_combat_damage()
                    || agent.remaining_lifetime <= cfg.cull_lifetime_margin
                {
                    return false;
                }
                let cohort = roster.iter().filter(|a| a.role == agent.role).count();
                if cohort <= cfg.cull_min_cohort {
                    return false;
                }
                let Some(fresh) = build_body(agent.role, signals.energy_capacity, cfg.max_body_parts)
                else {
                    return false;
                };
                let fresh_critical = critical_count(agent.role, &fresh) as f32;
                let weak = (agent.critical_parts() as f32) < cfg.cull_viable_fraction * fresh_critical;
                weak && body_cost(&fresh) <= signals.energy_available
            })
            .map(|a| a.id)
    }

    /// Turn one working generalist into a harvester while harvesting is short
    fn promote(
        &self,
        zone: &Zone,
        roster: &mut [Agent],
        signals: &DemandSignals,
        culled: Option<AgentId>,
    ) -> Option<AgentId> {
        let target = target_for(Role::Harvester, signals, &self.config);
        if supply(roster, Role::Harvester, culled) >= target {
            return None;
        }
        let agent = roster.iter_mut().find(|a| {
            a.role == Role::Generalist && !a.spawning && a.capabilities().can_work()
        })?;
        agent.role = Role::Harvester;
        tracing::info!(zone = %zone.id, agent = %agent.id, "promoted generalist to harvester");
        Some(agent.id)
    }

    fn plan_spawn(
        &self,
        zone: &Zone,
        spawn: ObjectId,
        roster: &[Agent],
        signals: &DemandSignals,
        decision: &mut PopulationDecision,
    ) {
        let cfg = &self.config;
        let culled = decision.cull;
        decision.demand = compute_targets(signals, cfg)
            .into_iter()
            .map(|PopulationTarget { role, critical_parts }| RoleDemand {
                role,
                target: critical_parts,
                supply: supply(roster, role, culled),
            })
            .collect();

        let mut waiting = None;
        for demand in decision.demand.clone() {
            let role = demand.role;
            if role.is_spender() && signals.fill_ratio() < cfg.spender_energy_ratio {
                continue;
            }
            if role.is_defensive() && !signals.under_threat() {
                continue;
            }
            if demand.supply >= demand.target {
                continue;
            }

            // An empty cohort takes whatever body it can get right now
            let cohort_empty = !roster.iter().any(|a| a.role == role && Some(a.id) != culled);
            let budget = if cohort_empty {
                signals.energy_available
            } else {
                signals.energy_capacity
            };
            let body = build_body(role, budget, cfg.max_body_parts)
                .filter(|b| body_cost(b) <= signals.energy_available);

            match body {
                Some(body) => {
                    tracing::info!(
                        zone = %zone.id,
                        %role,
                        parts = body.len(),
                        cost = body_cost(&body),
                        supply = demand.supply,
                        target = demand.target,
                        "spawning"
                    );
                    decision.plan = SpawnPlan::Spawn(role);
                    decision.spawn = Some(SpawnRequest { spawn, role, body });
                    return;
                }
                // Energy goes to harvesting before anything else
                None if role == Role::Harvester => {
                    decision.plan = SpawnPlan::Waiting(role);
                    return;
                }
                None => {
                    tracing::debug!(zone = %zone.id, %role, "demand unmet but unaffordable");
                    waiting.get_or_insert(role);
                }
            }
        }
        decision.plan = waiting.map_or(SpawnPlan::Satisfied, SpawnPlan::Waiting);
    }
}

/// Living critical parts of healthy agents in a role
pub fn supply(roster: &[Agent], role: Role, excluded: Option<AgentId>) -> u32 {
    roster
        .iter()
        .filter(|a| a.role == role && a.is_healthy() && Some(a.id) != excluded)
        .map(Agent::critical_parts)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::PartKind;
    use crate::core::types::{Tile, ZoneId};
    use crate::market::job::{Job, JobType, TargetRef};
    use crate::world::structures::StructureKind;

    use PartKind::*;

    const ZONE: ZoneId = ZoneId(1);

    fn zone(spawn_energy: u32, extensions: usize) -> Zone {
        let mut zone = Zone::new(ZONE, 30, 30);
        zone.add_spawn(Tile::new(10, 10), spawn_energy);
        for i in 0..extensions {
            let ext = zone.add_structure(StructureKind::Extension, Tile::new(2 + i as i32, 2));
            zone.structure_mut(ext).unwrap().energy = 50;
        }
        zone.add_node(Tile::new(20, 20));
        zone
    }

    fn agent(role: Role, parts: &[PartKind], lifetime: u32) -> Agent {
        Agent::new(role, parts, Tile::new(5, 5), lifetime, ZONE)
    }

    fn full_harvester() -> Agent {
        agent(Role::Harvester, &[Work, Work, Work, Work, Work, Move], 1000)
    }

    fn run(zone: &Zone, roster: &mut [Agent]) -> PopulationDecision {
        PopulationController::default().run(zone, &TaskMarket::default(), roster)
    }

    #[test]
    fn test_bootstrap_spawns_generalist() {
        let zone = zone(300, 0);
        let decision = run(&zone, &mut []);
        assert_eq!(decision.plan, SpawnPlan::Bootstrap);
        let request = decision.spawn.unwrap();
        assert_eq!(request.role, Role::Generalist);
        assert_eq!(request.body, BOOTSTRAP_BODY.to_vec());
    }

    #[test]
    fn test_bootstrap_waits_for_energy() {
        let zone = zone(150, 0);
        let decision = run(&zone, &mut []);
        assert_eq!(decision.plan, SpawnPlan::Waiting(Role::Generalist));
        assert!(decision.spawn.is_none());
    }

    #[test]
    fn test_busy_spawn_is_a_no_op() {
        let mut zone = zone(300, 0);
        zone.structures[0].busy_steps = 5;
        let mut roster = vec![agent(Role::Generalist, &[Work, Carry, Move], 1000)];
        let decision = run(&zone, &mut roster);
        assert_eq!(decision, PopulationDecision::default());
        assert_eq!(roster[0].role, Role::Generalist);
    }

    #[test]
    fn test_generalist_promoted_while_harvest_short() {
        let zone = zone(100, 0);
        let mut roster = vec![agent(Role::Generalist, &[Work, Carry, Move], 1000)];
        let decision = run(&zone, &mut roster);
        assert_eq!(decision.promoted, Some(roster[0].id));
        assert_eq!(roster[0].role, Role::Harvester);
    }

    #[test]
    fn test_only_one_promotion_per_step() {
        let zone = zone(100, 0);
        let mut roster = vec![
            agent(Role::Generalist, &[Work, Carry, Move], 1000),
            agent(Role::Generalist, &[Work, Carry, Move], 1000),
        ];
        run(&zone, &mut roster);
        let harvesters = roster.iter().filter(|a| a.role == Role::Harvester).count();
        assert_eq!(harvesters, 1);
    }

    #[test]
    fn test_unaffordable_harvester_blocks_lower_roles() {
        // Harvest is short and the harvester cohort exists, so the body is
        // sized to capacity and has to wait
        let zone = zone(200, 4);
        let mut roster = vec![agent(Role::Harvester, &[Work, Work, Move], 1000)];
        let decision = run(&zone, &mut roster);
        assert_eq!(decision.plan, SpawnPlan::Waiting(Role::Harvester));
        assert!(decision.spawn.is_none());
    }

    #[test]
    fn test_transporter_follows_satisfied_harvest() {
        let zone = zone(300, 5);
        let mut roster = vec![full_harvester()];
        let decision = run(&zone, &mut roster);
        assert_eq!(decision.plan, SpawnPlan::Spawn(Role::Transporter));
        let request = decision.spawn.unwrap();
        assert!(request.cost() <= zone.energy_available());
        assert!(critical_count(Role::Transporter, &request.body) >= 2);
    }

    #[test]
    fn test_expiring_agents_do_not_count_as_supply() {
        let zone = zone(300, 5);
        let mut old = full_harvester();
        old.remaining_lifetime = 100;
        let mut roster = vec![old];
        let decision = run(&zone, &mut roster);
        assert_eq!(decision.plan, SpawnPlan::Spawn(Role::Harvester));
        assert_eq!(decision.demand[0].supply, 0);
    }

    #[test]
    fn test_spenders_wait_for_energy_ratio() {
        let mut zone = zone(300, 10);
        zone.tier = 2;
        let mut market = TaskMarket::default();
        market.publish(
            ZONE,
            Job::new(JobType::Build, TargetRef::Tile(Tile::new(3, 3)), Tile::new(3, 3)),
        );
        let mut roster = vec![
            full_harvester(),
            agent(Role::Transporter, &[Carry; 8], 1000),
        ];
        let controller = PopulationController::default();

        let decision = controller.run(&zone, &market, &mut roster);
        assert_eq!(decision.plan, SpawnPlan::Spawn(Role::Builder));

        // Drain below the ratio: spenders are skipped
        for s in zone.structures.iter_mut().filter(|s| s.kind == StructureKind::Extension) {
            s.energy = 0;
        }
        let decision = controller.run(&zone, &market, &mut roster);
        assert_eq!(decision.plan, SpawnPlan::Satisfied);
    }

    #[test]
    fn test_defender_only_under_threat() {
        let mut zone = zone(300, 5);
        let mut roster = vec![full_harvester(), agent(Role::Transporter, &[Carry; 4], 1000)];
        assert_eq!(run(&zone, &mut roster).plan, SpawnPlan::Satisfied);

        zone.add_hostile(Tile::new(25, 25), 3);
        assert_eq!(run(&zone, &mut roster).plan, SpawnPlan::Spawn(Role::Defender));
    }

    fn weak_transporters(count: usize) -> Vec<Agent> {
        (0..count)
            .map(|_| agent(Role::Transporter, &[Carry, Carry, Move], 1000))
            .collect()
    }

    #[test]
    fn test_culls_exactly_one_weak_agent() {
        let zone = zone(300, 24);
        let mut roster = weak_transporters(4);
        let decision = run(&zone, &mut roster);
        assert_eq!(decision.cull, Some(roster[0].id));
    }

    #[test]
    fn test_cull_needs_a_crowd() {
        let zone = zone(300, 24);
        let mut roster = weak_transporters(2);
        assert!(run(&zone, &mut roster).cull.is_none());
    }

    #[test]
    fn test_cull_spares_damaged_and_dying() {
        let zone = zone(300, 24);
        let mut roster = weak_transporters(3);
        roster[0].set_part_hits(2, 40);
        roster[1].remaining_lifetime = 150;
        let decision = run(&zone, &mut roster);
        assert_eq!(decision.cull, Some(roster[2].id));
    }

    #[test]
    fn test_cull_needs_affordable_replacement() {
        let mut zone = zone(300, 24);
        zone.structures[0].energy = 0;
        let mut roster = weak_transporters(4);
        assert!(run(&zone, &mut roster).cull.is_none());
    }

    #[test]
    fn test_culled_agent_excluded_from_supply() {
        let zone = zone(300, 24);
        let mut roster = weak_transporters(4);
        roster.insert(0, full_harvester());
        let decision = run(&zone, &mut roster);
        let transport = decision
            .demand
            .iter()
            .find(|d| d.role == Role::Transporter)
            .unwrap();
        assert!(decision.cull.is_some());
        assert_eq!(transport.supply, 6);
    }

    #[test]
    fn test_supply_skips_generalists() {
        let roster = vec![agent(Role::Generalist, &[Work, Carry, Move], 1000)];
        assert_eq!(supply(&roster, Role::Generalist, None), 0);
        assert_eq!(supply(&roster, Role::Harvester, None), 0);
    }
}
