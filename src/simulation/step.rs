//! One coordination step across every owned zone
//!
//! Phase order per zone is fixed: rehydrate agents from the store, reset the
//! board, publish jobs, run population control, let every agent decide, resolve
//! movement, hand the moves to the world, persist. The board and the movement
//! registry are per-step context; only the store carries anything forward.

use crate::agent::role::Role;
use crate::agent::Agent;
use crate::core::config::StewardConfig;
use crate::core::error::Result;
use crate::core::types::{AgentId, Step, ZoneId};
use crate::market::board::TaskMarket;
use crate::market::publish::{JobPublisher, ZonePublisher};
use crate::memory::{AgentMemory, MemoryStore};
use crate::movement::coordinator::MovementCoordinator;
use crate::population::controller::{PopulationController, PopulationDecision, SpawnPlan};
use crate::simulation::behavior::{Activity, AgentBrain, JobBrain};
use crate::world::structures::StructureKind;
use crate::world::World;

/// What happened in one zone during a step
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneReport {
    pub zone: ZoneId,
    /// Agents alive after population changes
    pub agents: usize,
    pub jobs_published: usize,
    pub jobs_assigned: usize,
    pub plan: SpawnPlan,
    pub spawned: Option<Role>,
    pub culled: Option<AgentId>,
    pub promoted: Option<AgentId>,
    pub idle: usize,
    pub moves: usize,
    pub backoffs: usize,
}

impl ZoneReport {
    fn new(zone: ZoneId) -> Self {
        Self {
            zone,
            agents: 0,
            jobs_published: 0,
            jobs_assigned: 0,
            plan: SpawnPlan::default(),
            spawned: None,
            culled: None,
            promoted: None,
            idle: 0,
            moves: 0,
            backoffs: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub step: Step,
    pub zones: Vec<ZoneReport>,
    /// Memories dropped for agents that no longer exist
    pub pruned: usize,
}

impl StepReport {
    pub fn zone(&self, id: ZoneId) -> Option<&ZoneReport> {
        self.zones.iter().find(|z| z.zone == id)
    }

    pub fn spawned(&self) -> usize {
        self.zones.iter().filter(|z| z.spawned.is_some()).count()
    }

    pub fn culled(&self) -> usize {
        self.zones.iter().filter(|z| z.culled.is_some()).count()
    }

    pub fn promoted(&self) -> usize {
        self.zones.iter().filter(|z| z.promoted.is_some()).count()
    }

    pub fn moves(&self) -> usize {
        self.zones.iter().map(|z| z.moves).sum()
    }

    pub fn jobs_published(&self) -> usize {
        self.zones.iter().map(|z| z.jobs_published).sum()
    }

    pub fn jobs_assigned(&self) -> usize {
        self.zones.iter().map(|z| z.jobs_assigned).sum()
    }
}

/// Composes the market, population control and movement into a step
pub struct Orchestrator {
    config: StewardConfig,
    store: MemoryStore,
    market: TaskMarket,
    population: PopulationController,
    publishers: Vec<Box<dyn JobPublisher>>,
    brain: Box<dyn AgentBrain>,
}

impl Orchestrator {
    pub fn new(config: StewardConfig) -> Self {
        let publisher = ZonePublisher::new(config.market.max_harvest_slots);
        Self {
            store: MemoryStore::new(),
            market: TaskMarket::new(config.market.clone()),
            population: PopulationController::new(config.population.clone()),
            publishers: vec![Box::new(publisher)],
            brain: Box::new(JobBrain),
            config,
        }
    }

    /// Resume from a previously persisted store
    pub fn with_store(mut self, store: MemoryStore) -> Self {
        self.store = store;
        self
    }

    /// Add a publisher after the existing ones
    pub fn with_publisher(mut self, publisher: Box<dyn JobPublisher>) -> Self {
        self.publishers.push(publisher);
        self
    }

    pub fn with_brain(mut self, brain: Box<dyn AgentBrain>) -> Self {
        self.brain = brain;
        self
    }

    pub fn config(&self) -> &StewardConfig {
        &self.config
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Board as it stood at the end of the last step
    pub fn market(&self) -> &TaskMarket {
        &self.market
    }

    /// Run every phase for every zone that has a spawn
    ///
    /// A failing zone is logged and skipped; the others still run.
    pub fn run_step(&mut self, world: &mut World) -> StepReport {
        let mut report = StepReport {
            step: world.step,
            ..Default::default()
        };

        for zone_id in world.zone_ids() {
            let owned = world.zone(zone_id).map_or(false, |z| {
                z.structures.iter().any(|s| s.kind == StructureKind::Spawn)
            });
            if !owned {
                continue;
            }
            match self.run_zone(world, zone_id) {
                Ok(zone_report) => report.zones.push(zone_report),
                Err(e) => tracing::warn!(zone = %zone_id, error = %e, "zone step failed"),
            }
        }

        report.pruned = self.store.prune(|id| world.is_alive(id));
        report
    }

    fn run_zone(&mut self, world: &mut World, zone_id: ZoneId) -> Result<ZoneReport> {
        let mut report = ZoneReport::new(zone_id);
        self.market.reset(zone_id);

        let zone = world.zone(zone_id)?;
        let mut roster: Vec<Agent> = zone
            .agents
            .iter()
            .map(|live| Agent::rehydrate(zone_id, live, self.store.agent(live.id)))
            .collect();

        // An empty zone bootstraps and does nothing else
        if roster.is_empty() {
            let decision = self.population.run(zone, &self.market, &mut roster);
            self.apply_population(world, zone_id, &decision, &mut roster, &mut report)?;
            self.persist(&roster, &mut report);
            return Ok(report);
        }

        for publisher in &self.publishers {
            publisher.publish(zone, &mut self.market);
        }
        report.jobs_published = self.market.jobs(zone_id).len();

        let decision = self.population.run(zone, &self.market, &mut roster);
        self.apply_population(world, zone_id, &decision, &mut roster, &mut report)?;

        let zone = world.zone(zone_id)?;
        let mut movement = MovementCoordinator::new();
        for agent in roster.iter_mut() {
            let activity = self
                .brain
                .decide(agent, zone, &mut self.market, &mut movement);
            if activity == Activity::Idle {
                report.idle += 1;
            }
        }
        report.jobs_assigned = self.market.assigned_count(zone_id);

        let resolution = movement.resolve(zone, &mut roster, &self.config.movement);
        report.backoffs = resolution.backoffs.len();

        let results = world.zone_mut(zone_id)?.apply_moves(&resolution.commands);
        for (command, result) in resolution.commands.iter().zip(results) {
            match result {
                Ok(()) => report.moves += 1,
                Err(e) => {
                    tracing::warn!(agent = %command.agent, error = %e, "world refused move");
                    // The cache assumed the step happened
                    if let Some(agent) = roster.iter_mut().find(|a| a.id == command.agent) {
                        agent.movement.clear();
                    }
                }
            }
        }

        self.persist(&roster, &mut report);
        Ok(report)
    }

    /// Hand the controller's decision to the world's primitives
    ///
    /// The roster is kept in step with the world: culled agents leave it and
    /// new agents join it, so movement sees who actually stands where.
    fn apply_population(
        &mut self,
        world: &mut World,
        zone_id: ZoneId,
        decision: &PopulationDecision,
        roster: &mut Vec<Agent>,
        report: &mut ZoneReport,
    ) -> Result<()> {
        let step = world.step;
        let zone = world.zone_mut(zone_id)?;
        report.plan = decision.plan;

        if let Some(id) = decision.cull {
            match zone.suicide(id) {
                Ok(()) => {
                    roster.retain(|a| a.id != id);
                    self.store.forget_agent(id);
                    self.store.zone_mut(zone_id).culled += 1;
                    report.culled = Some(id);
                }
                Err(e) => tracing::warn!(zone = %zone_id, agent = %id, error = %e, "cull refused"),
            }
        }

        if let Some(id) = decision.promoted {
            self.store.zone_mut(zone_id).promoted += 1;
            report.promoted = Some(id);
        }

        if let Some(request) = &decision.spawn {
            match zone.spawn(request) {
                Ok(id) => {
                    let memory = AgentMemory::new(request.role, zone_id);
                    if let Some(live) = zone.agent(id) {
                        roster.push(Agent::rehydrate(zone_id, live, Some(&memory)));
                    }
                    self.store.save_agent(id, memory);
                    let counters = self.store.zone_mut(zone_id);
                    counters.spawned += 1;
                    counters.last_spawn_step = Some(step);
                    report.spawned = Some(request.role);
                }
                Err(e) => tracing::warn!(zone = %zone_id, error = %e, "spawn refused"),
            }
        }
        Ok(())
    }

    fn persist(&mut self, roster: &[Agent], report: &mut ZoneReport) {
        report.agents = roster.len();
        for agent in roster {
            self.store.save_agent(agent.id, agent.memory());
        }
    }
}
