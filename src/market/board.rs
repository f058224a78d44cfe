//! The per-zone job board agents claim work from

use ahash::AHashMap;

use crate::agent::Agent;
use crate::core::config::MarketConfig;
use crate::core::types::ZoneId;
use crate::market::affinity::{qualifies, role_affinity};
use crate::market::job::{Job, JobType};

/// Jobs for the current step, per zone, in publication order
///
/// Boards are rebuilt from scratch every step. Publication order is the
/// tie-break order: among equally scored jobs the first published wins.
#[derive(Debug, Clone, Default)]
pub struct TaskMarket {
    boards: AHashMap<ZoneId, Vec<Job>>,
    config: MarketConfig,
}

impl TaskMarket {
    pub fn new(config: MarketConfig) -> Self {
        Self {
            boards: AHashMap::new(),
            config,
        }
    }

    /// Drop every job of a zone
    pub fn reset(&mut self, zone: ZoneId) {
        self.boards.entry(zone).or_default().clear();
    }

    /// Append a job; the caller must not publish the same work twice per step
    pub fn publish(&mut self, zone: ZoneId, mut job: Job) {
        job.assigned_agents.clear();
        self.boards.entry(zone).or_default().push(job);
    }

    pub fn jobs(&self, zone: ZoneId) -> &[Job] {
        self.boards.get(&zone).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of published jobs of one type
    pub fn count(&self, zone: ZoneId, job_type: &JobType) -> usize {
        self.jobs(zone)
            .iter()
            .filter(|j| &j.job_type == job_type)
            .count()
    }

    /// Slots taken across the whole board
    pub fn assigned_count(&self, zone: ZoneId) -> usize {
        self.jobs(zone).iter().map(|j| j.assigned_agents.len()).sum()
    }

    /// Score a job for an agent: priority dominates, then distance, then role affinity
    pub fn score(&self, agent: &Agent, job: &Job) -> i64 {
        let distance = i64::from(agent.position.range_to(job.target_pos));
        i64::from(job.priority) * i64::from(self.config.priority_weight)
            - distance * i64::from(self.config.distance_weight)
            + i64::from(role_affinity(agent.role, &job.job_type))
    }

    /// Give the agent the best open job on its home zone's board
    ///
    /// Any slot the agent already took this step is released first, so an
    /// agent never holds two jobs. The agent's `current_job` is updated either
    /// way; `None` means nothing on the board suits it.
    pub fn assign(&mut self, agent: &mut Agent) -> Option<&Job> {
        self.release(agent);

        let chosen = {
            let board = self.boards.get(&agent.home_zone);
            let caps = *agent.capabilities();
            let mut best: Option<(usize, i64)> = None;
            for (i, job) in board.into_iter().flatten().enumerate() {
                if job.is_full() || !qualifies(&caps, &job.job_type) {
                    continue;
                }
                let score = self.score(agent, job);
                if best.map_or(true, |(_, top)| score > top) {
                    best = Some((i, score));
                }
            }
            best.map(|(i, _)| i)
        };

        let Some(i) = chosen else {
            agent.current_job = None;
            return None;
        };
        let board = self.boards.get_mut(&agent.home_zone)?;
        let job = &mut board[i];
        job.assigned_agents.push(agent.id);
        agent.current_job = Some(job.job_ref());
        Some(&*job)
    }

    /// Give up whatever slot the agent holds on its board this step
    pub fn release(&mut self, agent: &mut Agent) {
        if let Some(board) = self.boards.get_mut(&agent.home_zone) {
            for job in board.iter_mut() {
                job.assigned_agents.retain(|id| *id != agent.id);
            }
        }
        agent.current_job = None;
    }
}
