//! Jobs: assignable units of work that live for exactly one step

use serde::{Deserialize, Serialize};

use crate::core::types::{AgentId, ObjectId, Tile};

/// Kind of work a job represents
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    Harvest,
    Build,
    Upgrade,
    Repair,
    Haul,
    Defend,
    /// Published by a collaborator this crate knows nothing about
    Custom(String),
}

impl JobType {
    /// Range at which an agent can perform this job from where it stands
    pub fn working_range(&self) -> u32 {
        match self {
            JobType::Build | JobType::Repair | JobType::Upgrade => 3,
            JobType::Harvest | JobType::Haul | JobType::Defend | JobType::Custom(_) => 1,
        }
    }
}

/// What a job points at in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetRef {
    /// A structure, construction site, resource node or hostile
    Object(ObjectId),
    /// The zone's controller
    Controller,
    /// A bare tile
    Tile(Tile),
}

/// Durable reference to the job an agent is holding
///
/// Jobs themselves never persist; this is what survives between steps so the
/// holder can notice when the target disappears.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobRef {
    pub job_type: JobType,
    pub target: TargetRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub job_type: JobType,
    pub target: TargetRef,
    /// Where the target stood when the job was published
    pub target_pos: Tile,
    pub priority: i32,
    pub slot_count: u32,
    pub assigned_agents: Vec<AgentId>,
}

impl Job {
    /// New job with default priority 0 and a single slot
    pub fn new(job_type: JobType, target: TargetRef, target_pos: Tile) -> Self {
        Self {
            job_type,
            target,
            target_pos,
            priority: 0,
            slot_count: 1,
            assigned_agents: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_slots(mut self, slot_count: u32) -> Self {
        self.slot_count = slot_count;
        self
    }

    pub fn is_full(&self) -> bool {
        self.assigned_agents.len() as u32 >= self.slot_count
    }

    pub fn job_ref(&self) -> JobRef {
        JobRef {
            job_type: self.job_type.clone(),
            target: self.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_defaults() {
        let job = Job::new(JobType::Haul, TargetRef::Object(ObjectId(3)), Tile::new(1, 1));
        assert_eq!(job.priority, 0);
        assert_eq!(job.slot_count, 1);
        assert!(job.assigned_agents.is_empty());
        assert!(!job.is_full());
    }

    #[test]
    fn test_zero_slot_job_is_always_full() {
        let job = Job::new(JobType::Build, TargetRef::Controller, Tile::new(0, 0)).with_slots(0);
        assert!(job.is_full());
    }

    #[test]
    fn test_working_ranges() {
        assert_eq!(JobType::Upgrade.working_range(), 3);
        assert_eq!(JobType::Harvest.working_range(), 1);
        assert_eq!(JobType::Custom("scout".into()).working_range(), 1);
    }
}
