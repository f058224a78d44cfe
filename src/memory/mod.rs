//! Durable key-value memory scoped per zone and per agent
//!
//! Nothing in the coordinator keeps process state between steps. Whatever must
//! survive (roles, held job references, cached paths, population counters)
//! lives here and is rehydrated at the start of every step.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::agent::role::Role;
use crate::core::error::Result;
use crate::core::types::{AgentId, Step, ZoneId};
use crate::market::job::JobRef;
use crate::movement::path_cache::MovementState;

/// Per-agent persisted fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMemory {
    pub role: Role,
    pub home_zone: ZoneId,
    pub current_job: Option<JobRef>,
    #[serde(default)]
    pub movement: MovementState,
}

impl AgentMemory {
    pub fn new(role: Role, home_zone: ZoneId) -> Self {
        Self {
            role,
            home_zone,
            current_job: None,
            movement: MovementState::default(),
        }
    }
}

/// Per-zone population counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneMemory {
    pub spawned: u64,
    pub culled: u64,
    pub promoted: u64,
    pub last_spawn_step: Option<Step>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStore {
    agents: BTreeMap<AgentId, AgentMemory>,
    zones: BTreeMap<ZoneId, ZoneMemory>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent(&self, id: AgentId) -> Option<&AgentMemory> {
        self.agents.get(&id)
    }

    pub fn save_agent(&mut self, id: AgentId, memory: AgentMemory) {
        self.agents.insert(id, memory);
    }

    pub fn forget_agent(&mut self, id: AgentId) -> Option<AgentMemory> {
        self.agents.remove(&id)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn zone(&self, id: ZoneId) -> ZoneMemory {
        self.zones.get(&id).cloned().unwrap_or_default()
    }

    pub fn zone_mut(&mut self, id: ZoneId) -> &mut ZoneMemory {
        self.zones.entry(id).or_default()
    }

    /// Drop memories of agents that are no longer alive; returns how many went
    pub fn prune(&mut self, is_alive: impl Fn(AgentId) -> bool) -> usize {
        let before = self.agents.len();
        self.agents.retain(|id, _| is_alive(*id));
        before - self.agents.len()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
