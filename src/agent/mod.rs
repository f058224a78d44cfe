//! Agents as the coordinator sees them: live world state merged with durable memory

pub mod body;
pub mod role;

use crate::core::types::{AgentId, Tile, ZoneId};
use crate::market::job::JobRef;
use crate::memory::AgentMemory;
use crate::movement::path_cache::MovementState;
use crate::world::zone::LiveAgent;

pub use body::{BodyPart, CapabilitySet, PartKind};
pub use role::Role;

#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub id: AgentId,
    pub role: Role,
    pub position: Tile,
    pub remaining_lifetime: u32,
    pub spawning: bool,
    pub home_zone: ZoneId,
    pub current_job: Option<JobRef>,
    pub movement: MovementState,
    body: Vec<BodyPart>,
    capabilities: CapabilitySet,
}

impl Agent {
    /// Fresh agent with no job and no cached path
    pub fn new(
        role: Role,
        parts: &[PartKind],
        position: Tile,
        remaining_lifetime: u32,
        home_zone: ZoneId,
    ) -> Self {
        let body = body::fresh_body(parts);
        Self {
            id: AgentId::new(),
            role,
            capabilities: CapabilitySet::from_body(&body),
            body,
            position,
            remaining_lifetime,
            spawning: false,
            home_zone,
            current_job: None,
            movement: MovementState::default(),
        }
    }

    /// Rebuild an agent for this step from the world and whatever was persisted
    ///
    /// An agent with no memory (lost store, external creation) gets a role
    /// guessed from its body.
    pub fn rehydrate(zone: ZoneId, live: &LiveAgent, memory: Option<&AgentMemory>) -> Self {
        let (role, home_zone, current_job, movement) = match memory {
            Some(m) => (m.role, m.home_zone, m.current_job.clone(), m.movement.clone()),
            None => {
                let role = infer_role(&live.body);
                tracing::warn!(agent = %live.id, %role, "no memory for agent, inferred role from body");
                (role, zone, None, MovementState::default())
            }
        };

        Self {
            id: live.id,
            role,
            capabilities: CapabilitySet::from_body(&live.body),
            body: live.body.clone(),
            position: live.pos,
            remaining_lifetime: live.remaining_lifetime,
            spawning: live.is_spawning(),
            home_zone,
            current_job,
            movement,
        }
    }

    /// Fields that survive to the next step
    pub fn memory(&self) -> AgentMemory {
        AgentMemory {
            role: self.role,
            home_zone: self.home_zone,
            current_job: self.current_job.clone(),
            movement: self.movement.clone(),
        }
    }

    pub fn body(&self) -> &[BodyPart] {
        &self.body
    }

    /// Set one part's hits, keeping the capability set in step with the body
    pub fn set_part_hits(&mut self, index: usize, hits: u32) {
        if let Some(part) = self.body.get_mut(index) {
            part.hits = hits;
            self.capabilities = CapabilitySet::from_body(&self.body);
        }
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Living parts of this agent's critical kind (0 for roles without one)
    pub fn critical_parts(&self) -> u32 {
        self.role
            .critical_part()
            .map(|kind| body::living_parts(&self.body, kind))
            .unwrap_or(0)
    }

    pub fn has_combat_damage(&self) -> bool {
        body::has_combat_damage(&self.body)
    }

    /// Counts toward supply: not about to expire
    pub fn is_healthy(&self) -> bool {
        self.spawning || self.remaining_lifetime >= self.role.preemption_threshold()
    }
}

/// Best-effort role for a body that lost its memory
pub fn infer_role(body: &[BodyPart]) -> Role {
    let caps = CapabilitySet::from_body(body);
    if caps.can_attack() || caps.can_ranged_attack() || caps.can_heal() {
        Role::Defender
    } else if caps.can_work() && caps.can_carry() {
        Role::Generalist
    } else if caps.can_work() {
        Role::Harvester
    } else if caps.can_carry() {
        Role::Transporter
    } else {
        Role::Generalist
    }
}
