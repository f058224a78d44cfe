//! A zone: one tile grid plus everything standing on it

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::agent::body::{body_cost, fresh_body, BodyPart, PartKind};
use crate::agent::role::Role;
use crate::core::config::MovementConfig;
use crate::core::error::{Result, StewardError};
use crate::core::types::{AgentId, Direction, ObjectId, Tile, ZoneId};
use crate::market::job::TargetRef;
use crate::movement::coordinator::MoveCommand;
use crate::world::structures::{
    ConstructionSite, Hostile, ResourceNode, Structure, StructureKind,
};
use crate::world::terrain::{Terrain, TileGrid};

/// Lifetime of a freshly spawned agent, in steps
pub const AGENT_LIFETIME: u32 = 1500;

/// Steps a spawn spends per body part
pub const SPAWN_STEPS_PER_PART: u32 = 3;

/// Energy a spawn regenerates per step while below this amount
pub const SPAWN_REGEN_CEILING: u32 = 300;

/// Live, world-side view of an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveAgent {
    pub id: AgentId,
    pub body: Vec<BodyPart>,
    pub pos: Tile,
    pub remaining_lifetime: u32,
    /// Steps until the body is finished; the agent cannot act until then
    pub spawning_steps: u32,
}

impl LiveAgent {
    pub fn is_spawning(&self) -> bool {
        self.spawning_steps > 0
    }
}

/// A request for the world's creation primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub spawn: ObjectId,
    pub role: Role,
    pub body: Vec<PartKind>,
}

impl SpawnRequest {
    pub fn cost(&self) -> u32 {
        body_cost(&self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    /// Controller level, 1..=8
    pub tier: u8,
    pub controller: Tile,
    pub terrain: TileGrid<Terrain>,
    pub structures: Vec<Structure>,
    pub sites: Vec<ConstructionSite>,
    pub nodes: Vec<ResourceNode>,
    pub hostiles: Vec<Hostile>,
    /// Live agents in roster order
    pub agents: Vec<LiveAgent>,
    next_object_id: u32,
}

impl Zone {
    pub fn new(id: ZoneId, width: u32, height: u32) -> Self {
        Self {
            id,
            tier: 1,
            controller: Tile::new(0, 0),
            terrain: TileGrid::new(width, height),
            structures: Vec::new(),
            sites: Vec::new(),
            nodes: Vec::new(),
            hostiles: Vec::new(),
            agents: Vec::new(),
            next_object_id: 1,
        }
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        id
    }

    // === POPULATING ===

    pub fn add_structure(&mut self, kind: StructureKind, pos: Tile) -> ObjectId {
        let id = self.allocate_id();
        self.structures.push(Structure::new(id, kind, pos));
        id
    }

    /// Spawn pre-filled with energy
    pub fn add_spawn(&mut self, pos: Tile, energy: u32) -> ObjectId {
        let id = self.add_structure(StructureKind::Spawn, pos);
        if let Some(s) = self.structure_mut(id) {
            s.energy = energy.min(s.energy_capacity);
        }
        id
    }

    pub fn add_node(&mut self, pos: Tile) -> ObjectId {
        let id = self.allocate_id();
        self.nodes.push(ResourceNode {
            id,
            pos,
            energy: 3000,
            energy_capacity: 3000,
        });
        id
    }

    pub fn add_site(&mut self, kind: StructureKind, pos: Tile) -> ObjectId {
        let id = self.allocate_id();
        self.sites.push(ConstructionSite {
            id,
            kind,
            pos,
            progress: 0,
            progress_total: kind.hits_max().min(5000),
        });
        id
    }

    pub fn add_hostile(&mut self, pos: Tile, attack_parts: u32) -> ObjectId {
        let id = self.allocate_id();
        self.hostiles.push(Hostile {
            id,
            pos,
            attack_parts,
        });
        id
    }

    /// Place a finished agent directly, bypassing the spawn
    pub fn add_agent(&mut self, body: &[PartKind], pos: Tile, remaining_lifetime: u32) -> AgentId {
        let id = AgentId::new();
        self.agents.push(LiveAgent {
            id,
            body: fresh_body(body),
            pos,
            remaining_lifetime,
            spawning_steps: 0,
        });
        id
    }

    // === QUERIES ===

    pub fn structure(&self, id: ObjectId) -> Option<&Structure> {
        self.structures.iter().find(|s| s.id == id)
    }

    pub fn structure_mut(&mut self, id: ObjectId) -> Option<&mut Structure> {
        self.structures.iter_mut().find(|s| s.id == id)
    }

    pub fn agent(&self, id: AgentId) -> Option<&LiveAgent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn agent_at(&self, tile: Tile) -> Option<&LiveAgent> {
        self.agents.iter().find(|a| a.pos == tile)
    }

    /// Energy currently available for spawning
    pub fn energy_available(&self) -> u32 {
        self.structures
            .iter()
            .filter(|s| s.kind.feeds_spawning())
            .map(|s| s.energy)
            .sum()
    }

    /// Maximum energy the spawning structures can hold
    pub fn energy_capacity(&self) -> u32 {
        self.structures
            .iter()
            .filter(|s| s.kind.feeds_spawning())
            .map(|s| s.energy_capacity)
            .sum()
    }

    /// Whether anything beyond the spawn itself can absorb energy
    pub fn has_energy_sinks(&self) -> bool {
        self.structures
            .iter()
            .any(|s| matches!(s.kind, StructureKind::Extension | StructureKind::Storage))
    }

    pub fn idle_spawn(&self) -> Option<&Structure> {
        self.structures.iter().find(|s| s.is_idle_spawn())
    }

    /// Current position of a job target, or `None` if it no longer exists
    pub fn lookup(&self, target: TargetRef) -> Option<Tile> {
        match target {
            TargetRef::Controller => Some(self.controller),
            TargetRef::Tile(tile) => self.terrain.contains(tile).then_some(tile),
            TargetRef::Object(id) => self
                .structures
                .iter()
                .map(|s| (s.id, s.pos))
                .chain(self.sites.iter().map(|s| (s.id, s.pos)))
                .chain(self.nodes.iter().map(|n| (n.id, n.pos)))
                .chain(self.hostiles.iter().map(|h| (h.id, h.pos)))
                .find(|(oid, _)| *oid == id)
                .map(|(_, pos)| pos),
        }
    }

    /// Whether an agent may stand on this tile (ignoring other agents)
    pub fn is_walkable(&self, tile: Tile) -> bool {
        let Some(terrain) = self.terrain.get(tile) else {
            return false;
        };
        terrain.is_walkable()
            && !self
                .structures
                .iter()
                .any(|s| s.pos == tile && s.kind.is_blocking())
    }

    /// Cost of stepping onto every tile; `None` marks impassable tiles
    ///
    /// Roads override the underlying terrain.
    pub fn cost_matrix(&self, config: &MovementConfig) -> TileGrid<Option<u32>> {
        let mut costs = TileGrid::new(self.terrain.width(), self.terrain.height());
        for tile in self.terrain.tiles() {
            let cost = match self.terrain.get(tile) {
                Some(Terrain::Plain) => Some(config.plain_cost),
                Some(Terrain::Swamp) => Some(config.swamp_cost),
                Some(Terrain::Wall) | None => None,
            };
            costs.set(tile, cost);
        }
        for s in &self.structures {
            if s.kind.is_blocking() {
                costs.set(s.pos, None);
            } else if s.kind == StructureKind::Road && costs.get(s.pos).copied().flatten().is_some() {
                costs.set(s.pos, Some(config.road_cost));
            }
        }
        costs
    }

    /// Walkable tiles adjacent to `tile`
    pub fn open_neighbors(&self, tile: Tile) -> usize {
        tile.neighbors().filter(|n| self.is_walkable(*n)).count()
    }

    // === PRIMITIVES ===

    /// Build a new agent at the requested spawn, paying its full cost
    pub fn spawn(&mut self, request: &SpawnRequest) -> Result<AgentId> {
        let reject = |reason: &str| StewardError::SpawnRejected {
            spawn: request.spawn,
            reason: reason.to_string(),
        };

        let spawn = self.structure(request.spawn).ok_or_else(|| reject("no such spawn"))?;
        if !spawn.is_idle_spawn() {
            return Err(reject("spawn is busy"));
        }
        if request.body.is_empty() {
            return Err(reject("empty body"));
        }
        let cost = request.cost();
        if cost > self.energy_available() {
            return Err(reject("not enough energy"));
        }
        let spawn_pos = spawn.pos;
        let exit = spawn_pos
            .neighbors()
            .find(|t| self.is_walkable(*t) && self.agent_at(*t).is_none())
            .ok_or_else(|| reject("no free tile next to spawn"))?;

        // Spawns pay first, then extensions in placement order
        let mut owed = cost;
        let mut payers: Vec<usize> = (0..self.structures.len())
            .filter(|i| self.structures[*i].kind.feeds_spawning())
            .collect();
        payers.sort_by_key(|i| self.structures[*i].kind != StructureKind::Spawn);
        for i in payers {
            let s = &mut self.structures[i];
            let paid = owed.min(s.energy);
            s.energy -= paid;
            owed -= paid;
            if owed == 0 {
                break;
            }
        }

        let steps = request.body.len() as u32 * SPAWN_STEPS_PER_PART;
        if let Some(s) = self.structure_mut(request.spawn) {
            s.busy_steps = steps;
        }

        let id = AgentId::new();
        self.agents.push(LiveAgent {
            id,
            body: fresh_body(&request.body),
            pos: exit,
            remaining_lifetime: AGENT_LIFETIME,
            spawning_steps: steps,
        });
        Ok(id)
    }

    /// Remove an agent immediately
    pub fn suicide(&mut self, id: AgentId) -> Result<()> {
        let idx = self
            .agents
            .iter()
            .position(|a| a.id == id)
            .ok_or(StewardError::UnknownAgent(id))?;
        self.agents.remove(idx);
        Ok(())
    }

    /// Move one agent a single tile
    pub fn move_agent(&mut self, id: AgentId, direction: Direction) -> Result<()> {
        let from = self.agent(id).ok_or(StewardError::UnknownAgent(id))?.pos;
        let command = MoveCommand {
            agent: id,
            from,
            to: from.offset(direction),
            direction,
        };
        self.apply_moves(&[command])
            .pop()
            .unwrap_or(Err(StewardError::UnknownAgent(id)))
    }

    /// Apply a batch of simultaneous single-tile moves
    ///
    /// A move is refused when it is not a single step onto a walkable tile, or
    /// when its destination would still be occupied by an agent that is not
    /// itself leaving. Each command yields its own result, in input order.
    pub fn apply_moves(&mut self, commands: &[MoveCommand]) -> Vec<Result<()>> {
        let index: AHashMap<AgentId, usize> = self
            .agents
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id, i))
            .collect();

        let mut verdicts: Vec<Result<()>> = commands
            .iter()
            .map(|cmd| self.check_move(&index, cmd))
            .collect();

        // First claimant of a tile wins it
        let mut claimed: AHashSet<Tile> = AHashSet::new();
        for (cmd, verdict) in commands.iter().zip(verdicts.iter_mut()) {
            if verdict.is_ok() && !claimed.insert(cmd.to) {
                *verdict = Err(occupied(cmd));
            }
        }

        // A refused mover stays put, which can block whoever was following it
        loop {
            let leaving: AHashSet<AgentId> = commands
                .iter()
                .zip(&verdicts)
                .filter(|(_, v)| v.is_ok())
                .map(|(c, _)| c.agent)
                .collect();
            let mut changed = false;
            for (cmd, verdict) in commands.iter().zip(verdicts.iter_mut()) {
                if verdict.is_err() {
                    continue;
                }
                let blocked_by_stayer = self
                    .agents
                    .iter()
                    .any(|a| a.pos == cmd.to && !leaving.contains(&a.id));
                if blocked_by_stayer {
                    *verdict = Err(occupied(cmd));
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        for (cmd, verdict) in commands.iter().zip(&verdicts) {
            if verdict.is_ok() {
                if let Some(&i) = index.get(&cmd.agent) {
                    self.agents[i].pos = cmd.to;
                }
            }
        }
        verdicts
    }

    fn check_move(&self, index: &AHashMap<AgentId, usize>, cmd: &MoveCommand) -> Result<()> {
        let reject = |reason: &str| StewardError::MoveRejected {
            agent: cmd.agent,
            to: cmd.to,
            reason: reason.to_string(),
        };
        let agent = index
            .get(&cmd.agent)
            .map(|&i| &self.agents[i])
            .ok_or(StewardError::UnknownAgent(cmd.agent))?;
        if agent.is_spawning() {
            return Err(reject("agent is still spawning"));
        }
        if agent.pos != cmd.from || !cmd.from.is_adjacent(cmd.to) {
            return Err(reject("not a single step from the agent's tile"));
        }
        if !self.is_walkable(cmd.to) {
            return Err(reject("destination not walkable"));
        }
        Ok(())
    }

    /// End-of-step bookkeeping: lifetimes, spawn timers, spawn regeneration
    ///
    /// Returns the agents that expired.
    pub fn advance(&mut self) -> Vec<AgentId> {
        for agent in &mut self.agents {
            if agent.spawning_steps > 0 {
                agent.spawning_steps -= 1;
            } else {
                agent.remaining_lifetime = agent.remaining_lifetime.saturating_sub(1);
            }
        }
        let expired: Vec<AgentId> = self
            .agents
            .iter()
            .filter(|a| a.remaining_lifetime == 0)
            .map(|a| a.id)
            .collect();
        self.agents.retain(|a| a.remaining_lifetime > 0);

        for s in &mut self.structures {
            s.busy_steps = s.busy_steps.saturating_sub(1);
            if s.kind == StructureKind::Spawn && s.energy < SPAWN_REGEN_CEILING {
                s.energy += 1;
            }
        }
        expired
    }
}

fn occupied(cmd: &MoveCommand) -> StewardError {
    StewardError::MoveRejected {
        agent: cmd.agent,
        to: cmd.to,
        reason: "destination occupied".into(),
    }
}
