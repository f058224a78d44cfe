//! Built structures, construction sites, resource nodes and hostiles

use serde::{Deserialize, Serialize};

use crate::core::types::{ObjectId, Tile};

/// Type of built structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Spawn,
    Extension,
    Storage,
    Tower,
    Container,
    Road,
    Rampart,
    Wall,
}

impl StructureKind {
    /// Whether agents can stand on this structure
    pub fn is_blocking(&self) -> bool {
        match self {
            StructureKind::Spawn
            | StructureKind::Extension
            | StructureKind::Storage
            | StructureKind::Tower
            | StructureKind::Wall => true,
            StructureKind::Container | StructureKind::Road | StructureKind::Rampart => false,
        }
    }

    /// Energy storage capacity of a freshly built structure
    pub fn energy_capacity(&self) -> u32 {
        match self {
            StructureKind::Spawn => 300,
            StructureKind::Extension => 50,
            StructureKind::Storage => 1_000_000,
            StructureKind::Tower => 1000,
            StructureKind::Container => 2000,
            StructureKind::Road | StructureKind::Rampart | StructureKind::Wall => 0,
        }
    }

    pub fn hits_max(&self) -> u32 {
        match self {
            StructureKind::Spawn => 5000,
            StructureKind::Extension => 1000,
            StructureKind::Storage => 10_000,
            StructureKind::Tower => 3000,
            StructureKind::Container => 250_000,
            StructureKind::Road => 5000,
            StructureKind::Rampart => 300_000,
            StructureKind::Wall => 300_000_000,
        }
    }

    /// Structures whose energy pays for new bodies
    pub fn feeds_spawning(&self) -> bool {
        matches!(self, StructureKind::Spawn | StructureKind::Extension)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub id: ObjectId,
    pub kind: StructureKind,
    pub pos: Tile,
    pub hits: u32,
    pub hits_max: u32,
    pub energy: u32,
    pub energy_capacity: u32,
    /// Steps until the body currently being built is finished (spawns only)
    pub busy_steps: u32,
}

impl Structure {
    pub fn new(id: ObjectId, kind: StructureKind, pos: Tile) -> Self {
        Self {
            id,
            kind,
            pos,
            hits: kind.hits_max(),
            hits_max: kind.hits_max(),
            energy: 0,
            energy_capacity: kind.energy_capacity(),
            busy_steps: 0,
        }
    }

    pub fn free_capacity(&self) -> u32 {
        self.energy_capacity.saturating_sub(self.energy)
    }

    pub fn is_idle_spawn(&self) -> bool {
        self.kind == StructureKind::Spawn && self.busy_steps == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionSite {
    pub id: ObjectId,
    pub kind: StructureKind,
    pub pos: Tile,
    pub progress: u32,
    pub progress_total: u32,
}

/// A harvestable energy source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: ObjectId,
    pub pos: Tile,
    pub energy: u32,
    pub energy_capacity: u32,
}

/// An agent not under our control that threatens the zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hostile {
    pub id: ObjectId,
    pub pos: Tile,
    /// Combined attack parts; zero means a harmless scout
    pub attack_parts: u32,
}
