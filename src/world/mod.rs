//! The shared tile world the coordinator reads from and acts upon
//!
//! Structure placement, hostile behavior and resource flow belong to outside
//! collaborators. This module only keeps the snapshot they produce and the
//! primitives (spawn, move, suicide) the coordinator hands its decisions to.

pub mod generate;
pub mod structures;
pub mod terrain;
pub mod zone;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, StewardError};
use crate::core::types::{AgentId, Step, ZoneId};

pub use structures::{ConstructionSite, Hostile, ResourceNode, Structure, StructureKind};
pub use terrain::{Terrain, TileGrid};
pub use zone::{LiveAgent, SpawnRequest, Zone};

/// All zones, iterated in id order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    pub step: Step,
    zones: BTreeMap<ZoneId, Zone>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_zone(&mut self, zone: Zone) {
        self.zones.insert(zone.id, zone);
    }

    pub fn zone(&self, id: ZoneId) -> Result<&Zone> {
        self.zones.get(&id).ok_or(StewardError::UnknownZone(id))
    }

    pub fn zone_mut(&mut self, id: ZoneId) -> Result<&mut Zone> {
        self.zones.get_mut(&id).ok_or(StewardError::UnknownZone(id))
    }

    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    pub fn zone_ids(&self) -> Vec<ZoneId> {
        self.zones.keys().copied().collect()
    }

    /// Zone an agent currently stands in
    pub fn find_agent(&self, id: AgentId) -> Option<(ZoneId, &LiveAgent)> {
        self.zones
            .values()
            .find_map(|z| z.agent(id).map(|a| (z.id, a)))
    }

    pub fn is_alive(&self, id: AgentId) -> bool {
        self.find_agent(id).is_some()
    }

    /// Close the current step in every zone
    ///
    /// Returns every agent that expired naturally.
    pub fn advance(&mut self) -> Vec<AgentId> {
        self.step += 1;
        let mut expired = Vec::new();
        for zone in self.zones.values_mut() {
            let gone = zone.advance();
            for id in &gone {
                tracing::debug!(zone = %zone.id, agent = %id, "agent expired");
            }
            expired.extend(gone);
        }
        expired
    }
}
