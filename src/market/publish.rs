//! Turning a zone snapshot into jobs
//!
//! Publishers run once per step right after the board is reset. The crate
//! ships one that covers the standard economy; extra publishers can add their
//! own job types alongside it.

use crate::market::board::TaskMarket;
use crate::market::job::{Job, JobType, TargetRef};
use crate::world::structures::StructureKind;
use crate::world::zone::Zone;

/// Anything that posts work to the market
pub trait JobPublisher {
    fn publish(&self, zone: &Zone, market: &mut TaskMarket);
}

/// Publishes defense, hauling, harvesting, building, repair and upgrade work
#[derive(Debug, Clone)]
pub struct ZonePublisher {
    pub max_harvest_slots: u32,
}

impl Default for ZonePublisher {
    fn default() -> Self {
        Self {
            max_harvest_slots: 3,
        }
    }
}

impl ZonePublisher {
    pub fn new(max_harvest_slots: u32) -> Self {
        Self { max_harvest_slots }
    }
}

impl JobPublisher for ZonePublisher {
    fn publish(&self, zone: &Zone, market: &mut TaskMarket) {
        let id = zone.id;

        for hostile in &zone.hostiles {
            let job = Job::new(JobType::Defend, TargetRef::Object(hostile.id), hostile.pos)
                .with_priority(5)
                .with_slots(3);
            market.publish(id, job);
        }

        // Refill whatever feeds the spawn before anything else
        for s in &zone.structures {
            let priority = match s.kind {
                StructureKind::Spawn | StructureKind::Extension | StructureKind::Tower => 3,
                StructureKind::Storage => 1,
                _ => continue,
            };
            if s.free_capacity() == 0 {
                continue;
            }
            let slots = if s.kind == StructureKind::Storage { 2 } else { 1 };
            let job = Job::new(JobType::Haul, TargetRef::Object(s.id), s.pos)
                .with_priority(priority)
                .with_slots(slots);
            market.publish(id, job);
        }

        for node in zone.nodes.iter().filter(|n| n.energy > 0) {
            let slots = (zone.open_neighbors(node.pos) as u32).min(self.max_harvest_slots);
            let job = Job::new(JobType::Harvest, TargetRef::Object(node.id), node.pos)
                .with_priority(2)
                .with_slots(slots);
            market.publish(id, job);
        }

        for site in &zone.sites {
            let job = Job::new(JobType::Build, TargetRef::Object(site.id), site.pos)
                .with_priority(1)
                .with_slots(3);
            market.publish(id, job);
        }

        for s in &zone.structures {
            let fortification = matches!(s.kind, StructureKind::Wall | StructureKind::Rampart);
            if fortification || s.hits * 2 >= s.hits_max {
                continue;
            }
            let job = Job::new(JobType::Repair, TargetRef::Object(s.id), s.pos);
            market.publish(id, job);
        }

        let upgrade = Job::new(JobType::Upgrade, TargetRef::Controller, zone.controller)
            .with_slots(zone.tier as u32 + 1);
        market.publish(id, upgrade);
    }
}
