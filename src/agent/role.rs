//! Agent roles and the per-role constants population control relies on

use serde::{Deserialize, Serialize};

use crate::agent::body::PartKind;

/// What an agent is for. Mutable in place through promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Bootstrap body able to do a little of everything
    Generalist,
    Harvester,
    Transporter,
    Builder,
    Upgrader,
    Defender,
}

impl Role {
    /// Specialized roles in spawn-priority order
    pub const SPAWN_ORDER: [Role; 5] = [
        Role::Harvester,
        Role::Transporter,
        Role::Builder,
        Role::Upgrader,
        Role::Defender,
    ];

    /// The part kind that defines this role's throughput
    ///
    /// Generalists have none, so they are never counted as supply and never culled.
    pub fn critical_part(&self) -> Option<PartKind> {
        match self {
            Role::Generalist => None,
            Role::Harvester | Role::Builder | Role::Upgrader => Some(PartKind::Work),
            Role::Transporter => Some(PartKind::Carry),
            Role::Defender => Some(PartKind::Attack),
        }
    }

    /// Remaining lifetime below which an agent no longer counts as supply
    ///
    /// Covers spawn time plus travel to the work site, so the replacement
    /// arrives before the incumbent expires.
    pub fn preemption_threshold(&self) -> u32 {
        match self {
            Role::Generalist => 0,
            Role::Harvester => 150,
            Role::Transporter => 100,
            Role::Builder => 50,
            Role::Upgrader => 100,
            Role::Defender => 0,
        }
    }

    /// Roles that only turn stored energy into progress
    pub fn is_spender(&self) -> bool {
        matches!(self, Role::Builder | Role::Upgrader)
    }

    pub fn is_defensive(&self) -> bool {
        matches!(self, Role::Defender)
    }

    /// Repeating body unit and the maximum number of repeats
    pub fn body_unit(&self) -> (&'static [PartKind], usize) {
        use PartKind::*;
        match self {
            Role::Generalist => (&[Work, Carry, Move], 5),
            Role::Harvester => (&[Work, Work, Move], 3),
            Role::Transporter => (&[Carry, Carry, Move], 10),
            Role::Builder => (&[Work, Carry, Move], 5),
            Role::Upgrader => (&[Work, Work, Carry, Move], 5),
            Role::Defender => (&[Tough, Attack, Move], 8),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Generalist => "generalist",
            Role::Harvester => "harvester",
            Role::Transporter => "transporter",
            Role::Builder => "builder",
            Role::Upgrader => "upgrader",
            Role::Defender => "defender",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_order_starts_with_harvester() {
        assert_eq!(Role::SPAWN_ORDER[0], Role::Harvester);
        assert_eq!(Role::SPAWN_ORDER[1], Role::Transporter);
        assert!(Role::SPAWN_ORDER[2..4].iter().all(Role::is_spender));
        assert!(Role::SPAWN_ORDER[4].is_defensive());
    }

    #[test]
    fn test_every_body_unit_carries_its_critical_part() {
        for role in Role::SPAWN_ORDER {
            let critical = role.critical_part().unwrap();
            let (unit, _) = role.body_unit();
            assert!(unit.contains(&critical), "{} body lacks {:?}", role, critical);
            assert!(unit.contains(&PartKind::Move), "{} body cannot move", role);
        }
    }

    #[test]
    fn test_generalist_has_no_critical_part() {
        assert_eq!(Role::Generalist.critical_part(), None);
    }
}
