//! Agent bodies: ordered capability parts and the capability set derived from them

use serde::{Deserialize, Serialize};

/// Hit points of a freshly built part
pub const PART_MAX_HITS: u32 = 100;

/// Kind of capability part an agent body is assembled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartKind {
    Move,
    Work,
    Carry,
    Attack,
    RangedAttack,
    Heal,
    Tough,
    Claim,
}

impl PartKind {
    /// Energy cost of building this part
    pub fn cost(&self) -> u32 {
        match self {
            PartKind::Move => 50,
            PartKind::Work => 100,
            PartKind::Carry => 50,
            PartKind::Attack => 80,
            PartKind::RangedAttack => 150,
            PartKind::Heal => 250,
            PartKind::Tough => 10,
            PartKind::Claim => 600,
        }
    }
}

/// One part of a live body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyPart {
    pub kind: PartKind,
    pub hits: u32,
}

impl BodyPart {
    pub fn fresh(kind: PartKind) -> Self {
        Self {
            kind,
            hits: PART_MAX_HITS,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hits > 0
    }
}

/// Total energy cost of an ordered part list
pub fn body_cost(parts: &[PartKind]) -> u32 {
    parts.iter().map(PartKind::cost).sum()
}

/// Build a fresh live body from a part list
pub fn fresh_body(parts: &[PartKind]) -> Vec<BodyPart> {
    parts.iter().copied().map(BodyPart::fresh).collect()
}

/// Count parts of a kind that still have hits
pub fn living_parts(body: &[BodyPart], kind: PartKind) -> u32 {
    body.iter().filter(|p| p.kind == kind && p.is_alive()).count() as u32
}

/// True if any part is below full hits
pub fn has_combat_damage(body: &[BodyPart]) -> bool {
    body.iter().any(|p| p.hits < PART_MAX_HITS)
}

/// What a body can currently do, computed once per agent per step
///
/// Only living parts contribute. A body whose WORK parts were all destroyed
/// stops qualifying for work jobs immediately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    work: u32,
    carry: u32,
    attack: u32,
    ranged_attack: u32,
    heal: u32,
    movement: u32,
    claim: u32,
}

impl CapabilitySet {
    pub fn from_body(body: &[BodyPart]) -> Self {
        let mut caps = Self::default();
        for part in body.iter().filter(|p| p.is_alive()) {
            let slot = match part.kind {
                PartKind::Work => &mut caps.work,
                PartKind::Carry => &mut caps.carry,
                PartKind::Attack => &mut caps.attack,
                PartKind::RangedAttack => &mut caps.ranged_attack,
                PartKind::Heal => &mut caps.heal,
                PartKind::Move => &mut caps.movement,
                PartKind::Claim => &mut caps.claim,
                PartKind::Tough => continue,
            };
            *slot += 1;
        }
        caps
    }

    pub fn can_work(&self) -> bool {
        self.work > 0
    }

    pub fn can_carry(&self) -> bool {
        self.carry > 0
    }

    pub fn can_attack(&self) -> bool {
        self.attack > 0
    }

    pub fn can_ranged_attack(&self) -> bool {
        self.ranged_attack > 0
    }

    pub fn can_heal(&self) -> bool {
        self.heal > 0
    }

    pub fn can_move(&self) -> bool {
        self.movement > 0
    }

    /// Living parts of one kind
    pub fn count(&self, kind: PartKind) -> u32 {
        match kind {
            PartKind::Work => self.work,
            PartKind::Carry => self.carry,
            PartKind::Attack => self.attack,
            PartKind::RangedAttack => self.ranged_attack,
            PartKind::Heal => self.heal,
            PartKind::Move => self.movement,
            PartKind::Claim => self.claim,
            PartKind::Tough => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_cost_sums_parts() {
        let parts = [PartKind::Work, PartKind::Carry, PartKind::Move];
        assert_eq!(body_cost(&parts), 200);
        assert_eq!(body_cost(&[]), 0);
    }

    #[test]
    fn test_capabilities_ignore_dead_parts() {
        let mut body = fresh_body(&[PartKind::Work, PartKind::Carry, PartKind::Move]);
        body[0].hits = 0;

        let caps = CapabilitySet::from_body(&body);
        assert!(!caps.can_work());
        assert!(caps.can_carry());
        assert!(caps.can_move());
        assert_eq!(caps.count(PartKind::Work), 0);
    }

    #[test]
    fn test_combat_damage_detects_any_scratch() {
        let mut body = fresh_body(&[PartKind::Tough, PartKind::Attack, PartKind::Move]);
        assert!(!has_combat_damage(&body));
        body[0].hits = 99;
        assert!(has_combat_damage(&body));
    }

    #[test]
    fn test_living_parts_counts_only_kind() {
        let mut body = fresh_body(&[PartKind::Work, PartKind::Work, PartKind::Move]);
        assert_eq!(living_parts(&body, PartKind::Work), 2);
        body[1].hits = 0;
        assert_eq!(living_parts(&body, PartKind::Work), 1);
        assert_eq!(living_parts(&body, PartKind::Carry), 0);
    }
}
