//! Body templates scaled to an energy budget

use crate::agent::body::{body_cost, PartKind};
use crate::agent::role::Role;

/// Smallest body that can harvest, carry and walk
pub const BOOTSTRAP_BODY: [PartKind; 3] = [PartKind::Work, PartKind::Carry, PartKind::Move];

/// Largest body of `role` that fits both the budget and the part cap
///
/// Bodies repeat the role's unit; `None` if not even one unit fits.
pub fn build_body(role: Role, budget: u32, max_parts: usize) -> Option<Vec<PartKind>> {
    let (unit, max_units) = role.body_unit();
    let by_energy = (budget / body_cost(unit)) as usize;
    let by_parts = max_parts / unit.len();
    let units = by_energy.min(by_parts).min(max_units);
    if units == 0 {
        return None;
    }
    Some(unit.iter().copied().cycle().take(units * unit.len()).collect())
}

/// Critical parts a role's body would carry
pub fn critical_count(role: Role, parts: &[PartKind]) -> u32 {
    role.critical_part()
        .map(|kind| parts.iter().filter(|p| **p == kind).count() as u32)
        .unwrap_or(0)
}
