//! Which agents may take which jobs, and how much each role wants them

use crate::agent::body::CapabilitySet;
use crate::agent::role::Role;
use crate::market::job::JobType;

/// Whether a body can perform a job at all
///
/// Unknown job types are assumed doable; their publisher owns the check.
pub fn qualifies(caps: &CapabilitySet, job_type: &JobType) -> bool {
    match job_type {
        JobType::Harvest => caps.can_work(),
        JobType::Build | JobType::Upgrade | JobType::Repair => caps.can_work() && caps.can_carry(),
        JobType::Haul => caps.can_carry(),
        JobType::Defend => caps.can_attack() || caps.can_ranged_attack(),
        JobType::Custom(_) => true,
    }
}

/// Fixed bonus or penalty a role applies to a job type
///
/// Negative values push agents away from work their role exists to avoid;
/// a defender will practically never pick up anything but defense.
pub fn role_affinity(role: Role, job_type: &JobType) -> i32 {
    use JobType::*;
    match (role, job_type) {
        (_, Custom(_)) => 0,

        (Role::Generalist, Harvest) => 20,
        (Role::Generalist, Haul) => 10,
        (Role::Generalist, Build | Upgrade) => 10,
        (Role::Generalist, Repair) => 0,
        (Role::Generalist, Defend) => -50,

        (Role::Harvester, Harvest) => 50,
        (Role::Harvester, Haul) => -20,
        (Role::Harvester, Build | Upgrade | Repair) => -10,
        (Role::Harvester, Defend) => -100,

        (Role::Transporter, Haul) => 50,
        (Role::Transporter, Harvest) => -50,
        (Role::Transporter, Build | Repair) => -20,
        (Role::Transporter, Upgrade) => -30,
        (Role::Transporter, Defend) => -100,

        (Role::Builder, Build) => 50,
        (Role::Builder, Repair) => 30,
        (Role::Builder, Upgrade) => 10,
        (Role::Builder, Harvest | Haul) => -10,
        (Role::Builder, Defend) => -100,

        (Role::Upgrader, Upgrade) => 50,
        (Role::Upgrader, Build | Repair) => -10,
        (Role::Upgrader, Harvest | Haul) => -20,
        (Role::Upgrader, Defend) => -100,

        (Role::Defender, Defend) => 100,
        (Role::Defender, _) => -200,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::body::{fresh_body, PartKind};

    fn caps(parts: &[PartKind]) -> CapabilitySet {
        CapabilitySet::from_body(&fresh_body(parts))
    }

    #[test]
    fn test_capability_table() {
        let miner = caps(&[PartKind::Work, PartKind::Move]);
        assert!(qualifies(&miner, &JobType::Harvest));
        assert!(!qualifies(&miner, &JobType::Build));
        assert!(!qualifies(&miner, &JobType::Haul));

        let worker = caps(&[PartKind::Work, PartKind::Carry, PartKind::Move]);
        for job in [JobType::Build, JobType::Upgrade, JobType::Repair, JobType::Haul] {
            assert!(qualifies(&worker, &job), "{:?}", job);
        }
        assert!(!qualifies(&worker, &JobType::Defend));

        let archer = caps(&[PartKind::RangedAttack, PartKind::Move]);
        assert!(qualifies(&archer, &JobType::Defend));
    }

    #[test]
    fn test_unknown_jobs_default_to_capable() {
        let nothing = caps(&[PartKind::Move]);
        assert!(qualifies(&nothing, &JobType::Custom("scout".into())));
    }

    #[test]
    fn test_defender_shuns_civilian_work() {
        assert!(role_affinity(Role::Defender, &JobType::Defend) > 0);
        for job in [JobType::Harvest, JobType::Haul, JobType::Build, JobType::Upgrade] {
            assert!(role_affinity(Role::Defender, &job) <= -200);
        }
    }

    #[test]
    fn test_each_specialist_prefers_its_own_job() {
        let own = [
            (Role::Harvester, JobType::Harvest),
            (Role::Transporter, JobType::Haul),
            (Role::Builder, JobType::Build),
            (Role::Upgrader, JobType::Upgrade),
            (Role::Defender, JobType::Defend),
        ];
        let all = [
            JobType::Harvest,
            JobType::Haul,
            JobType::Build,
            JobType::Upgrade,
            JobType::Repair,
            JobType::Defend,
        ];
        for (role, favorite) in own {
            let best = role_affinity(role, &favorite);
            for job in &all {
                assert!(role_affinity(role, job) <= best, "{} prefers {:?}", role, job);
            }
        }
    }
}
