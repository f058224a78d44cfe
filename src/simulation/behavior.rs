//! Per-agent decisions: take a job, then either work in place or head there

use crate::agent::Agent;
use crate::market::board::TaskMarket;
use crate::movement::coordinator::MovementCoordinator;
use crate::world::zone::Zone;

/// What an agent ended up doing this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Spawning,
    /// Nothing on the board suits it
    Idle,
    /// In working range and pinned to its tile
    Working,
    /// Registered a movement intent
    Travelling,
}

/// Role logic hook, run once per agent per step
///
/// Implementations may only touch the step's context objects; whatever must
/// survive goes onto the agent, which is persisted afterwards.
pub trait AgentBrain {
    fn decide(
        &self,
        agent: &mut Agent,
        zone: &Zone,
        market: &mut TaskMarket,
        movement: &mut MovementCoordinator,
    ) -> Activity;
}

/// Default brain: best job from the market, then approach or work
#[derive(Debug, Clone, Copy, Default)]
pub struct JobBrain;

impl AgentBrain for JobBrain {
    fn decide(
        &self,
        agent: &mut Agent,
        zone: &Zone,
        market: &mut TaskMarket,
        movement: &mut MovementCoordinator,
    ) -> Activity {
        if agent.spawning {
            return Activity::Spawning;
        }

        if let Some(held) = &agent.current_job {
            if zone.lookup(held.target).is_none() {
                tracing::debug!(
                    agent = %agent.id,
                    job = ?held.job_type,
                    "job target no longer exists, abandoning"
                );
                agent.current_job = None;
                agent.movement.clear();
                // Picks fresh work next step
                return Activity::Idle;
            }
        }

        let Some((target, range)) = market
            .assign(agent)
            .map(|job| (job.target_pos, job.job_type.working_range()))
        else {
            return Activity::Idle;
        };

        if agent.position.range_to(target) <= range {
            if !movement.pin(agent) {
                tracing::debug!(agent = %agent.id, tile = %agent.position, "tile already pinned");
            }
            Activity::Working
        } else {
            movement.request_move(agent, target, range);
            Activity::Travelling
        }
    }
}
