//! Once-per-step resolution of every agent's movement intent
//!
//! Agents only *declare* what they want during the decide phase. After all of
//! them have acted, `resolve` turns the intents into a collision-free set of
//! single-tile moves:
//!
//! 1. intents already within range need no move
//! 2. everyone else takes the next step of a cached path (recomputed when the
//!    approach changed, the agent was displaced, or the next step was built over)
//! 3. two agents stepping onto each other's tiles swap unconditionally
//! 4. steps onto a tile pinned by another agent are dropped
//! 5. contested destinations go to the earliest registered intent
//!
//! A step whose destination stays occupied by an agent that is not moving
//! away is dropped as well, so no two agents ever end on one tile. Every
//! dropped step is a silent backoff; the agent simply tries again next step.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::core::config::MovementConfig;
use crate::core::types::{AgentId, Direction, Tile};
use crate::movement::path_cache::PathFingerprint;
use crate::movement::pathfinding::find_path;
use crate::world::zone::Zone;

/// An agent's desired approach for this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveIntent {
    pub agent: AgentId,
    pub target: Tile,
    pub range: u32,
}

/// One single-tile move for the world's movement primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCommand {
    pub agent: AgentId,
    pub from: Tile,
    pub to: Tile,
    pub direction: Direction,
}

/// Why an intent produced no move this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// No path exists (or the search budget ran out)
    Unreachable,
    /// Destination pinned by a stationary agent
    Pinned,
    /// Another agent registered first for the same destination
    Contended,
    /// Destination still occupied by an agent that is not leaving
    Occupied,
}

/// Outcome of one `resolve` pass
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Moves to execute, in intent registration order
    pub commands: Vec<MoveCommand>,
    pub backoffs: Vec<(AgentId, Backoff)>,
}

impl Resolution {
    pub fn command_for(&self, agent: AgentId) -> Option<&MoveCommand> {
        self.commands.iter().find(|c| c.agent == agent)
    }

    pub fn backoff_for(&self, agent: AgentId) -> Option<Backoff> {
        self.backoffs
            .iter()
            .find(|(id, _)| *id == agent)
            .map(|(_, b)| *b)
    }
}

/// A step an agent wants to take, before conflicts are settled
#[derive(Debug, Clone, Copy)]
struct PlannedStep {
    agent: AgentId,
    from: Tile,
    to: Tile,
}

impl PlannedStep {
    fn command(&self) -> Option<MoveCommand> {
        self.from.direction_to(self.to).map(|direction| MoveCommand {
            agent: self.agent,
            from: self.from,
            to: self.to,
            direction,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Pending,
    Move,
    Stay(Backoff),
}

/// Intent and pin registry for one zone, reset every step
#[derive(Debug, Clone, Default)]
pub struct MovementCoordinator {
    intents: Vec<MoveIntent>,
    slots: AHashMap<AgentId, usize>,
    pins: AHashMap<Tile, AgentId>,
}

impl MovementCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every intent and pin from the previous step
    pub fn reset(&mut self) {
        self.intents.clear();
        self.slots.clear();
        self.pins.clear();
    }

    /// Claim the agent's current tile for this step only
    ///
    /// Returns false if another agent already pinned that tile.
    pub fn pin(&mut self, agent: &Agent) -> bool {
        match self.pins.get(&agent.position) {
            Some(owner) if *owner != agent.id => false,
            _ => {
                self.pins.insert(agent.position, agent.id);
                true
            }
        }
    }

    pub fn pinned_by(&self, tile: Tile) -> Option<AgentId> {
        self.pins.get(&tile).copied()
    }

    /// Record where the agent wants to get; a later call replaces the earlier one
    ///
    /// The replacement keeps the agent's original registration slot.
    pub fn request_move(&mut self, agent: &Agent, target: Tile, range: u32) {
        let intent = MoveIntent {
            agent: agent.id,
            target,
            range,
        };
        match self.slots.get(&agent.id) {
            Some(&slot) => self.intents[slot] = intent,
            None => {
                self.slots.insert(agent.id, self.intents.len());
                self.intents.push(intent);
            }
        }
    }

    pub fn intent(&self, agent: AgentId) -> Option<&MoveIntent> {
        self.slots.get(&agent).map(|&slot| &self.intents[slot])
    }

    pub fn intent_count(&self) -> usize {
        self.intents.len()
    }

    /// Settle all intents into moves
    ///
    /// `agents` is the zone's roster; path caches on it are refreshed and
    /// advanced for every executed move. Nothing is moved here: the returned
    /// commands go to the world's movement primitive.
    pub fn resolve(
        &self,
        zone: &Zone,
        agents: &mut [Agent],
        config: &MovementConfig,
    ) -> Resolution {
        let mut resolution = Resolution::default();
        let id_to_idx: AHashMap<AgentId, usize> =
            agents.iter().enumerate().map(|(i, a)| (a.id, i)).collect();

        let costs = zone.cost_matrix(config);
        let mut planned: Vec<PlannedStep> = Vec::new();

        for intent in &self.intents {
            let Some(&idx) = id_to_idx.get(&intent.agent) else {
                continue;
            };
            let agent = &mut agents[idx];
            if agent.spawning || agent.position.range_to(intent.target) <= intent.range {
                continue;
            }

            let fingerprint = PathFingerprint {
                target: intent.target,
                range: intent.range,
            };
            let cached = agent
                .movement
                .usable_step(agent.position, fingerprint)
                .filter(|step| costs.get(*step).copied().flatten().is_some());
            let step = match cached {
                Some(step) => step,
                None => {
                    let path = find_path(
                        &costs,
                        agent.position,
                        intent.target,
                        intent.range,
                        config.max_search_nodes,
                    );
                    match path {
                        Some(path) if !path.is_empty() => {
                            let first = path[0];
                            agent.movement.store(fingerprint, path);
                            first
                        }
                        _ => {
                            agent.movement.clear();
                            tracing::debug!(agent = %agent.id, target = %intent.target, "no path");
                            resolution.backoffs.push((agent.id, Backoff::Unreachable));
                            continue;
                        }
                    }
                }
            };

            planned.push(PlannedStep {
                agent: agent.id,
                from: agent.position,
                to: step,
            });
        }

        let verdicts = self.settle(&planned, agents);

        for (step, verdict) in planned.iter().zip(&verdicts) {
            match verdict {
                Verdict::Move => {
                    if let Some(command) = step.command() {
                        resolution.commands.push(command);
                        if let Some(&idx) = id_to_idx.get(&step.agent) {
                            agents[idx].movement.advance();
                        }
                    }
                }
                Verdict::Stay(backoff) => {
                    tracing::debug!(agent = %step.agent, to = %step.to, ?backoff, "move backed off");
                    resolution.backoffs.push((step.agent, *backoff));
                }
                Verdict::Pending => {}
            }
        }

        resolution
    }

    /// Decide which planned steps execute
    fn settle(&self, planned: &[PlannedStep], agents: &[Agent]) -> Vec<Verdict> {
        let mut verdicts = vec![Verdict::Pending; planned.len()];

        // Swaps first: they never lose to pins or contention
        let by_origin: AHashMap<Tile, usize> =
            planned.iter().enumerate().map(|(i, p)| (p.from, i)).collect();
        for (i, step) in planned.iter().enumerate() {
            if let Some(&j) = by_origin.get(&step.to) {
                if j != i && planned[j].to == step.from {
                    verdicts[i] = Verdict::Move;
                    verdicts[j] = Verdict::Move;
                }
            }
        }
        let swap_targets: AHashSet<Tile> = planned
            .iter()
            .zip(&verdicts)
            .filter(|(_, v)| **v == Verdict::Move)
            .map(|(p, _)| p.to)
            .collect();

        // Pins, then first-registered wins each destination
        let mut claimed: AHashSet<Tile> = swap_targets;
        for (step, verdict) in planned.iter().zip(verdicts.iter_mut()) {
            if *verdict != Verdict::Pending {
                continue;
            }
            let pinned_by_other = self
                .pins
                .get(&step.to)
                .is_some_and(|owner| *owner != step.agent);
            *verdict = if pinned_by_other {
                Verdict::Stay(Backoff::Pinned)
            } else if claimed.insert(step.to) {
                Verdict::Move
            } else {
                Verdict::Stay(Backoff::Contended)
            };
        }

        // Drop steps into tiles whose occupant ends up staying; each drop can
        // strand the agent behind it, so repeat until nothing changes
        let occupant: AHashMap<Tile, AgentId> =
            agents.iter().map(|a| (a.position, a.id)).collect();
        loop {
            let moving: AHashSet<AgentId> = planned
                .iter()
                .zip(&verdicts)
                .filter(|(_, v)| **v == Verdict::Move)
                .map(|(p, _)| p.agent)
                .collect();
            let mut changed = false;
            for (step, verdict) in planned.iter().zip(verdicts.iter_mut()) {
                if *verdict != Verdict::Move {
                    continue;
                }
                let blocked = occupant
                    .get(&step.to)
                    .is_some_and(|other| *other != step.agent && !moving.contains(other));
                if blocked {
                    *verdict = Verdict::Stay(Backoff::Occupied);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        verdicts
    }
}
