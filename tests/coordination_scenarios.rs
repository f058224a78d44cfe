//! Integration tests for a full coordination step
//!
//! These drive the public API the way a host game would:
//! - Bootstrapping an empty zone
//! - Spawn priority between transport and spending roles
//! - Movement swaps, contention and displaced path caches
//! - Culling a single underpowered agent

use swarm_steward::agent::{Agent, PartKind, Role};
use swarm_steward::core::config::{MovementConfig, StewardConfig};
use swarm_steward::core::types::{Tile, ZoneId};
use swarm_steward::movement::MovementCoordinator;
use swarm_steward::simulation::Orchestrator;
use swarm_steward::world::{StructureKind, World, Zone};

const ZONE: ZoneId = ZoneId(1);

fn zone_with_spawn(spawn_energy: u32) -> Zone {
    let mut zone = Zone::new(ZONE, 30, 30);
    zone.add_spawn(Tile::new(15, 15), spawn_energy);
    zone.controller = Tile::new(27, 27);
    zone
}

fn add_filled_extensions(zone: &mut Zone, count: i32) {
    for i in 0..count {
        let ext = zone.add_structure(StructureKind::Extension, Tile::new(1 + i, 1));
        zone.structure_mut(ext).unwrap().energy = 50;
    }
}

fn world_with(zone: Zone) -> World {
    let mut world = World::new();
    world.insert_zone(zone);
    world
}

/// Coordinator-side view of a zone's agents, no memory
fn roster(zone: &Zone) -> Vec<Agent> {
    zone.agents
        .iter()
        .map(|live| Agent::rehydrate(zone.id, live, None))
        .collect()
}

fn parts(kind: PartKind, n: usize) -> Vec<PartKind> {
    vec![kind; n]
}

#[test]
fn test_empty_zone_bootstraps_single_generalist() {
    let mut zone = zone_with_spawn(300);
    zone.add_node(Tile::new(4, 4));
    zone.add_node(Tile::new(25, 6));
    let mut world = world_with(zone);
    let mut orchestrator = Orchestrator::new(StewardConfig::default());

    let report = orchestrator.run_step(&mut world);

    let zone = world.zone(ZONE).unwrap();
    assert_eq!(zone.agents.len(), 1);
    assert_eq!(report.zone(ZONE).unwrap().spawned, Some(Role::Generalist));
    assert_eq!(
        orchestrator.store().agent(zone.agents[0].id).unwrap().role,
        Role::Generalist
    );
    assert!(orchestrator.market().jobs(ZONE).is_empty());
    assert_eq!(report.jobs_published(), 0);
}

#[test]
fn test_transporter_spawns_before_spenders() {
    let mut zone = zone_with_spawn(300);
    zone.tier = 2;
    add_filled_extensions(&mut zone, 5);
    zone.add_node(Tile::new(4, 20));
    zone.add_site(StructureKind::Extension, Tile::new(20, 20));

    let mut harvester = parts(PartKind::Work, 5);
    harvester.push(PartKind::Move);
    zone.add_agent(&harvester, Tile::new(5, 20), 1500);
    let mut world = world_with(zone);
    let mut orchestrator = Orchestrator::new(StewardConfig::default());

    let report = orchestrator.run_step(&mut world);

    let spawned = report.zone(ZONE).unwrap().spawned;
    assert_eq!(spawned, Some(Role::Transporter));
    assert!(!spawned.unwrap().is_spender());
}

#[test]
fn test_facing_agents_swap() {
    let mut zone = Zone::new(ZONE, 20, 20);
    let a = zone.add_agent(&[PartKind::Move], Tile::new(5, 5), 1000);
    let b = zone.add_agent(&[PartKind::Move], Tile::new(6, 5), 1000);
    let mut agents = roster(&zone);

    let mut coordinator = MovementCoordinator::new();
    coordinator.request_move(&agents[0], Tile::new(6, 5), 0);
    coordinator.request_move(&agents[1], Tile::new(5, 5), 0);
    let resolution = coordinator.resolve(&zone, &mut agents, &MovementConfig::default());

    assert_eq!(resolution.commands.len(), 2);
    let results = zone.apply_moves(&resolution.commands);
    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(zone.agent(a).unwrap().pos, Tile::new(6, 5));
    assert_eq!(zone.agent(b).unwrap().pos, Tile::new(5, 5));
}

#[test]
fn test_three_way_contention_moves_exactly_one() {
    let mut zone = Zone::new(ZONE, 20, 20);
    let starts = [Tile::new(9, 9), Tile::new(11, 11), Tile::new(9, 11)];
    for start in starts {
        zone.add_agent(&[PartKind::Move], start, 1000);
    }
    let mut agents = roster(&zone);

    let mut coordinator = MovementCoordinator::new();
    for agent in &agents {
        coordinator.request_move(agent, Tile::new(10, 10), 0);
    }
    let resolution = coordinator.resolve(&zone, &mut agents, &MovementConfig::default());

    assert_eq!(resolution.commands.len(), 1);
    assert_eq!(resolution.commands[0].agent, agents[0].id);
    assert_eq!(resolution.backoffs.len(), 2);

    zone.apply_moves(&resolution.commands);
    assert_eq!(zone.agents[0].pos, Tile::new(10, 10));
    assert_eq!(zone.agents[1].pos, starts[1]);
    assert_eq!(zone.agents[2].pos, starts[2]);
}

#[test]
fn test_displaced_agent_recomputes_path() {
    let mut zone = Zone::new(ZONE, 20, 20);
    let id = zone.add_agent(&[PartKind::Move], Tile::new(2, 5), 1000);
    let target = Tile::new(12, 5);
    let config = MovementConfig::default();

    let mut agents = roster(&zone);
    let mut coordinator = MovementCoordinator::new();
    coordinator.request_move(&agents[0], target, 0);
    let first = coordinator.resolve(&zone, &mut agents, &config);
    zone.apply_moves(&first.commands);
    let cached_next = agents[0].movement.cached_path[0];

    // Something outside the coordinator shoves the agent far off its path
    zone.agents[0].pos = Tile::new(3, 12);
    assert!(!cached_next.is_adjacent(Tile::new(3, 12)));

    let mut agents = vec![Agent::rehydrate(ZONE, &zone.agents[0], Some(&agents[0].memory()))];
    let mut coordinator = MovementCoordinator::new();
    coordinator.request_move(&agents[0], target, 0);
    let second = coordinator.resolve(&zone, &mut agents, &config);

    let command = second.command_for(id).unwrap();
    assert_eq!(command.from, Tile::new(3, 12));
    assert!(command.to.is_adjacent(Tile::new(3, 12)));
    assert!(command.to.range_to(target) < Tile::new(3, 12).range_to(target));
    assert!(agents[0]
        .movement
        .cached_path
        .first()
        .map_or(true, |next| next.is_adjacent(command.to)));
}

#[test]
fn test_single_underpowered_agent_is_culled() {
    let mut zone = zone_with_spawn(300);
    add_filled_extensions(&mut zone, 24);
    zone.add_node(Tile::new(4, 20));

    // A fresh transporter at this capacity carries 20 CARRY
    let mut strong = parts(PartKind::Carry, 20);
    strong.extend(parts(PartKind::Move, 10));
    let mut weak = parts(PartKind::Carry, 6);
    weak.extend(parts(PartKind::Move, 3));

    let s1 = zone.add_agent(&strong, Tile::new(5, 10), 1400);
    let culled = zone.add_agent(&weak, Tile::new(6, 10), 1400);
    let s2 = zone.add_agent(&strong, Tile::new(7, 10), 1400);
    let s3 = zone.add_agent(&strong, Tile::new(8, 10), 1400);
    let mut world = world_with(zone);
    let mut orchestrator = Orchestrator::new(StewardConfig::default());

    let report = orchestrator.run_step(&mut world);

    assert_eq!(report.culled(), 1);
    assert_eq!(report.zone(ZONE).unwrap().culled, Some(culled));
    assert!(!world.is_alive(culled));
    for survivor in [s1, s2, s3] {
        assert!(world.is_alive(survivor));
    }
    assert!(orchestrator.store().agent(culled).is_none());
    assert_eq!(orchestrator.store().zone(ZONE).culled, 1);
}

#[test]
fn test_runs_many_steps_on_generated_zone() {
    use swarm_steward::world::generate::{generate_zone, ZoneGenConfig};

    let config = ZoneGenConfig {
        extensions: 5,
        ..Default::default()
    };
    let mut world = World::new();
    world.insert_zone(generate_zone(ZONE, 42, &config));
    let mut orchestrator = Orchestrator::new(StewardConfig::default());

    let mut spawned = 0;
    for _ in 0..200 {
        let report = orchestrator.run_step(&mut world);
        spawned += report.spawned();
        world.advance();
    }

    let zone = world.zone(ZONE).unwrap();
    assert!(spawned >= 1);
    assert!(!zone.agents.is_empty());
    // No two agents ever share a tile
    let mut tiles: Vec<Tile> = zone.agents.iter().map(|a| a.pos).collect();
    tiles.sort_by_key(|t| (t.x, t.y));
    tiles.dedup();
    assert_eq!(tiles.len(), zone.agents.len());
    assert_eq!(orchestrator.store().agent_count(), zone.agents.len());
}
