//! Headless Zone Simulation
//!
//! Generates seeded zones and runs the coordinator for a number of steps,
//! printing what population control and movement did along the way.

use std::path::PathBuf;

use clap::Parser;
use swarm_steward::core::config::StewardConfig;
use swarm_steward::core::error::Result;
use swarm_steward::core::types::ZoneId;
use swarm_steward::memory::MemoryStore;
use swarm_steward::simulation::Orchestrator;
use swarm_steward::world::generate::{generate_zone, ZoneGenConfig};
use swarm_steward::world::World;

/// Headless Zone Simulation - run the coordinator without a game attached
#[derive(Parser, Debug)]
#[command(name = "zone_sim")]
#[command(about = "Run the swarm coordinator over generated zones")]
struct Args {
    /// Number of steps to run
    #[arg(long, default_value_t = 300)]
    steps: u64,

    /// Random seed for world generation
    #[arg(long)]
    seed: Option<u64>,

    /// Coordinator configuration (TOML); defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the durable store here as JSON after the run
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Resume agent memory from a store written by an earlier run
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Number of zones to generate
    #[arg(long, default_value_t = 1)]
    zones: u32,

    /// Extensions placed around each spawn
    #[arg(long, default_value_t = 0)]
    extensions: u32,

    /// Controller tier of every zone
    #[arg(long, default_value_t = 1)]
    tier: u8,

    /// Print a summary line every N steps (events are always printed)
    #[arg(long, default_value_t = 50)]
    report_every: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("swarm_steward=info")),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = match &args.config {
        Some(path) => StewardConfig::load(path)?,
        None => StewardConfig::default(),
    };
    config.validate()?;

    let gen_config = ZoneGenConfig {
        extensions: args.extensions,
        tier: args.tier,
        ..Default::default()
    };
    let mut world = World::new();
    for i in 0..args.zones {
        let zone_seed = seed.wrapping_add(i as u64);
        world.insert_zone(generate_zone(ZoneId(i + 1), zone_seed, &gen_config));
    }
    tracing::info!(seed, zones = args.zones, steps = args.steps, "starting zone simulation");

    let mut orchestrator = Orchestrator::new(config);
    if let Some(path) = &args.resume {
        orchestrator = orchestrator.with_store(MemoryStore::load(path)?);
        tracing::info!(agents = orchestrator.store().agent_count(), "resumed store");
    }
    let mut totals = (0usize, 0usize, 0usize, 0usize);

    for _ in 0..args.steps {
        let report = orchestrator.run_step(&mut world);
        totals.0 += report.spawned();
        totals.1 += report.culled();
        totals.2 += report.promoted();
        totals.3 += report.moves();

        for zone in &report.zones {
            if let Some(role) = zone.spawned {
                println!("[step {:>5}] {} spawned {}", report.step, zone.zone, role);
            }
            if let Some(agent) = zone.culled {
                println!("[step {:>5}] {} culled {}", report.step, zone.zone, agent);
            }
            if let Some(agent) = zone.promoted {
                println!("[step {:>5}] {} promoted {}", report.step, zone.zone, agent);
            }
        }

        if args.report_every > 0 && report.step % args.report_every == 0 {
            for zone in &report.zones {
                println!(
                    "[step {:>5}] {}: {} agents, {} jobs ({} taken), {} idle, {} moves, {} backoffs, plan {:?}",
                    report.step,
                    zone.zone,
                    zone.agents,
                    zone.jobs_published,
                    zone.jobs_assigned,
                    zone.idle,
                    zone.moves,
                    zone.backoffs,
                    zone.plan,
                );
            }
        }

        world.advance();
    }

    println!();
    println!("=== SUMMARY (seed {}) ===", seed);
    println!("Steps:    {}", args.steps);
    println!("Spawned:  {}", totals.0);
    println!("Culled:   {}", totals.1);
    println!("Promoted: {}", totals.2);
    println!("Moves:    {}", totals.3);
    for zone in world.zones() {
        println!(
            "{}: {} agents, {}/{} energy",
            zone.id,
            zone.agents.len(),
            zone.energy_available(),
            zone.energy_capacity()
        );
    }

    if let Some(path) = &args.snapshot {
        orchestrator.store().save(path)?;
        println!("Store written to {}", path.display());
    }

    Ok(())
}
