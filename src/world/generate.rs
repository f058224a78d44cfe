//! Seeded zone generation for headless runs and tests

use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::types::{Tile, ZoneId};
use crate::world::structures::StructureKind;
use crate::world::terrain::Terrain;
use crate::world::zone::Zone;

/// Knobs for [`generate_zone`]
#[derive(Debug, Clone)]
pub struct ZoneGenConfig {
    pub width: u32,
    pub height: u32,
    pub nodes: u32,
    /// Chance per interior tile of seeding a swamp patch
    pub swamp_frequency: f32,
    /// Chance per interior tile of seeding a rock outcrop
    pub wall_frequency: f32,
    pub starting_energy: u32,
    pub extensions: u32,
    pub tier: u8,
}

impl Default for ZoneGenConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            nodes: 2,
            swamp_frequency: 0.02,
            wall_frequency: 0.01,
            starting_energy: 300,
            extensions: 0,
            tier: 1,
        }
    }
}

/// Generate a zone with a walled border, a spawn in the middle and resource nodes
pub fn generate_zone(id: ZoneId, seed: u64, config: &ZoneGenConfig) -> Zone {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut zone = Zone::new(id, config.width, config.height);
    zone.tier = config.tier.clamp(1, 8);

    let (w, h) = (config.width as i32, config.height as i32);
    let tiles: Vec<Tile> = zone.terrain.tiles().collect();
    for tile in &tiles {
        if tile.x == 0 || tile.y == 0 || tile.x == w - 1 || tile.y == h - 1 {
            zone.terrain.set(*tile, Terrain::Wall);
        }
    }

    // Patches grow from seeds into their immediate neighborhood
    let interior: Vec<Tile> = tiles
        .iter()
        .copied()
        .filter(|t| t.x > 1 && t.y > 1 && t.x < w - 2 && t.y < h - 2)
        .collect();
    for tile in &interior {
        let roll: f32 = rng.gen();
        let terrain = if roll < config.wall_frequency {
            Terrain::Wall
        } else if roll < config.wall_frequency + config.swamp_frequency {
            Terrain::Swamp
        } else {
            continue;
        };
        zone.terrain.set(*tile, terrain);
        for n in tile.neighbors() {
            if rng.gen::<f32>() < 0.5 && !is_border(n, w, h) {
                zone.terrain.set(n, terrain);
            }
        }
    }

    let center = Tile::new(w / 2, h / 2);
    clear_around(&mut zone, center, 2);
    zone.add_spawn(center, config.starting_energy);

    let ring = [
        Tile::new(center.x - 2, center.y - 2),
        Tile::new(center.x + 2, center.y - 2),
        Tile::new(center.x - 2, center.y + 2),
        Tile::new(center.x + 2, center.y + 2),
        Tile::new(center.x, center.y - 2),
        Tile::new(center.x, center.y + 2),
        Tile::new(center.x - 2, center.y),
        Tile::new(center.x + 2, center.y),
    ];
    for pos in ring.into_iter().take(config.extensions as usize) {
        let ext = zone.add_structure(StructureKind::Extension, pos);
        if let Some(s) = zone.structure_mut(ext) {
            s.energy = s.energy_capacity;
        }
    }

    for _ in 0..config.nodes {
        let pos = random_open_tile(&zone, &mut rng, center);
        zone.add_node(pos);
        clear_around(&mut zone, pos, 1);
    }

    let controller = random_open_tile(&zone, &mut rng, center);
    clear_around(&mut zone, controller, 1);
    zone.controller = controller;

    // Nodes and the controller sit in rock, so nobody stands on them
    let anchors: Vec<Tile> = zone.nodes.iter().map(|n| n.pos).chain([controller]).collect();
    for pos in anchors {
        zone.terrain.set(pos, Terrain::Wall);
    }

    tracing::debug!(zone = %id, seed, nodes = config.nodes, "generated zone");
    zone
}

fn is_border(tile: Tile, w: i32, h: i32) -> bool {
    tile.x <= 0 || tile.y <= 0 || tile.x >= w - 1 || tile.y >= h - 1
}

fn clear_around(zone: &mut Zone, center: Tile, radius: i32) {
    let (w, h) = (zone.terrain.width() as i32, zone.terrain.height() as i32);
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let t = Tile::new(center.x + dx, center.y + dy);
            if !is_border(t, w, h) {
                zone.terrain.set(t, Terrain::Plain);
            }
        }
    }
}

/// Interior tile at least 6 tiles from `avoid`, falling back to any interior tile
fn random_open_tile(zone: &Zone, rng: &mut ChaCha8Rng, avoid: Tile) -> Tile {
    let (w, h) = (zone.terrain.width() as i32, zone.terrain.height() as i32);
    for _ in 0..200 {
        let t = Tile::new(rng.gen_range(3..w - 3), rng.gen_range(3..h - 3));
        if t.range_to(avoid) >= 6 && zone.is_walkable(t) {
            return t;
        }
    }
    Tile::new(3, 3)
}
