//! Zone terrain and the generic tile grid it is stored in

use serde::{Deserialize, Serialize};

use crate::core::types::Tile;

/// Natural terrain of a tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Plain,
    Swamp,
    Wall,
}

impl Terrain {
    pub fn is_walkable(&self) -> bool {
        !matches!(self, Terrain::Wall)
    }
}

/// Dense 2D grid indexed by tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid<T: Clone + Default> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T: Clone + Default> TileGrid<T> {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn contains(&self, tile: Tile) -> bool {
        tile.x >= 0 && tile.y >= 0 && (tile.x as u32) < self.width && (tile.y as u32) < self.height
    }

    #[inline]
    fn index(&self, tile: Tile) -> Option<usize> {
        self.contains(tile)
            .then(|| tile.y as usize * self.width as usize + tile.x as usize)
    }

    #[inline]
    pub fn get(&self, tile: Tile) -> Option<&T> {
        self.index(tile).map(|i| &self.data[i])
    }

    #[inline]
    pub fn get_mut(&mut self, tile: Tile) -> Option<&mut T> {
        self.index(tile).map(move |i| &mut self.data[i])
    }

    /// Out-of-bounds writes are ignored
    #[inline]
    pub fn set(&mut self, tile: Tile, value: T) {
        if let Some(i) = self.index(tile) {
            self.data[i] = value;
        }
    }

    /// Every tile in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = Tile> {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..h).flat_map(move |y| (0..w).map(move |x| Tile::new(x, y)))
    }
}
